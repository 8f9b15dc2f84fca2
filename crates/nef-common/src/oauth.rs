use serde::{Deserialize, Deserializer, Serialize};

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body returned by the registry's `/oauth2/token` endpoint.
///
/// Only `access_token` matters to callers; the other members are informational
/// and may be absent or `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessTokenResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_negative_members_decode() {
        let token: AccessTokenResponse = serde_json::from_str(
            r#"{"access_token":"abc123","token_type":null,"expires_in":-1,"scope":null}"#,
        )
        .unwrap();
        assert_eq!(token.access_token, "abc123");
        assert_eq!(token.token_type, None);
        assert_eq!(token.expires_in, Some(-1));
        assert_eq!(token.scope, None);

        let token: AccessTokenResponse = serde_json::from_str(r#"{"access_token":null}"#).unwrap();
        assert!(token.access_token.is_empty());
    }
}
