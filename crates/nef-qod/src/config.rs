use crate::policy::PolicyCatalog;

/// Where and as whom to ask for access tokens.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub base_url: String,
    pub consumer_id: String,
    pub target_service: String,
}

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct QodConfig {
    pub registry: RegistryConfig,
    /// Application-session endpoint of the policy-control service. `None`
    /// disables forwarding.
    pub policy_control_url: Option<String>,
    pub notification_uri: String,
    pub catalog: PolicyCatalog,
}

impl QodConfig {
    pub fn forwarding_enabled(&self) -> bool {
        self.policy_control_url.is_some()
    }
}

/// Treats a blank endpoint the same as an absent one.
pub fn normalize_endpoint(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
