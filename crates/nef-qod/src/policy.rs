//! Pipeline-local policy defaults.
//!
//! The inbound QoD request carries only the device, the application server and
//! a profile name. Every other mandatory member of the policy context comes
//! from a [`PolicyDefaults`] picked out of the [`PolicyCatalog`] by profile.

use std::collections::HashMap;
use std::path::Path;

use nef_common::{
    AccessType, Ambr, Arp, PduSessionType, PlmnId, PreemptionCapability, PreemptionVulnerability,
    Snssai, SubscribedDefaultQos, Tai, UserLocation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read policy file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid policy catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("profile '{profile}': ARP priority level {level} outside 1..=15")]
    PriorityLevel { profile: String, level: u8 },
}

/// Values used for policy-context members the inbound request does not carry.
///
/// Missing fields in a JSON policy object fall back to the built-in value; an
/// explicit `null` on an optional descriptor leaves it out of the context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicyDefaults {
    pub pdu_session_id: u8,
    pub dnn: String,
    pub snssai: Snssai,
    pub pdu_session_type: PduSessionType,
    pub access_type: AccessType,
    pub session_ambr: Option<Ambr>,
    pub default_qos: Option<SubscribedDefaultQos>,
    pub location: Option<UserLocation>,
}

impl Default for PolicyDefaults {
    fn default() -> Self {
        Self {
            pdu_session_id: 10,
            dnn: "internet".to_string(),
            snssai: Snssai {
                sst: 1,
                sd: Some("010203".to_string()),
            },
            pdu_session_type: PduSessionType::Ipv4v6,
            access_type: AccessType::ThreeGppAccess,
            session_ambr: Some(Ambr {
                uplink: "250 Mbps".to_string(),
                downlink: "250 Mbps".to_string(),
            }),
            default_qos: Some(SubscribedDefaultQos {
                five_qi: 1,
                arp: Arp {
                    priority_level: 1,
                    preempt_cap: PreemptionCapability::MayPreempt,
                    preempt_vuln: PreemptionVulnerability::NotPreemptable,
                },
            }),
            location: Some(UserLocation {
                tai: Some(Tai {
                    plmn_id: PlmnId {
                        mcc: "208".to_string(),
                        mnc: "93".to_string(),
                    },
                    tac: "000001".to_string(),
                }),
                ..UserLocation::default()
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PolicyCatalog {
    pub default: PolicyDefaults,
    pub profiles: HashMap<String, PolicyDefaults>,
}

impl PolicyCatalog {
    pub fn with_profile(mut self, name: impl Into<String>, defaults: PolicyDefaults) -> Self {
        self.profiles.insert(name.into(), defaults);
        self
    }

    /// Defaults for `qos_profile`, or the catalog fallback when the profile is unknown.
    pub fn for_profile(&self, qos_profile: &str) -> &PolicyDefaults {
        self.profiles.get(qos_profile).unwrap_or(&self.default)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let catalog: PolicyCatalog = serde_json::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let named = self.profiles.iter().map(|(k, v)| (k.as_str(), v));
        for (profile, defaults) in std::iter::once(("default", &self.default)).chain(named) {
            if let Some(qos) = defaults.default_qos.as_ref() {
                let level = qos.arp.priority_level;
                if !(1..=15).contains(&level) {
                    return Err(CatalogError::PriorityLevel {
                        profile: profile.to_string(),
                        level,
                    });
                }
            }
        }
        Ok(())
    }
}
