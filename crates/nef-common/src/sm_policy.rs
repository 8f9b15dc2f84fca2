//! Session policy context sent to the policy-control function when a
//! session-level policy is created.
//!
//! Field names follow the SBI wire format. Optional members are dropped from
//! the encoded body when unset.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum PduSessionType {
    Ipv4,
    Ipv6,
    Ipv4v6,
    Ethernet,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AccessType {
    #[serde(rename = "3GPP_ACCESS")]
    ThreeGppAccess,
    #[serde(rename = "NON_3GPP_ACCESS")]
    Non3GppAccess,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreemptionCapability {
    NotPreempt,
    MayPreempt,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreemptionVulnerability {
    NotPreemptable,
    Preemptable,
}

/// Network slice selector (S-NSSAI).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snssai {
    pub sst: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sd: Option<String>,
}

/// Aggregate maximum bit rate, e.g. `"250 Mbps"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ambr {
    pub uplink: String,
    pub downlink: String,
}

/// Allocation and retention priority.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Arp {
    /// 1 (highest) through 15.
    pub priority_level: u8,
    pub preempt_cap: PreemptionCapability,
    pub preempt_vuln: PreemptionVulnerability,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscribedDefaultQos {
    #[serde(rename = "5qi")]
    pub five_qi: u16,
    pub arp: Arp,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlmnId {
    pub mcc: String,
    pub mnc: String,
}

/// Tracking area identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tai {
    pub plmn_id: PlmnId,
    pub tac: String,
}

/// E-UTRAN cell global identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ecgi {
    pub plmn_id: PlmnId,
    pub eutra_cell_id: String,
}

/// NR cell global identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ncgi {
    pub plmn_id: PlmnId,
    pub nr_cell_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeographicCoordinates {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tai: Option<Tai>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecgi: Option<Ecgi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ncgi: Option<Ncgi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geographical_coordinates: Option<GeographicCoordinates>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServingNfId {
    pub nf_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SmPolicyContextData {
    pub supi: String,
    pub pdu_session_id: u8,
    pub dnn: String,
    pub snssai: Snssai,
    pub notification_uri: String,
    pub pdu_session_type: PduSessionType,
    pub access_type: AccessType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pei: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_address_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_ipv6_address_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ue_ipv6_address_prefixes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribed_session_ambr: Option<Ambr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribed_default_qos: Option<SubscribedDefaultQos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ue_location: Option<UserLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ue_location_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vplmn_id: Option<PlmnId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_nf_id: Option<ServingNfId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charging_characteristics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ps_data_off_status: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rat_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_ind: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_plane_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ue_mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnn_selection_mode: Option<String>,
}

impl SmPolicyContextData {
    /// Builds a context with only the mandatory members populated.
    pub fn new(
        supi: String,
        pdu_session_id: u8,
        dnn: String,
        snssai: Snssai,
        notification_uri: String,
        pdu_session_type: PduSessionType,
        access_type: AccessType,
    ) -> Self {
        Self {
            supi,
            pdu_session_id,
            dnn,
            snssai,
            notification_uri,
            pdu_session_type,
            access_type,
            pei: None,
            ipv4_address: None,
            ipv6_address_prefix: None,
            rel_ipv6_address_prefix: None,
            ue_ipv6_address_prefixes: Vec::new(),
            subscribed_session_ambr: None,
            subscribed_default_qos: None,
            ue_location: None,
            ue_location_timestamp: None,
            vplmn_id: None,
            serving_nf_id: None,
            charging_characteristics: None,
            ps_data_off_status: None,
            rat_type: None,
            emergency_ind: None,
            user_plane_only: None,
            ue_mac: None,
            dnn_selection_mode: None,
        }
    }
}
