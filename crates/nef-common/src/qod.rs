use serde::{Deserialize, Serialize};

/// Identifies the device whose session should receive the requested quality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub network_access_identifier: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationServer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_address: Option<String>,
}

impl ApplicationServer {
    pub fn has_address(&self) -> bool {
        let present = |a: &Option<String>| a.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.ipv4_address) || present(&self.ipv6_address)
    }
}

/// Inclusive port interval on the device side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortRange {
    pub from: u16,
    pub to: u16,
}

impl PortRange {
    pub fn is_ordered(&self) -> bool {
        self.from <= self.to
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DevicePorts {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<PortRange>,
}

/// Inbound "create QoD session" body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QodSessionRequest {
    pub device: Device,
    pub application_server: ApplicationServer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_ports: Option<DevicePorts>,
    /// Requested duration in seconds.
    pub duration: u64,
    /// QoS profile name; its meaning is defined by the operator's policy catalog.
    pub qos_profile: String,
}

impl QodSessionRequest {
    /// Port ranges whose lower bound exceeds the upper bound.
    pub fn unordered_port_ranges(&self) -> Vec<PortRange> {
        self.device_ports
            .as_ref()
            .map(|p| p.ranges.iter().copied().filter(|r| !r.is_ordered()).collect())
            .unwrap_or_default()
    }
}
