pub mod oauth;
pub mod qod;
pub mod sm_policy;
pub mod telemetry;

pub use oauth::AccessTokenResponse;
pub use qod::{ApplicationServer, Device, DevicePorts, PortRange, QodSessionRequest};
pub use sm_policy::*;
