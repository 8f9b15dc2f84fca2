pub mod config;
pub mod error;
pub mod forward;
pub mod policy;
pub mod session;
pub mod token;
pub mod translate;

pub use config::{QodConfig, RegistryConfig};
pub use error::{QodError, Stage, TokenError};
pub use forward::PolicyControlClient;
pub use policy::{PolicyCatalog, PolicyDefaults};
pub use session::{Accepted, Forwarder, QodSessionService, SessionOutcome};
pub use token::{AccessTokenSource, NrfTokenClient};
pub use translate::RequestTranslator;
