pub mod config;
pub mod error;
pub mod requests;
pub mod session;
pub mod system;

pub use config::{load_config_from_str, DecalConfig};
pub use error::ConfigError;
pub use requests::{PlaceDecalRequest, RemoveDecalRequest};
pub use session::{SessionStatus, SessionStatusChanged};
pub use system::{DecalSystem, TickServices};
