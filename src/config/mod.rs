pub mod env;
pub mod loader;
pub mod types;

pub use loader::{load_config, validate_config};
pub use types::SpotgateConfig;
