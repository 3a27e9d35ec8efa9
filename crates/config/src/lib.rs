mod config;
mod error;
mod loader;

pub use config::{CredoConfig, DiffMode, DEFAULT_CONFIGURATION_FILE, DEFAULT_MIX_COMMAND};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str, CONFIG_FILES};
