#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::utils::error::Result;
use std::path::Path;

/// Reads the file when one is given, otherwise starts from built-in defaults.
pub fn load(path: Option<&Path>) -> Result<TomlConfig> {
    match path {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            TomlConfig::from_file(path)
        }
        None => Ok(TomlConfig::default()),
    }
}
