//! Persistent client configuration
//!
//! Stored with confy under `~/.config/stratfin/config.yml` (platform
//! equivalent elsewhere). Command-line flags override stored values for a
//! single run; `config --save` writes them back.

use std::path::{Path, PathBuf};

use stratfin_types::ClientConfig;
use thiserror::Error;

const APP_NAME: &str = "stratfin";
const CONFIG_NAME: &str = "config";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[source] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),
}

pub fn load() -> Result<ClientConfig, ConfigError> {
    confy::load(APP_NAME, CONFIG_NAME).map_err(ConfigError::Load)
}

pub fn store(config: &ClientConfig) -> Result<(), ConfigError> {
    confy::store(APP_NAME, CONFIG_NAME, config).map_err(ConfigError::Save)
}

pub fn path() -> Result<PathBuf, ConfigError> {
    confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(ConfigError::Load)
}

pub fn load_from(path: &Path) -> Result<ClientConfig, ConfigError> {
    confy::load_path(path).map_err(ConfigError::Load)
}

pub fn store_to(path: &Path, config: &ClientConfig) -> Result<(), ConfigError> {
    confy::store_path(path, config).map_err(ConfigError::Save)
}

/// Per-run overrides from command-line flags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, config: &mut ClientConfig) {
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            config.request_timeout_secs = timeout;
        }
    }
}
