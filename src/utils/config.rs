// User configuration and TOML parsing

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::framework::Framework;
use crate::utils::error::{CliError, Result};
use crate::utils::logging::LogLevel;

/// Directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "create-privy-app";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Defaults a user can pin in `config.toml`; CLI flags always win
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    /// Framework used when `--framework` is not given
    #[serde(default)]
    pub framework: Option<Framework>,
    /// Verbosity used when no verbosity flag is given
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

/// Configuration loading utilities
pub struct ConfigParser;

impl ConfigParser {
    /// Location of the user config file, if the platform has a config dir
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the user config from its default location, falling back to defaults
    pub fn load_user_config() -> Result<UserConfig> {
        match Self::default_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(UserConfig::default()),
        }
    }

    /// Load from an explicit file. A missing file yields the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<UserConfig> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(UserConfig::default()),
            Err(e) => {
                return Err(CliError::new(format!("Failed to read {}: {}", path.display(), e)));
            }
        };

        Self::parse(&content)
            .map_err(|e| CliError::new(format!("Invalid configuration in {}: {}", path.display(), e)))
    }

    /// Parse config TOML
    pub fn parse(content: &str) -> std::result::Result<UserConfig, toml::de::Error> {
        toml::from_str(content)
    }
}
