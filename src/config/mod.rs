use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Explicit modules directory; skips auto-location when set
    #[serde(default)]
    pub modules_dir: Option<PathBuf>,

    /// Engine shared library to open before locating modules
    #[serde(default)]
    pub engine_library: Option<PathBuf>,

    /// Version reported by the `jagsmod` CLI's in-memory console
    ///
    /// Only the CLI reads this. Library callers get the version from the
    /// [`Console`](crate::Console) they pass to the manager.
    #[serde(default = "default_engine_version")]
    pub engine_version: String,

    #[serde(default)]
    pub locator: LocatorConfig,

    /// Modules loaded on startup, in order
    #[serde(default)]
    pub preload: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Directory name the engine installs its modules under
    #[serde(default = "default_engine_name")]
    pub engine_name: String,

    /// File-name prefixes identifying the engine library
    #[serde(default = "default_library_prefixes")]
    pub library_prefixes: Vec<String>,
}

// Default value functions
fn default_engine_version() -> String {
    "4.3.0".to_string()
}

fn default_engine_name() -> String {
    "JAGS".to_string()
}

fn default_library_prefixes() -> Vec<String> {
    vec!["jags".to_string(), "libjags".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modules_dir: None,
            engine_library: None,
            engine_version: default_engine_version(),
            locator: LocatorConfig::default(),
            preload: Vec::new(),
        }
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            engine_name: default_engine_name(),
            library_prefixes: default_library_prefixes(),
        }
    }
}

impl Config {
    /// Load configuration from default location
    ///
    /// # Errors
    /// Returns an error if the home directory is unknown or an existing file is invalid
    pub fn load_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the file cannot be read or parsed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse config file {}: {e}", path.display()))
        })
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Returns [`Error::Config`] if serialization or any file operation fails
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {e}"))
            })?;
        }

        fs::write(path, contents)
            .map_err(|e| Error::Config(format!("Failed to write config file: {e}")))
    }

    /// Get default configuration path
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the home directory cannot be determined
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Failed to get home directory".to_string()))?;

        Ok(home.join(".jagsmod").join("config.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locator_config() {
        let config = LocatorConfig::default();
        assert_eq!(config.engine_name, "JAGS");
        assert_eq!(config.library_prefixes, vec!["jags", "libjags"]);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert!(config.modules_dir.is_none());
        assert_eq!(config.engine_version, "4.3.0");
        assert_eq!(config.locator.engine_name, "JAGS");
        assert!(config.preload.is_empty());
    }

    #[test]
    fn test_config_deserialization() {
        let yaml = r#"
modules_dir: /opt/jags/lib/JAGS/modules-4
preload:
  - glm
  - dic
locator:
  library_prefixes: [libjags]
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.modules_dir,
            Some(PathBuf::from("/opt/jags/lib/JAGS/modules-4"))
        );
        assert_eq!(config.preload, vec!["glm", "dic"]);
        assert_eq!(config.locator.engine_name, "JAGS");
        assert_eq!(config.locator.library_prefixes, vec!["libjags"]);
    }
}
