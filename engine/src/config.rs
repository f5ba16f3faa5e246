use serde::Deserialize;
use std::{env, path::PathBuf};

/// TOML configuration for Phonebooth hosts.
///
/// Loaded from `$PHONEBOOTH_CONFIG` or `~/.phonebooth/config.toml`; every
/// section is optional and a missing file is not an error.
#[derive(Debug, Default, Deserialize)]
pub struct BoothConfig {
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Override for the settings database path.
    pub path: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl BoothConfig {
    /// Load the config file if present.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read { path, source: err });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse { path, source: err })
            }
        }
    }

    /// Resolved settings database path: the config override, or
    /// `settings.db` under the data directory.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.storage
            .as_ref()
            .and_then(|storage| storage.path.as_ref())
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("settings.db"))
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("PHONEBOOTH_CONFIG") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir().map(|home| home.join(".phonebooth").join("config.toml"))
}

/// Base data directory for Phonebooth (settings database, logs).
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir().map_or_else(
        || PathBuf::from(".").join("phonebooth"),
        |path| path.join("phonebooth"),
    )
}

#[cfg(test)]
mod tests {
    use super::BoothConfig;
    use std::path::PathBuf;

    #[test]
    fn empty_config_parses_with_defaults() {
        let config: BoothConfig = toml::from_str("").unwrap();
        assert!(config.storage.is_none());
        assert!(config.settings_path().ends_with("settings.db"));
    }

    #[test]
    fn storage_path_override_wins() {
        let config: BoothConfig = toml::from_str(
            r#"
            [storage]
            path = "/tmp/booth/custom.db"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.settings_path(),
            PathBuf::from("/tmp/booth/custom.db")
        );
    }

    #[test]
    fn unknown_sections_are_ignored() {
        let config: BoothConfig = toml::from_str(
            r#"
            [future]
            knob = true
            "#,
        )
        .unwrap();
        assert!(config.storage.is_none());
    }
}
