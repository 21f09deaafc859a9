//! Loads [`SecretsConfig`] for the running process.

use std::path::Path;

use store::SecretsConfig;
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SECRETS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Read the file named by `SECRETS_CONFIG` (`.env` honoured).
///
/// Unset means defaults.
pub fn load() -> Result<SecretsConfig, ConfigError> {
    dotenvy::dotenv().ok();

    match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => load_from(path),
        _ => {
            tracing::debug!("{} not set, using default config", CONFIG_ENV);
            Ok(SecretsConfig::default())
        }
    }
}

pub fn load_from(path: impl AsRef<Path>) -> Result<SecretsConfig, ConfigError> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: shown.clone(),
        source,
    })?;
    let config = SecretsConfig::from_toml(&text).map_err(|source| ConfigError::Parse {
        path: shown.clone(),
        source,
    })?;
    tracing::info!("Loaded config from {}", shown);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("secrets-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[display]\nhidden_author = \"nobody\"\n").unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.display.hidden_author, "nobody");
        assert_eq!(config.listing.recent_limit, 5);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = load_from("/definitely/not/here/secrets.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_bad_toml() {
        let path = std::env::temp_dir().join(format!("secrets-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[listing]\nrecent_limit = \"five\"\n").unwrap();

        assert!(matches!(load_from(&path), Err(ConfigError::Parse { .. })));

        std::fs::remove_file(&path).unwrap();
    }
}
