use std::fs;
use std::path::PathBuf;

use crate::model::config::Config;

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine a config directory for this platform")]
    NoConfigDir,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not serialize config.toml: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Resolve the config file path: `$TM_CONFIG` if set, otherwise
/// `<platform config dir>/taskmaster/config.toml`.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var("TM_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join("taskmaster").join("config.toml"))
}

/// Read the config file. A missing file is not an error: first run
/// happens before `tm login`, so defaults apply.
pub fn read_config() -> Result<Config, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let config: Config = toml::from_str(&text)?;
    Ok(config)
}

/// Write the config file, creating parent directories as needed.
pub fn write_config(config: &Config) -> Result<(), ConfigError> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let text = toml::to_string_pretty(config)?;
    fs::write(&path, text).map_err(|e| ConfigError::WriteError {
        path: path.clone(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // These tests set TM_CONFIG, so they must not run in parallel with
    // each other. A process-wide lock keeps them serialized.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn test_missing_file_yields_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        unsafe { std::env::set_var("TM_CONFIG", dir.path().join("config.toml")) };

        let config = read_config().unwrap();
        assert_eq!(config.service.base_url, "http://localhost:3000");

        unsafe { std::env::remove_var("TM_CONFIG") };
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        unsafe { std::env::set_var("TM_CONFIG", dir.path().join("nested").join("config.toml")) };

        let mut config = Config::default();
        config.service.token = Some("secret".into());
        config.service.base_url = "https://tasks.example.com".into();
        write_config(&config).unwrap();

        let loaded = read_config().unwrap();
        assert_eq!(loaded.service.token.as_deref(), Some("secret"));
        assert_eq!(loaded.service.base_url, "https://tasks.example.com");

        unsafe { std::env::remove_var("TM_CONFIG") };
    }
}
