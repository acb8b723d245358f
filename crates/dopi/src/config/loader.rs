use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::ConfigError;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "DOPI_CONFIG";

/// `$DOPI_CONFIG`, or `<platform config dir>/dopi/config.json`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("dopi").join("config.json"))
        .ok_or(ConfigError::NoConfigDir)
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Writes the config as pretty JSON, creating parent directories.
pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), ConfigError> {
    let path = path.as_ref();
    validate_config(config)?;

    let write_err = |e| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json).map_err(write_err)?;

    log::info!("Saved configuration to {}", path.display());
    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.storage_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation {
            message: "Storage path must not be empty".to_string(),
        });
    }
    if config.ocr_languages.iter().any(|l| l.trim().is_empty()) {
        return Err(ConfigError::Validation {
            message: "OCR languages must not contain empty entries".to_string(),
        });
    }
    Ok(())
}
