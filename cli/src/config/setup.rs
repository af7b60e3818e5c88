use std::path::PathBuf;
use thiserror::Error;

const APP_DIR: &str = "sitebrand";
const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Failed to determine config directory: {0}")]
    ConfigDir(String),
}

/// Get the standard configuration directory for the current platform
pub fn get_config_dir() -> Result<PathBuf, SetupError> {
    dirs::config_dir()
        .map(|mut path| {
            path.push(APP_DIR);
            path
        })
        .ok_or_else(|| SetupError::ConfigDir("Unable to determine config directory".to_string()))
}

/// Get the standard configuration file path
pub fn get_config_file_path() -> Result<PathBuf, SetupError> {
    let mut config_dir = get_config_dir()?;
    config_dir.push(CONFIG_FILE);
    Ok(config_dir)
}

/// Find config file using discovery priority
pub fn find_config_file() -> Option<PathBuf> {
    // 1. ./config.toml
    // 2. Standard OS config directory
    let current_dir_config = PathBuf::from(CONFIG_FILE);
    if current_dir_config.exists() {
        return Some(current_dir_config);
    }

    match get_config_file_path() {
        Ok(standard_config) if standard_config.exists() => Some(standard_config),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_lives_in_app_dir() {
        if let Ok(path) = get_config_file_path() {
            assert!(path.ends_with("sitebrand/config.toml"));
        }
    }
}
