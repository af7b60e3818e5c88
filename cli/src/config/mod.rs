use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

pub mod app;
pub mod setup;
pub mod tenant;
pub mod validation;

pub use app::AppConfig;
pub use tenant::{AuthMethod, TenantConfig};
pub use validation::{ConfigLoadResult, ConfigValidationError};

/// Loads the configuration from a TOML file layered with environment
/// variables (`BRANDING__CHANGE_LOGO=false` overrides `[branding] change_logo`).
///
/// An explicit `path` must exist. Without one, `config.toml` is looked up in
/// the working directory and then in the user config directory; when neither
/// exists only the environment is used.
pub fn load_config(path: Option<&Path>) -> ConfigLoadResult {
    dotenv::dotenv().ok();
    let env_source = Environment::default().separator("__");

    let mut builder = Config::builder();
    match path {
        Some(path) => builder = builder.add_source(File::from(path).required(true)),
        None => match setup::find_config_file() {
            Some(found) => {
                builder = builder.add_source(File::from(found.as_path()).required(true));
            }
            None => {
                builder = builder.add_source(File::with_name("config.toml").required(false));
            }
        },
    }

    let config = match builder.add_source(env_source).build() {
        Ok(config) => config,
        Err(e) => {
            return ConfigLoadResult::LoadError(format!(
                "Configuration loading failed: {e}. Please check your config.toml file and environment variables."
            ));
        }
    };

    match config.try_deserialize::<AppConfig>() {
        Ok(app_config) => ConfigLoadResult::Success(Box::new(app_config)),
        Err(e) => ConfigLoadResult::DeserializeError(format!("Failed to deserialize config: {e}")),
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
