use super::app::AppConfig;

/// Upper bound for `max_retries`.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid max_retries: {configured} (limit: {limit})")]
    MaxRetries { configured: u32, limit: u32 },
    #[error("Invalid retry_initial_wait_seconds: {configured} (must be greater than 0)")]
    InitialWait { configured: f64 },
    #[error("Invalid retry_backoff_factor: {configured} (must be at least 1)")]
    BackoffFactor { configured: f64 },
    #[error("Missing tenant setting: {0}")]
    MissingTenantSetting(&'static str),
    #[error("Missing {setting} for {auth_method} authentication")]
    MissingCredential {
        auth_method: &'static str,
        setting: &'static str,
    },
    #[error("change_logo is enabled but no logo_path is configured")]
    MissingLogoPath,
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::MaxRetries { configured, limit } => format!(
                "Too many retries configured!\n\
                Your configured value: {configured}\n\
                Maximum: {limit}\n\
                Please update max_retries in the [branding] section of config.toml."
            ),
            ConfigValidationError::InitialWait { configured } => format!(
                "Retry wait must be positive!\n\
                Your configured value: {configured} seconds\n\
                Please update retry_initial_wait_seconds in the [branding] section of config.toml."
            ),
            ConfigValidationError::BackoffFactor { configured } => format!(
                "Retry backoff factor too small!\n\
                Your configured value: {configured}\n\
                Please set retry_backoff_factor in the [branding] section of config.toml to 1 or more."
            ),
            ConfigValidationError::MissingTenantSetting(setting) => format!(
                "Tenant {setting} is not configured!\n\
                Please set {setting} in the [tenant] section of config.toml \
                or the TENANT__{} environment variable.",
                setting.to_uppercase()
            ),
            ConfigValidationError::MissingCredential {
                auth_method,
                setting,
            } => format!(
                "Authentication method '{auth_method}' needs {setting}!\n\
                Please set {setting} in the [tenant] section of config.toml \
                or the TENANT__{} environment variable.",
                setting.to_uppercase()
            ),
            ConfigValidationError::MissingLogoPath => "Logo change is enabled but no logo file is configured!\n\
                Please set logo_path in the [branding] section of config.toml, \
                or set change_logo = false."
                .to_string(),
        }
    }
}

/// Configuration loading result
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
}

impl ConfigLoadResult {
    pub fn into_result(self) -> Result<AppConfig, String> {
        match self {
            ConfigLoadResult::Success(config) => Ok(*config),
            ConfigLoadResult::LoadError(e) | ConfigLoadResult::DeserializeError(e) => Err(e),
        }
    }
}
