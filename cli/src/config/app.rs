use super::{LoggingConfig, tenant::AuthMethod, tenant::TenantConfig, validation::*};
use crate::args::Args;
use engine::BrandingConfig;
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    tenant: TenantConfig,
    #[serde(default)]
    branding: BrandingConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl AppConfig {
    pub fn tenant(&self) -> &TenantConfig {
        &self.tenant
    }

    pub fn branding(&self) -> &BrandingConfig {
        &self.branding
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    /// Command line flags win over file and environment values.
    pub fn apply_overrides(&mut self, args: &Args) {
        if args.process_subsites {
            self.branding.process_subsites = true;
        }
        if let Some(color_theme) = &args.color_theme {
            self.branding.color_theme_name = color_theme.clone();
        }
    }

    /// Validate the configuration against defined limits
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();
        let branding = &self.branding;

        if branding.max_retries > MAX_RETRIES_LIMIT {
            errors.push(ConfigValidationError::MaxRetries {
                configured: branding.max_retries,
                limit: MAX_RETRIES_LIMIT,
            });
        }

        if branding.retry_initial_wait_seconds <= 0.0 {
            errors.push(ConfigValidationError::InitialWait {
                configured: branding.retry_initial_wait_seconds,
            });
        }

        if branding.retry_backoff_factor < 1.0 {
            errors.push(ConfigValidationError::BackoffFactor {
                configured: branding.retry_backoff_factor,
            });
        }

        if branding.change_logo && branding.logo_path.is_none() {
            errors.push(ConfigValidationError::MissingLogoPath);
        }

        let tenant = &self.tenant;
        for (setting, value) in [
            ("name", tenant.name()),
            ("tenant_id", tenant.tenant_id()),
            ("client_id", tenant.client_id()),
        ] {
            if value.is_none() {
                errors.push(ConfigValidationError::MissingTenantSetting(setting));
            }
        }

        match tenant.auth_method() {
            AuthMethod::Certificate => {
                if tenant.certificate_thumbprint().is_none() {
                    errors.push(ConfigValidationError::MissingCredential {
                        auth_method: AuthMethod::Certificate.as_str(),
                        setting: "certificate_thumbprint",
                    });
                }
                if tenant.certificate_key_path().is_none() {
                    errors.push(ConfigValidationError::MissingCredential {
                        auth_method: AuthMethod::Certificate.as_str(),
                        setting: "certificate_key_path",
                    });
                }
            }
            AuthMethod::ClientSecret => {
                if !tenant.has_client_secret() {
                    errors.push(ConfigValidationError::MissingCredential {
                        auth_method: AuthMethod::ClientSecret.as_str(),
                        setting: "client_secret",
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
