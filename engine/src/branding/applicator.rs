use super::config::BrandingConfig;
use super::fallback::{candidate, first_success};
use crate::common::{BrandingError, RetryPolicy, SiteApiError, execute_with_retry};
use crate::site::SiteApi;
use crate::theme::{ResolvedTheme, resolve_palette};
use std::path::{Path, PathBuf};

/// Applies the configured logo and theme to one site at a time.
///
/// The applicator never owns a connection. It expects the site to be
/// connected when [`apply`](Self::apply) is called and leaves the API
/// connected to the same site when theming succeeds. Disconnecting is the
/// caller's job.
pub struct BrandingApplicator {
    config: BrandingConfig,
    theme: Option<ResolvedTheme>,
    admin_url: String,
    retry: RetryPolicy,
}

impl BrandingApplicator {
    pub fn new(config: BrandingConfig, admin_url: impl Into<String>) -> Self {
        let theme = config.theme_requested().then(|| {
            ResolvedTheme::new(
                config.theme_name.clone(),
                resolve_palette(&config.color_theme_name),
            )
        });
        let retry = config.retry_policy();

        Self {
            config,
            theme,
            admin_url: admin_url.into(),
            retry,
        }
    }

    pub fn config(&self) -> &BrandingConfig {
        &self.config
    }

    pub fn admin_url(&self) -> &str {
        &self.admin_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// The theme that will be registered and applied, if theming is on.
    pub fn resolved_theme(&self) -> Option<&ResolvedTheme> {
        self.theme.as_ref()
    }

    /// Brands the currently connected site.
    ///
    /// Logo problems fail the site. Theme problems only fail it when the
    /// admin endpoint or the site itself cannot be reached again.
    pub async fn apply<A: SiteApi + ?Sized>(
        &self,
        api: &A,
        site_url: &str,
    ) -> Result<(), BrandingError> {
        if !self.config.change_logo && !self.config.apply_theme_colors {
            log::info!("No branding changes requested for {site_url}");
            return Ok(());
        }

        if self.config.change_logo {
            self.apply_logo(api, site_url).await?;
        } else {
            log::info!("Logo change disabled, skipping logo for {site_url}");
        }

        match &self.theme {
            Some(theme) => self.apply_theme(api, site_url, theme).await?,
            None if self.config.apply_theme_colors => {
                log::warn!("Theme colors requested but no theme name configured, skipping theme for {site_url}");
            }
            None => log::info!("Theme colors disabled, skipping theme for {site_url}"),
        }

        log::info!("Branding completed for {site_url}");
        Ok(())
    }

    async fn apply_logo<A: SiteApi + ?Sized>(
        &self,
        api: &A,
        site_url: &str,
    ) -> Result<(), BrandingError> {
        let logo_path = match self.config.logo_path.as_deref() {
            Some(path) if path.is_file() => path,
            other => {
                let path = other.map(Path::to_path_buf).unwrap_or_else(PathBuf::new);
                log::error!("Logo file not found: {}", path.display());
                return Err(BrandingError::LogoNotFound(path));
            }
        };
        let container = self.config.asset_container.as_str();

        log::info!("Uploading logo {} to {site_url}", logo_path.display());

        let upload_failed = |source: SiteApiError| {
            log::error!("Failed to upload logo to {site_url}: {source}");
            BrandingError::LogoUpload {
                site: site_url.to_string(),
                source,
            }
        };

        execute_with_retry("ensure_container", &self.retry, move || {
            api.ensure_container(container)
        })
        .await
        .map_err(upload_failed)?;

        let uploaded = execute_with_retry("upload_file", &self.retry, move || {
            api.upload_file(logo_path, container)
        })
        .await
        .map_err(upload_failed)?;

        let logo_url = uploaded.server_relative_url.as_str();
        log::info!("Logo uploaded to {logo_url}");

        let methods = vec![
            candidate(
                "primary",
                execute_with_retry("set_logo", &self.retry, move || api.set_logo(logo_url)),
            ),
            candidate(
                "legacy",
                execute_with_retry("set_logo_legacy", &self.retry, move || {
                    api.set_logo_legacy(logo_url)
                }),
            ),
        ];

        match first_success("set_logo", methods).await {
            Ok(()) => {
                log::info!("Logo set for {site_url}");
                Ok(())
            }
            Err(source) => {
                log::error!("Failed to set logo on {site_url}: {source}");
                Err(BrandingError::LogoNotSet {
                    site: site_url.to_string(),
                    source,
                })
            }
        }
    }

    async fn apply_theme<A: SiteApi + ?Sized>(
        &self,
        api: &A,
        site_url: &str,
        theme: &ResolvedTheme,
    ) -> Result<(), BrandingError> {
        let admin_url = self.admin_url.as_str();
        if let Err(source) =
            execute_with_retry("connect_admin", &self.retry, move || api.connect(admin_url))
                .await
        {
            log::error!("Failed to connect to admin endpoint {admin_url}: {source}");
            return Err(BrandingError::AdminConnect {
                admin_url: admin_url.to_string(),
                source,
            });
        }

        let existing;
        let target = if self.config.apply_existing_theme {
            existing = self.fetch_existing_theme(api, &theme.name).await;
            existing.as_ref()
        } else {
            log::info!(
                "Applying theme '{}' ({} palette) to {site_url}",
                theme.name,
                theme.palette.name()
            );
            self.register_theme(api, theme).await;
            Some(theme)
        };

        if let Err(source) =
            execute_with_retry("connect", &self.retry, move || api.connect(site_url)).await
        {
            log::error!("Failed to reconnect to {site_url}: {source}");
            return Err(BrandingError::Reconnect {
                site: site_url.to_string(),
                source,
            });
        }

        let Some(theme) = target else {
            log::error!(
                "Theme '{}' not applied to {site_url}: the tenant definition is unavailable",
                theme.name
            );
            return Ok(());
        };

        let methods = vec![
            candidate(
                "primary",
                execute_with_retry("apply_theme", &self.retry, move || api.apply_theme(theme)),
            ),
            candidate(
                "direct",
                execute_with_retry("apply_theme_direct", &self.retry, move || {
                    api.apply_theme_direct(theme)
                }),
            ),
        ];

        match first_success("apply_theme", methods).await {
            Ok(()) => log::info!("Theme '{}' applied to {site_url}", theme.name),
            Err(failure) => {
                log::error!(
                    "Failed to apply theme '{}' to {site_url}: {failure}",
                    theme.name
                );
            }
        }

        Ok(())
    }

    /// Reads the registered tenant theme while the admin connection is
    /// active. A failed read is logged and yields `None`.
    async fn fetch_existing_theme<A: SiteApi + ?Sized>(
        &self,
        api: &A,
        name: &str,
    ) -> Option<ResolvedTheme> {
        match execute_with_retry("get_theme", &self.retry, move || api.get_theme(name)).await {
            Ok(existing) => {
                log::info!("Using the existing tenant theme '{name}'");
                Some(existing)
            }
            Err(e) => {
                log::error!("Failed to read the existing tenant theme '{name}': {e}");
                None
            }
        }
    }

    /// Replaces the tenant theme. Neither step is fatal.
    async fn register_theme<A: SiteApi + ?Sized>(&self, api: &A, theme: &ResolvedTheme) {
        let name = theme.name.as_str();
        match execute_with_retry("delete_theme", &self.retry, move || api.delete_theme(name))
            .await
        {
            Ok(()) => log::info!("Removed existing tenant theme '{name}'"),
            Err(e) => log::info!("Tenant theme '{name}' was not removed (it may not exist): {e}"),
        }

        let overwrite = self.config.overwrite_theme;
        match execute_with_retry("create_theme", &self.retry, move || {
            api.create_theme(theme, overwrite)
        })
        .await
        {
            Ok(()) => log::info!("Tenant theme '{name}' created"),
            Err(e) => log::error!("Failed to create tenant theme '{name}': {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_resolved_once_at_construction() {
        let applicator = BrandingApplicator::new(
            BrandingConfig {
                color_theme_name: "Teal".to_string(),
                theme_name: "Brand".to_string(),
                ..Default::default()
            },
            "https://contoso-admin.sharepoint.com",
        );
        let theme = applicator.resolved_theme().unwrap();
        assert_eq!(theme.name, "Brand");
        assert_eq!(theme.palette.name(), "Teal");
    }

    #[test]
    fn test_no_theme_when_colors_disabled() {
        let applicator = BrandingApplicator::new(
            BrandingConfig {
                apply_theme_colors: false,
                ..Default::default()
            },
            "https://contoso-admin.sharepoint.com",
        );
        assert!(applicator.resolved_theme().is_none());
    }

    #[test]
    fn test_unknown_palette_falls_back() {
        let applicator = BrandingApplicator::new(
            BrandingConfig {
                color_theme_name: "Chartreuse".to_string(),
                ..Default::default()
            },
            "https://contoso-admin.sharepoint.com",
        );
        assert_eq!(applicator.resolved_theme().unwrap().palette.name(), "Green");
    }
}
