use crate::common::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything that controls how a site gets branded.
///
/// Built once at startup and never changed during a run. Values missing from
/// the configuration source fall back to [`BrandingConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingConfig {
    /// Local logo image to upload
    pub logo_path: Option<PathBuf>,
    pub change_logo: bool,
    pub apply_theme_colors: bool,
    /// Apply a tenant theme that already exists instead of recreating it
    pub apply_existing_theme: bool,
    pub process_subsites: bool,
    /// Catalog palette to build the theme from
    pub color_theme_name: String,
    /// Name the tenant theme is registered under
    pub theme_name: String,
    pub overwrite_theme: bool,
    pub max_retries: u32,
    pub retry_initial_wait_seconds: f64,
    pub retry_backoff_factor: f64,
    /// Document library the logo is uploaded to
    pub asset_container: String,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            logo_path: None,
            change_logo: true,
            apply_theme_colors: true,
            apply_existing_theme: false,
            process_subsites: false,
            color_theme_name: "Green".to_string(),
            theme_name: "Corporate Theme".to_string(),
            overwrite_theme: true,
            max_retries: retry.max_retries,
            retry_initial_wait_seconds: retry.initial_wait_seconds,
            retry_backoff_factor: retry.backoff_factor,
            asset_container: "SiteAssets".to_string(),
        }
    }
}

impl BrandingConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            self.retry_initial_wait_seconds,
            self.retry_backoff_factor,
        )
    }

    /// Theme colours are requested and there is a theme name to register
    /// them under.
    pub fn theme_requested(&self) -> bool {
        self.apply_theme_colors && !self.theme_name.trim().is_empty()
    }
}
