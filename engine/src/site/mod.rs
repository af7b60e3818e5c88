//! The site API contract every component talks to, and the SharePoint
//! Online implementation of it.

pub mod sharepoint;
pub mod urls;

pub use sharepoint::SharePointClient;

use crate::common::SiteApiError;
use crate::theme::ResolvedTheme;
use async_trait::async_trait;
use std::path::Path;

/// File stored in a site's asset container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub server_relative_url: String,
}

/// Operations the branding workflow needs from the remote platform.
///
/// An implementation holds at most one active connection. [`connect`]
/// replaces whatever connection was active, and every other call runs
/// against the currently connected site (or the tenant admin site after
/// connecting to the admin URL).
///
/// [`connect`]: SiteApi::connect
#[async_trait]
pub trait SiteApi: Send + Sync {
    async fn connect(&self, url: &str) -> Result<(), SiteApiError>;

    async fn disconnect(&self);

    /// Makes sure the named asset container exists, creating it if needed.
    async fn ensure_container(&self, name: &str) -> Result<(), SiteApiError>;

    async fn upload_file(
        &self,
        local_path: &Path,
        container: &str,
    ) -> Result<UploadedFile, SiteApiError>;

    /// Sets the site logo through the modern site icon manager.
    async fn set_logo(&self, url: &str) -> Result<(), SiteApiError>;

    /// Sets the site logo through the classic `SiteLogoUrl` web property.
    async fn set_logo_legacy(&self, url: &str) -> Result<(), SiteApiError>;

    /// Registers the theme with the tenant. Needs an admin connection.
    async fn create_theme(&self, theme: &ResolvedTheme, overwrite: bool)
    -> Result<(), SiteApiError>;

    /// Reads a registered tenant theme back. Needs an admin connection.
    async fn get_theme(&self, name: &str) -> Result<ResolvedTheme, SiteApiError>;

    /// Removes a tenant theme. Needs an admin connection.
    async fn delete_theme(&self, name: &str) -> Result<(), SiteApiError>;

    async fn apply_theme(&self, theme: &ResolvedTheme) -> Result<(), SiteApiError>;

    /// Applies the theme by calling the theme manager utility directly.
    async fn apply_theme_direct(&self, theme: &ResolvedTheme) -> Result<(), SiteApiError>;

    /// Every descendant web of the connected site, root excluded.
    async fn list_subsites(&self) -> Result<Vec<String>, SiteApiError>;
}
