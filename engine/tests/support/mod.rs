#![allow(dead_code)]

use async_trait::async_trait;
use engine::SiteApiError;
use engine::site::{SiteApi, UploadedFile};
use engine::theme::ResolvedTheme;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

pub const ADMIN_URL: &str = "https://contoso-admin.sharepoint.com";

/// In-memory site API that records every call and fails on demand.
///
/// Calls are recorded as `"operation"` or `"operation:argument"` strings so
/// tests can assert on the exact sequence.
#[derive(Default)]
pub struct ScriptedSite {
    calls: Mutex<Vec<String>>,
    unreachable: HashSet<String>,
    failing: HashSet<&'static str>,
    throttles: Mutex<HashMap<&'static str, u32>>,
    subsites: HashMap<String, Vec<String>>,
    tenant_themes: HashMap<String, ResolvedTheme>,
    applied: Mutex<Vec<ResolvedTheme>>,
    connected: Mutex<Option<String>>,
}

impl ScriptedSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connecting to `url` always fails.
    pub fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.insert(url.to_string());
        self
    }

    /// Every call of `operation` fails with a non-transient error.
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    /// The next `count` calls of `operation` are throttled.
    pub fn throttled(self, operation: &'static str, count: u32) -> Self {
        self.throttles.lock().unwrap().insert(operation, count);
        self
    }

    pub fn with_subsites(mut self, url: &str, subsites: &[&str]) -> Self {
        self.subsites.insert(
            url.to_string(),
            subsites.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Registers a theme that `get_theme` returns by name.
    pub fn with_tenant_theme(mut self, theme: ResolvedTheme) -> Self {
        self.tenant_themes.insert(theme.name.clone(), theme);
        self
    }

    /// Themes successfully applied, in order.
    pub fn applied_themes(&self) -> Vec<ResolvedTheme> {
        self.applied.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.split(':').next() == Some(operation))
            .count()
    }

    pub fn connected_to(&self) -> Option<String> {
        self.connected.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, argument: Option<&str>) -> Result<(), SiteApiError> {
        let entry = match argument {
            Some(argument) => format!("{operation}:{argument}"),
            None => operation.to_string(),
        };
        self.calls.lock().unwrap().push(entry);

        if let Some(remaining) = self.throttles.lock().unwrap().get_mut(operation) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(SiteApiError::throttled(operation, 429, Some(1)));
            }
        }

        if self.failing.contains(operation) {
            return Err(SiteApiError::http(operation, 500, "scripted failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl SiteApi for ScriptedSite {
    async fn connect(&self, url: &str) -> Result<(), SiteApiError> {
        *self.connected.lock().unwrap() = None;
        self.record("connect", Some(url))?;
        if self.unreachable.contains(url) {
            return Err(SiteApiError::http("connect", 404, "site not found"));
        }
        *self.connected.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn disconnect(&self) {
        self.calls.lock().unwrap().push("disconnect".to_string());
        *self.connected.lock().unwrap() = None;
    }

    async fn ensure_container(&self, name: &str) -> Result<(), SiteApiError> {
        self.record("ensure_container", Some(name))
    }

    async fn upload_file(
        &self,
        local_path: &Path,
        container: &str,
    ) -> Result<UploadedFile, SiteApiError> {
        self.record("upload_file", Some(container))?;
        let file_name = local_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(UploadedFile {
            server_relative_url: format!("/sites/test/{container}/{file_name}"),
        })
    }

    async fn set_logo(&self, _url: &str) -> Result<(), SiteApiError> {
        self.record("set_logo", None)
    }

    async fn set_logo_legacy(&self, _url: &str) -> Result<(), SiteApiError> {
        self.record("set_logo_legacy", None)
    }

    async fn create_theme(
        &self,
        theme: &ResolvedTheme,
        _overwrite: bool,
    ) -> Result<(), SiteApiError> {
        let argument = format!("{}/{}", theme.name, theme.palette.name());
        self.record("create_theme", Some(&argument))
    }

    async fn get_theme(&self, name: &str) -> Result<ResolvedTheme, SiteApiError> {
        self.record("get_theme", Some(name))?;
        self.tenant_themes
            .get(name)
            .cloned()
            .ok_or_else(|| SiteApiError::http("get_theme", 404, "theme not found"))
    }

    async fn delete_theme(&self, name: &str) -> Result<(), SiteApiError> {
        self.record("delete_theme", Some(name))
    }

    async fn apply_theme(&self, theme: &ResolvedTheme) -> Result<(), SiteApiError> {
        self.record("apply_theme", Some(&theme.name))?;
        self.applied.lock().unwrap().push(theme.clone());
        Ok(())
    }

    async fn apply_theme_direct(&self, theme: &ResolvedTheme) -> Result<(), SiteApiError> {
        self.record("apply_theme_direct", Some(&theme.name))?;
        self.applied.lock().unwrap().push(theme.clone());
        Ok(())
    }

    async fn list_subsites(&self) -> Result<Vec<String>, SiteApiError> {
        self.record("list_subsites", None)?;
        let connected = self.connected_to().unwrap_or_default();
        Ok(self.subsites.get(&connected).cloned().unwrap_or_default())
    }
}
