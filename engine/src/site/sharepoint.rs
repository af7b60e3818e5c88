use super::urls::{normalize_site_url, odata_literal};
use super::{SiteApi, UploadedFile};
use crate::auth::{AuthProvider, CachedToken, TokenCache};
use crate::common::SiteApiError;
use crate::theme::{Palette, ResolvedTheme};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const ODATA_JSON: &str = "application/json;odata=nometadata";
const DOCUMENT_LIBRARY_TEMPLATE: u32 = 101;
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

#[derive(Debug, Clone)]
struct SiteConnection {
    web_url: String,
    server_relative_url: String,
    token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WebInfo {
    title: String,
    server_relative_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FolderInfo {
    exists: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FileInfo {
    server_relative_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WebUrl {
    url: String,
}

#[derive(Deserialize)]
struct ListResponse<T> {
    value: Vec<T>,
}

#[derive(Deserialize)]
struct BoolResponse {
    value: bool,
}

#[derive(Deserialize)]
struct TenantThemeInfo {
    #[serde(rename = "themeJson", alias = "ThemeJson")]
    theme_json: String,
}

/// [`SiteApi`] over the SharePoint Online REST API.
///
/// Tokens are requested per host (`https://<host>/.default`) and cached, so
/// moving between sites of the same tenant reuses one token while the admin
/// host gets its own.
pub struct SharePointClient {
    http_client: reqwest::Client,
    auth: Arc<dyn AuthProvider>,
    tokens: TokenCache,
    connection: RwLock<Option<SiteConnection>>,
}

impl SharePointClient {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Self::with_http_client(auth, reqwest::Client::new())
    }

    pub fn with_http_client(auth: Arc<dyn AuthProvider>, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            auth,
            tokens: TokenCache::new(),
            connection: RwLock::new(None),
        }
    }

    /// URL of the active connection, if any.
    pub async fn connected_url(&self) -> Option<String> {
        self.connection
            .read()
            .await
            .as_ref()
            .map(|connection| connection.web_url.clone())
    }

    async fn token_for(&self, url: &str) -> Result<String, SiteApiError> {
        let scope = scope_for(url)?;
        if let Some(token) = self.tokens.get(&scope).await {
            return Ok(token);
        }

        let token = self.auth.authenticate(&scope).await?;
        let value = token.token.clone();
        self.tokens
            .set(
                scope,
                CachedToken::new(
                    token.token,
                    Duration::from_secs(
                        token.expires_in_secs.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),
                    ),
                    token.token_type,
                ),
            )
            .await;
        Ok(value)
    }

    async fn current(&self) -> Result<SiteConnection, SiteApiError> {
        self.connection
            .read()
            .await
            .clone()
            .ok_or(SiteApiError::NotConnected)
    }

    async fn send(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<Response, SiteApiError> {
        let response = request
            .header(ACCEPT, ODATA_JSON)
            .send()
            .await
            .map_err(|e| SiteApiError::Network {
                operation: operation.to_string(),
                reason: e.to_string(),
                timed_out: e.is_timeout(),
            })?;
        check_status(operation, response).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        operation: &str,
        url: &str,
    ) -> Result<T, SiteApiError> {
        let response = self
            .send(operation, self.http_client.get(url).bearer_auth(token))
            .await?;
        parse_json(operation, response).await
    }

    async fn post_json(
        &self,
        connection: &SiteConnection,
        operation: &str,
        path: &str,
        body: &Value,
    ) -> Result<Response, SiteApiError> {
        let url = format!("{}{}", connection.web_url, path);
        let request = self
            .http_client
            .post(url)
            .bearer_auth(&connection.token)
            .header(CONTENT_TYPE, ODATA_JSON)
            .json(body);
        self.send(operation, request).await
    }

    async fn folder_exists(
        &self,
        connection: &SiteConnection,
        folder: &str,
    ) -> Result<bool, SiteApiError> {
        let url = format!(
            "{}/_api/web/GetFolderByServerRelativeUrl('{}')?$select=Exists",
            connection.web_url,
            urlencoding::encode(&odata_literal(folder))
        );
        match self
            .get_json::<FolderInfo>(&connection.token, "ensure_container", &url)
            .await
        {
            Ok(info) => Ok(info.exists),
            Err(error) if error.is_not_found() => Ok(false),
            Err(error) => Err(error),
        }
    }

    async fn theme_request(
        &self,
        operation: &str,
        path: &str,
        theme: &ResolvedTheme,
    ) -> Result<(), SiteApiError> {
        let connection = self.current().await?;
        let body = json!({
            "name": theme.name,
            "themeJson": theme.theme_json_string(),
        });
        self.post_json(&connection, operation, path, &body).await?;
        Ok(())
    }
}

/// OAuth scope covering every site on the URL's host.
fn scope_for(url: &str) -> Result<String, SiteApiError> {
    let parsed = Url::parse(url).map_err(|e| SiteApiError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let host = parsed.host_str().ok_or_else(|| SiteApiError::InvalidUrl {
        url: url.to_string(),
        reason: "missing host".to_string(),
    })?;
    Ok(format!("https://{host}/.default"))
}

async fn check_status(operation: &str, response: Response) -> Result<Response, SiteApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        if let Some(seconds) = retry_after {
            log::debug!("{operation} throttled, server suggested waiting {seconds}s");
        }
        return Err(SiteApiError::throttled(
            operation,
            status.as_u16(),
            retry_after,
        ));
    }

    let body = response.text().await.unwrap_or_default();
    Err(SiteApiError::http(
        operation,
        status.as_u16(),
        error_message(&body),
    ))
}

async fn parse_json<T: DeserializeOwned>(
    operation: &str,
    response: Response,
) -> Result<T, SiteApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| SiteApiError::InvalidResponse {
            operation: operation.to_string(),
            reason: e.to_string(),
        })
}

/// Whether a failed AddTenantTheme call means the name is already taken.
fn theme_already_exists(error: &SiteApiError) -> bool {
    match error {
        SiteApiError::Http {
            status, message, ..
        } => *status == 409 || message.to_ascii_lowercase().contains("already exists"),
        _ => false,
    }
}

/// Pulls the human readable message out of a SharePoint error body.
fn error_message(body: &str) -> String {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return body.chars().take(300).collect(),
    };

    ["odata.error", "error"]
        .iter()
        .find_map(|key| {
            let message = &parsed[*key]["message"];
            message["value"]
                .as_str()
                .or_else(|| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(300).collect())
}

#[async_trait]
impl SiteApi for SharePointClient {
    async fn connect(&self, url: &str) -> Result<(), SiteApiError> {
        self.connection.write().await.take();

        let web_url = normalize_site_url(url);
        let token = self.token_for(&web_url).await?;
        let info: WebInfo = match self
            .get_json(
                &token,
                "connect",
                &format!("{web_url}/_api/web?$select=Title,ServerRelativeUrl"),
            )
            .await
        {
            Ok(info) => info,
            Err(error) => {
                // a rejected token must not be reused by the next attempt
                if error.status() == Some(401) {
                    self.tokens.invalidate(&scope_for(&web_url)?).await;
                }
                return Err(error);
            }
        };

        log::info!("Connected to {web_url} ({})", info.title);
        *self.connection.write().await = Some(SiteConnection {
            web_url,
            server_relative_url: info.server_relative_url.trim_end_matches('/').to_string(),
            token,
        });
        Ok(())
    }

    async fn disconnect(&self) {
        if let Some(connection) = self.connection.write().await.take() {
            log::debug!("Disconnected from {}", connection.web_url);
        }
    }

    async fn ensure_container(&self, name: &str) -> Result<(), SiteApiError> {
        let connection = self.current().await?;
        let folder = format!("{}/{}", connection.server_relative_url, name);

        if self.folder_exists(&connection, &folder).await? {
            log::debug!("Asset container '{name}' already exists on {}", connection.web_url);
            return Ok(());
        }

        let body = json!({
            "Title": name,
            "BaseTemplate": DOCUMENT_LIBRARY_TEMPLATE,
        });
        self.post_json(&connection, "ensure_container", "/_api/web/lists", &body)
            .await?;
        log::info!("Created asset container '{name}' on {}", connection.web_url);
        Ok(())
    }

    async fn upload_file(
        &self,
        local_path: &Path,
        container: &str,
    ) -> Result<UploadedFile, SiteApiError> {
        let connection = self.current().await?;
        let file_name = local_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| SiteApiError::Io {
                path: local_path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "file name is missing or not valid UTF-8",
                ),
            })?;
        let content = tokio::fs::read(local_path)
            .await
            .map_err(|source| SiteApiError::Io {
                path: local_path.to_path_buf(),
                source,
            })?;

        let folder = format!("{}/{}", connection.server_relative_url, container);
        let url = format!(
            "{}/_api/web/GetFolderByServerRelativeUrl('{}')/Files/add(url='{}',overwrite=true)",
            connection.web_url,
            urlencoding::encode(&odata_literal(&folder)),
            urlencoding::encode(&odata_literal(file_name)),
        );
        let request = self
            .http_client
            .post(url)
            .bearer_auth(&connection.token)
            .body(content);
        let response = self.send("upload_file", request).await?;
        let file: FileInfo = parse_json("upload_file", response).await?;

        Ok(UploadedFile {
            server_relative_url: file.server_relative_url,
        })
    }

    async fn set_logo(&self, url: &str) -> Result<(), SiteApiError> {
        let connection = self.current().await?;
        let body = json!({
            "relativeLogoUrl": url,
            "type": 0,
            "aspect": 0,
        });
        self.post_json(
            &connection,
            "set_logo",
            "/_api/siteiconmanager/setsitelogo",
            &body,
        )
        .await?;
        Ok(())
    }

    async fn set_logo_legacy(&self, url: &str) -> Result<(), SiteApiError> {
        let connection = self.current().await?;
        let request = self
            .http_client
            .post(format!("{}/_api/web", connection.web_url))
            .bearer_auth(&connection.token)
            .header(CONTENT_TYPE, ODATA_JSON)
            .header("X-HTTP-Method", "MERGE")
            .header("IF-MATCH", "*")
            .json(&json!({ "SiteLogoUrl": url }));
        self.send("set_logo_legacy", request).await?;
        Ok(())
    }

    async fn create_theme(
        &self,
        theme: &ResolvedTheme,
        overwrite: bool,
    ) -> Result<(), SiteApiError> {
        let connection = self.current().await?;
        let body = json!({
            "name": theme.name,
            "themeJson": theme.theme_json_string(),
        });

        let added = match self
            .post_json(
                &connection,
                "create_theme",
                "/_api/thememanager/AddTenantTheme",
                &body,
            )
            .await
        {
            Ok(response) => parse_json::<BoolResponse>("create_theme", response)
                .await
                .map(|result| result.value)
                .unwrap_or(true),
            Err(error) if overwrite && theme_already_exists(&error) => {
                log::warn!("Adding theme '{}' failed: {error}", theme.name);
                false
            }
            Err(error) => return Err(error),
        };

        if added {
            return Ok(());
        }
        if !overwrite {
            return Err(SiteApiError::http(
                "create_theme",
                409,
                format!("theme '{}' already exists", theme.name),
            ));
        }

        log::info!("Theme '{}' exists, updating its definition", theme.name);
        self.post_json(
            &connection,
            "update_theme",
            "/_api/thememanager/UpdateTenantTheme",
            &body,
        )
        .await?;
        Ok(())
    }

    async fn get_theme(&self, name: &str) -> Result<ResolvedTheme, SiteApiError> {
        let connection = self.current().await?;
        let response = self
            .post_json(
                &connection,
                "get_theme",
                "/_api/thememanager/GetTenantTheme",
                &json!({ "name": name }),
            )
            .await?;
        let info: TenantThemeInfo = parse_json("get_theme", response).await?;

        let invalid = |reason: String| SiteApiError::InvalidResponse {
            operation: "get_theme".to_string(),
            reason,
        };
        let definition: Value =
            serde_json::from_str(&info.theme_json).map_err(|e| invalid(e.to_string()))?;
        let palette = Palette::from_json(name, &definition)
            .ok_or_else(|| invalid(format!("theme '{name}' has no palette")))?;
        Ok(ResolvedTheme::new(name, palette))
    }

    async fn delete_theme(&self, name: &str) -> Result<(), SiteApiError> {
        let connection = self.current().await?;
        self.post_json(
            &connection,
            "delete_theme",
            "/_api/thememanager/DeleteTenantTheme",
            &json!({ "name": name }),
        )
        .await?;
        Ok(())
    }

    async fn apply_theme(&self, theme: &ResolvedTheme) -> Result<(), SiteApiError> {
        self.theme_request("apply_theme", "/_api/ThemeManager/ApplyTheme", theme)
            .await
    }

    async fn apply_theme_direct(&self, theme: &ResolvedTheme) -> Result<(), SiteApiError> {
        self.theme_request(
            "apply_theme_direct",
            "/_api/SP.Utilities.ThemeManager.ApplyTheme",
            theme,
        )
        .await
    }

    async fn list_subsites(&self) -> Result<Vec<String>, SiteApiError> {
        let connection = self.current().await?;
        let mut pending = VecDeque::from([connection.web_url.clone()]);
        let mut subsites = Vec::new();

        while let Some(parent) = pending.pop_front() {
            let url = format!("{parent}/_api/web/webs?$select=Url");
            let webs: ListResponse<WebUrl> = self
                .get_json(&connection.token, "list_subsites", &url)
                .await?;
            for web in webs.value {
                let child = normalize_site_url(&web.url);
                pending.push_back(child.clone());
                subsites.push(child);
            }
        }

        Ok(subsites)
    }
}
