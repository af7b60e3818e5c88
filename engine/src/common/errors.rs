use crate::branding::FallbackFailure;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a [`SiteApi`](crate::site::SiteApi) implementation.
///
/// Every remote call made while branding a site reports failures through this
/// type. The variants carry the name of the operation that failed so a log
/// line is enough to diagnose the problem after the run.
///
/// # Transient errors
///
/// [`SiteApiError::is_transient`] decides whether the retry executor should
/// back off and try again:
///
/// - [`Throttled`](SiteApiError::Throttled) - HTTP 429 or 503 from SharePoint
/// - [`Http`](SiteApiError::Http) with status 504 (gateway timeout)
/// - [`Network`](SiteApiError::Network) when the request timed out
///
/// Everything else fails immediately.
#[derive(Debug, Error)]
pub enum SiteApiError {
    #[error("{operation} was throttled (HTTP {status})")]
    Throttled {
        operation: String,
        status: u16,
        retry_after_seconds: Option<u64>,
    },

    #[error("{operation} failed with HTTP {status}: {message}")]
    Http {
        operation: String,
        status: u16,
        message: String,
    },

    #[error("{operation} request failed: {reason}")]
    Network {
        operation: String,
        reason: String,
        timed_out: bool,
    },

    #[error("No active site connection")]
    NotConnected,

    #[error("Invalid site URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Authentication failed: {0}")]
    Authentication(#[from] AuthError),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unexpected response from {operation}: {reason}")]
    InvalidResponse { operation: String, reason: String },
}

impl SiteApiError {
    pub fn http(operation: &str, status: u16, message: impl Into<String>) -> Self {
        SiteApiError::Http {
            operation: operation.to_string(),
            status,
            message: message.into(),
        }
    }

    pub fn throttled(operation: &str, status: u16, retry_after_seconds: Option<u64>) -> Self {
        SiteApiError::Throttled {
            operation: operation.to_string(),
            status,
            retry_after_seconds,
        }
    }

    /// Whether the failure signals that the caller should slow down and retry.
    pub fn is_transient(&self) -> bool {
        match self {
            SiteApiError::Throttled { .. } => true,
            SiteApiError::Http { status, .. } => matches!(status, 429 | 503 | 504),
            SiteApiError::Network { timed_out, .. } => *timed_out,
            _ => false,
        }
    }

    /// HTTP status code of the failed call, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            SiteApiError::Throttled { status, .. } | SiteApiError::Http { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Errors raised while acquiring an Azure AD access token.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Missing authentication setting: {0}")]
    MissingConfiguration(String),

    #[error("Invalid certificate thumbprint: {0}")]
    InvalidThumbprint(String),

    #[error("Invalid certificate private key: {0}")]
    InvalidKey(String),

    #[error("Token request failed: {0}")]
    Request(String),

    #[error("Token endpoint rejected the request: {error} - {description}")]
    Rejected { error: String, description: String },

    #[error("Failed to parse token response: {0}")]
    InvalidResponse(String),
}

/// Fatal errors reading the list of site collections.
///
/// Any of these stops the whole run before a single site is contacted.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read input file '{path}': {source}")]
    Read { path: PathBuf, source: csv::Error },

    #[error("Input file '{0}' has no 'URL' column")]
    MissingUrlColumn(PathBuf),

    #[error("Row {row} of '{path}' has no URL")]
    MissingUrl { path: PathBuf, row: usize },

    #[error("Input file '{0}' contains no site collections")]
    Empty(PathBuf),
}

/// Hard per-site branding failures.
///
/// Returning one of these marks the site as failed in the run summary. Theme
/// creation and theme application failures never show up here; they are
/// logged and swallowed by the applicator.
#[derive(Debug, Error)]
pub enum BrandingError {
    #[error("Logo file not found: {0}")]
    LogoNotFound(PathBuf),

    #[error("Failed to upload logo to {site}: {source}")]
    LogoUpload { site: String, source: SiteApiError },

    #[error("Failed to set logo on {site}: {source}")]
    LogoNotSet {
        site: String,
        source: FallbackFailure<SiteApiError>,
    },

    #[error("Failed to connect to admin endpoint {admin_url}: {source}")]
    AdminConnect {
        admin_url: String,
        source: SiteApiError,
    },

    #[error("Failed to reconnect to {site} after theme setup: {source}")]
    Reconnect { site: String, source: SiteApiError },
}
