use crate::common::AuthError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// App-only credential types supported for the app registration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// Client assertion signed with the registered certificate's private key
    Certificate,
    /// Client secret of the app registration
    ClientSecret,
}

/// Secret material that is wiped from memory when dropped and never printed.
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// The credential presented to the token endpoint.
#[derive(Clone, Debug)]
pub enum ClientCredential {
    /// Certificate registered on the app. `thumbprint` is the hex SHA-1
    /// thumbprint shown in the Azure portal; `private_key_pem` is the
    /// matching RSA private key.
    Certificate {
        thumbprint: String,
        private_key_pem: Secret,
    },
    ClientSecret(Secret),
}

impl ClientCredential {
    /// Reads the private key of a certificate credential from a PEM file.
    pub fn certificate_from_file(
        thumbprint: impl Into<String>,
        key_path: &Path,
    ) -> Result<Self, AuthError> {
        let pem = std::fs::read_to_string(key_path).map_err(|e| {
            AuthError::InvalidKey(format!(
                "failed to read certificate key '{}': {e}",
                key_path.display()
            ))
        })?;

        Ok(ClientCredential::Certificate {
            thumbprint: thumbprint.into(),
            private_key_pem: Secret::new(pem),
        })
    }

    pub fn auth_type(&self) -> AuthType {
        match self {
            ClientCredential::Certificate { .. } => AuthType::Certificate,
            ClientCredential::ClientSecret(_) => AuthType::ClientSecret,
        }
    }
}

/// Configuration for Azure AD client credentials authentication.
///
/// # Examples
///
/// ```no_run
/// use engine::auth::types::{AzureAdAuthConfig, ClientCredential, Secret};
///
/// let config = AzureAdAuthConfig {
///     tenant_id: "00000000-0000-0000-0000-000000000000".to_string(),
///     client_id: "11111111-1111-1111-1111-111111111111".to_string(),
///     credential: ClientCredential::ClientSecret(Secret::new("secret")),
///     authority_host: None,
/// };
/// ```
#[derive(Clone, Debug)]
pub struct AzureAdAuthConfig {
    /// Azure AD tenant ID
    pub tenant_id: String,
    /// Application (client) ID of the app registration
    pub client_id: String,
    pub credential: ClientCredential,
    /// Azure AD authority host (defaults to https://login.microsoftonline.com)
    pub authority_host: Option<String>,
}

/// A token with expiration tracking.
#[derive(Clone, Debug)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: Instant,
    pub token_type: String,
}

impl CachedToken {
    pub fn new(token: String, expires_in: Duration, token_type: String) -> Self {
        Self {
            token,
            expires_at: Instant::now() + expires_in,
            token_type,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Tokens are refreshed five minutes before they actually expire.
    pub fn needs_refresh(&self) -> bool {
        let buffer = Duration::from_secs(300);
        Instant::now() + buffer >= self.expires_at
    }
}
