use engine::auth::{AzureAdAuthConfig, ClientCredential, Secret};
use engine::common::AuthError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    #[default]
    Certificate,
    ClientSecret,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::Certificate => "certificate",
            AuthMethod::ClientSecret => "client_secret",
        }
    }
}

/// The `[tenant]` section: which tenant to brand and how the app
/// registration authenticates.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct TenantConfig {
    /// Short tenant name, `contoso` for contoso.sharepoint.com
    name: Option<String>,
    tenant_id: Option<String>,
    client_id: Option<String>,
    #[serde(default)]
    auth_method: AuthMethod,
    certificate_thumbprint: Option<String>,
    /// PEM private key of the registered certificate
    certificate_key_path: Option<PathBuf>,
    client_secret: Option<Secret>,
    authority_host: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl TenantConfig {
    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn tenant_id(&self) -> Option<&str> {
        non_empty(&self.tenant_id)
    }

    pub fn client_id(&self) -> Option<&str> {
        non_empty(&self.client_id)
    }

    pub fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }

    pub fn certificate_thumbprint(&self) -> Option<&str> {
        non_empty(&self.certificate_thumbprint)
    }

    pub fn certificate_key_path(&self) -> Option<&Path> {
        self.certificate_key_path.as_deref()
    }

    pub fn has_client_secret(&self) -> bool {
        self.client_secret
            .as_ref()
            .is_some_and(|secret| !secret.expose().trim().is_empty())
    }

    /// Builds the engine authentication settings, reading the certificate
    /// key from disk when certificate auth is configured.
    pub fn auth_config(&self) -> Result<AzureAdAuthConfig, AuthError> {
        let missing = |setting: &str| AuthError::MissingConfiguration(format!("tenant.{setting}"));

        let credential = match self.auth_method {
            AuthMethod::Certificate => {
                let thumbprint = self
                    .certificate_thumbprint()
                    .ok_or_else(|| missing("certificate_thumbprint"))?;
                let key_path = self
                    .certificate_key_path()
                    .ok_or_else(|| missing("certificate_key_path"))?;
                ClientCredential::certificate_from_file(thumbprint, key_path)?
            }
            AuthMethod::ClientSecret => {
                let secret = self
                    .client_secret
                    .clone()
                    .ok_or_else(|| missing("client_secret"))?;
                ClientCredential::ClientSecret(secret)
            }
        };

        Ok(AzureAdAuthConfig {
            tenant_id: self
                .tenant_id()
                .ok_or_else(|| missing("tenant_id"))?
                .to_string(),
            client_id: self
                .client_id()
                .ok_or_else(|| missing("client_id"))?
                .to_string(),
            credential,
            authority_host: self.authority_host.clone(),
        })
    }
}
