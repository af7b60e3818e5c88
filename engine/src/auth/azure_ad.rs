use super::provider::{AuthProvider, AuthToken};
use super::types::{AuthType, AzureAdAuthConfig, ClientCredential};
use crate::common::AuthError;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
const CLIENT_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 600;

/// Azure AD client credentials flow for app-only SharePoint access.
#[derive(Clone)]
pub struct AzureAdProvider {
    config: AzureAdAuthConfig,
    http_client: reqwest::Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: u64,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
    error_description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClientAssertionClaims {
    aud: String,
    iss: String,
    sub: String,
    jti: String,
    nbf: i64,
    exp: i64,
}

impl AzureAdProvider {
    pub fn new(config: AzureAdAuthConfig) -> Result<Self, AuthError> {
        if config.tenant_id.trim().is_empty() {
            return Err(AuthError::MissingConfiguration(
                "tenant_id is required".to_string(),
            ));
        }
        if config.client_id.trim().is_empty() {
            return Err(AuthError::MissingConfiguration(
                "client_id is required".to_string(),
            ));
        }

        Ok(Self {
            config,
            http_client: reqwest::Client::new(),
        })
    }

    fn authority_host(&self) -> &str {
        self.config
            .authority_host
            .as_deref()
            .unwrap_or(DEFAULT_AUTHORITY_HOST)
            .trim_end_matches('/')
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host(),
            self.config.tenant_id
        )
    }

    /// Builds the signed JWT presented in place of a client secret.
    fn client_assertion(
        &self,
        thumbprint: &str,
        private_key_pem: &str,
    ) -> Result<String, AuthError> {
        let mut header = Header::new(Algorithm::RS256);
        header.x5t = Some(URL_SAFE_NO_PAD.encode(decode_thumbprint(thumbprint)?));

        let now = chrono::Utc::now().timestamp();
        let claims = ClientAssertionClaims {
            aud: self.token_url(),
            iss: self.config.client_id.clone(),
            sub: self.config.client_id.clone(),
            jti: uuid::Uuid::new_v4().to_string(),
            nbf: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| AuthError::InvalidKey(e.to_string()))?;

        jsonwebtoken::encode(&header, &claims, &key)
            .map_err(|e| AuthError::InvalidKey(format!("failed to sign client assertion: {e}")))
    }
}

/// Converts a hex thumbprint (spaces and colons allowed) into raw bytes.
fn decode_thumbprint(thumbprint: &str) -> Result<Vec<u8>, AuthError> {
    let hex: String = thumbprint
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();

    if hex.is_empty() || hex.len() % 2 != 0 {
        return Err(AuthError::InvalidThumbprint(thumbprint.to_string()));
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| AuthError::InvalidThumbprint(thumbprint.to_string()))
        })
        .collect()
}

fn friendly_message(error: &ErrorResponse) -> String {
    match error.error.as_str() {
        "invalid_client" => {
            "Invalid client credential. Check the certificate thumbprint or client secret registered on the app.".to_string()
        }
        "unauthorized_client" => {
            "The application is not authorized for app-only access in this tenant.".to_string()
        }
        "invalid_scope" => "The requested SharePoint resource scope is not valid.".to_string(),
        _ => error
            .error_description
            .clone()
            .unwrap_or_else(|| error.error.clone()),
    }
}

#[async_trait]
impl AuthProvider for AzureAdProvider {
    async fn authenticate(&self, scope: &str) -> Result<AuthToken, AuthError> {
        let client_id = self.config.client_id.as_str();
        let assertion;
        let mut params = vec![
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("scope", scope),
        ];

        match &self.config.credential {
            ClientCredential::Certificate {
                thumbprint,
                private_key_pem,
            } => {
                assertion = self.client_assertion(thumbprint, private_key_pem.expose())?;
                params.push(("client_assertion_type", CLIENT_ASSERTION_TYPE));
                params.push(("client_assertion", assertion.as_str()));
            }
            ClientCredential::ClientSecret(secret) => {
                params.push(("client_secret", secret.expose()));
            }
        }

        log::debug!("Requesting app-only token for scope {scope}");

        let response = self
            .http_client
            .post(self.token_url())
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let error_info = response
                .json::<ErrorResponse>()
                .await
                .unwrap_or(ErrorResponse {
                    error: "unknown_error".to_string(),
                    error_description: Some("Failed to parse error response".to_string()),
                });

            return Err(AuthError::Rejected {
                description: friendly_message(&error_info),
                error: error_info.error,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        Ok(AuthToken {
            token: token.access_token,
            token_type: token.token_type,
            expires_in_secs: Some(token.expires_in),
        })
    }

    fn auth_type(&self) -> AuthType {
        self.config.credential.auth_type()
    }
}
