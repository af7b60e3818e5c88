use super::types::AuthType;
use crate::common::AuthError;
use async_trait::async_trait;

/// Access token returned by an authentication provider.
#[derive(Clone, Debug)]
pub struct AuthToken {
    /// The bearer token itself
    pub token: String,
    /// The type of token (e.g., "Bearer")
    pub token_type: String,
    /// Lifetime in seconds from when the token was issued
    pub expires_in_secs: Option<u64>,
}

/// Source of app-only access tokens for SharePoint Online.
///
/// Tokens are scoped per resource: the tenant host
/// (`https://contoso.sharepoint.com/.default`) and the admin host
/// (`https://contoso-admin.sharepoint.com/.default`) need separate tokens.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Obtains a fresh token for the given OAuth scope.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the credential cannot be used or the token
    /// endpoint rejects the request.
    async fn authenticate(&self, scope: &str) -> Result<AuthToken, AuthError>;

    fn auth_type(&self) -> AuthType;
}
