pub mod azure_ad;
pub mod provider;
pub mod token_cache;
pub mod types;

pub use azure_ad::AzureAdProvider;
pub use provider::{AuthProvider, AuthToken};
pub use token_cache::TokenCache;
pub use types::{AuthType, AzureAdAuthConfig, CachedToken, ClientCredential, Secret};
