use super::types::CachedToken;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Tokens keyed by OAuth scope.
#[derive(Clone)]
pub struct TokenCache {
    cache: Arc<RwLock<HashMap<String, CachedToken>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the cached token unless it is inside its refresh window.
    pub async fn get(&self, scope: &str) -> Option<String> {
        let cache = self.cache.read().await;
        cache
            .get(scope)
            .filter(|token| !token.needs_refresh())
            .map(|token| token.token.clone())
    }

    pub async fn set(&self, scope: String, token: CachedToken) {
        let mut cache = self.cache.write().await;
        cache.insert(scope, token);
    }

    pub async fn invalidate(&self, scope: &str) {
        let mut cache = self.cache.write().await;
        cache.remove(scope);
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn token(value: &str, lifetime: Duration) -> CachedToken {
        CachedToken::new(value.to_string(), lifetime, "Bearer".to_string())
    }

    #[tokio::test]
    async fn test_cached_token_is_returned_per_scope() {
        let cache = TokenCache::new();
        cache
            .set(
                "https://contoso.sharepoint.com/.default".to_string(),
                token("site-token", Duration::from_secs(3600)),
            )
            .await;

        assert_eq!(
            cache.get("https://contoso.sharepoint.com/.default").await,
            Some("site-token".to_string())
        );
        assert_eq!(
            cache
                .get("https://contoso-admin.sharepoint.com/.default")
                .await,
            None
        );
    }

    #[tokio::test]
    async fn test_token_near_expiry_is_not_served() {
        let cache = TokenCache::new();
        cache
            .set("scope".to_string(), token("stale", Duration::from_secs(60)))
            .await;

        assert_eq!(cache.get("scope").await, None);
    }

    #[tokio::test]
    async fn test_invalidate_only_drops_one_scope() {
        let cache = TokenCache::new();
        cache
            .set("a".to_string(), token("a", Duration::from_secs(3600)))
            .await;
        cache
            .set("b".to_string(), token("b", Duration::from_secs(3600)))
            .await;

        cache.invalidate("a").await;
        assert_eq!(cache.get("a").await, None);
        assert!(cache.get("b").await.is_some());
    }
}
