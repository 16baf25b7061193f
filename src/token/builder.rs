use std::sync::Arc;
use tokio::sync::RwLock;

/// Opaque builder token returned by the vendor. Required as a query
/// parameter on every task-lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderToken(String);

impl BuilderToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Shared slot for the current builder token.
///
/// The token is owned by the application state and passed explicitly into
/// the orchestrator, so concurrent re-acquisitions overwrite through the
/// lock instead of racing on process-global state. The vendor keeps older
/// builder tokens valid for their full lifetime, so last-write-wins is
/// safe for in-flight calls.
#[derive(Clone, Default)]
pub struct BuilderTokenCache {
    slot: Arc<RwLock<Option<BuilderToken>>>,
}

impl BuilderTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> Option<BuilderToken> {
        self.slot.read().await.clone()
    }

    pub async fn store(&self, token: BuilderToken) {
        *self.slot.write().await = Some(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty_and_overwrites() {
        let cache = BuilderTokenCache::new();
        assert!(cache.current().await.is_none());

        cache.store(BuilderToken::new("first")).await;
        assert_eq!(cache.current().await.unwrap().as_str(), "first");

        cache.store(BuilderToken::new("second")).await;
        assert_eq!(cache.current().await.unwrap().as_str(), "second");
    }

    #[tokio::test]
    async fn clones_share_the_slot() {
        let cache = BuilderTokenCache::new();
        let clone = cache.clone();
        clone.store(BuilderToken::new("shared")).await;
        assert_eq!(cache.current().await.unwrap().as_str(), "shared");
    }
}
