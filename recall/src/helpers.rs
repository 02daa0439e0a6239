use crate::domain::StoreKind;
use crate::events::LookupEvent;
use crate::lookup::{MemoizedLookup, RememberError};
use crate::ports::{StoreFactory, StoreHandle};
use shared::TtlSecs;
use shared::config::Config;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Transients have no groups; every call against them passes the empty group
const UNGROUPED: &str = "";

/// The remember/forget bindings for the object cache, the per-site
/// transient store and the site-wide transient store.
#[derive(Clone)]
pub struct CacheHelpers<V> {
    object_cache: MemoizedLookup<V>,
    transient: MemoizedLookup<V>,
    site_transient: MemoizedLookup<V>,
}

impl<V> CacheHelpers<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(
        object_cache: Arc<dyn StoreHandle<V>>,
        transient: Arc<dyn StoreHandle<V>>,
        site_transient: Arc<dyn StoreHandle<V>>,
    ) -> Self {
        Self {
            object_cache: MemoizedLookup::new(object_cache),
            transient: MemoizedLookup::new(transient),
            site_transient: MemoizedLookup::new(site_transient),
        }
    }

    /// Same as [`new`](Self::new), with every lookup publishing to `broadcaster`
    pub fn with_event_broadcaster(
        object_cache: Arc<dyn StoreHandle<V>>,
        transient: Arc<dyn StoreHandle<V>>,
        site_transient: Arc<dyn StoreHandle<V>>,
        broadcaster: broadcast::Sender<LookupEvent>,
    ) -> Self {
        Self {
            object_cache: MemoizedLookup::with_event_broadcaster(object_cache, broadcaster.clone()),
            transient: MemoizedLookup::with_event_broadcaster(transient, broadcaster.clone()),
            site_transient: MemoizedLookup::with_event_broadcaster(site_transient, broadcaster),
        }
    }

    pub fn from_factory(factory: &dyn StoreFactory<V>, config: &Config) -> Self {
        Self::new(
            factory.create(StoreKind::ObjectCache, &config.object_cache),
            factory.create(StoreKind::Transient, &config.transient),
            factory.create(StoreKind::SiteTransient, &config.site_transient),
        )
    }

    /// Get `key` from the object cache, computing and caching it on a miss
    pub async fn cache_remember<F, Fut, E>(
        &self,
        key: &str,
        group: &str,
        expire: TtlSecs,
        compute: F,
    ) -> Result<V, RememberError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.object_cache.remember(key, group, expire, compute).await
    }

    /// Get and delete `key` from the object cache
    pub async fn cache_forget(&self, key: &str, group: &str) -> shared::Result<Option<V>> {
        self.object_cache.forget(key, group).await
    }

    pub async fn cache_forget_or(&self, key: &str, group: &str, default: V) -> shared::Result<V> {
        self.object_cache.forget_or(key, group, default).await
    }

    /// Get transient `key`, computing and storing it on a miss
    pub async fn transient_remember<F, Fut, E>(
        &self,
        key: &str,
        expire: TtlSecs,
        compute: F,
    ) -> Result<V, RememberError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.transient.remember(key, UNGROUPED, expire, compute).await
    }

    pub async fn transient_forget(&self, key: &str) -> shared::Result<Option<V>> {
        self.transient.forget(key, UNGROUPED).await
    }

    pub async fn transient_forget_or(&self, key: &str, default: V) -> shared::Result<V> {
        self.transient.forget_or(key, UNGROUPED, default).await
    }

    /// Get site transient `key`, computing and storing it on a miss
    pub async fn site_transient_remember<F, Fut, E>(
        &self,
        key: &str,
        expire: TtlSecs,
        compute: F,
    ) -> Result<V, RememberError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.site_transient
            .remember(key, UNGROUPED, expire, compute)
            .await
    }

    pub async fn site_transient_forget(&self, key: &str) -> shared::Result<Option<V>> {
        self.site_transient.forget(key, UNGROUPED).await
    }

    pub async fn site_transient_forget_or(&self, key: &str, default: V) -> shared::Result<V> {
        self.site_transient
            .forget_or(key, UNGROUPED, default)
            .await
    }
}

impl<V: 'static> std::fmt::Debug for CacheHelpers<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheHelpers")
            .field("object_cache", &self.object_cache)
            .field("transient", &self.transient)
            .field("site_transient", &self.site_transient)
            .finish()
    }
}
