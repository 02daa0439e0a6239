use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use recall::StoreKind;
use recall::domain::response::{DeleteResponse, GetResponse, PutResponse};
use recall::ports::StoreHandle;
use shared::config::StoreConfig;
use shared::{Error, Result, TtlSecs};
use std::fmt::Debug;
use std::time::{Duration, Instant};

const DEFAULT_GROUP: &str = "default";
const TRANSIENT_PREFIX: &str = "_transient_";
const SITE_TRANSIENT_SCOPE: &str = "_site_transient";

/// `(scope, key)`: the scope is the group for the object cache and a fixed
/// per-site or site-wide namespace for transients. Kept as a pair so no
/// (group, key) combination can alias another.
type Slot = (String, String);

/// A stored value together with the TTL it was written with
#[derive(Clone, Debug)]
struct Stored<V> {
    value: V,
    ttl: Option<Duration>,
}

/// Per-entry expiry: each write sets (or resets) the entry's own TTL
struct StoredExpiry;

impl<V> Expiry<Slot, Stored<V>> for StoredExpiry {
    fn expire_after_create(
        &self,
        _key: &Slot,
        value: &Stored<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &Slot,
        value: &Stored<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// Moka-based store usable as object cache, transient or site transient.
///
/// The kind decides the key scheme: object cache slots are scoped by group,
/// transients are scoped by site and ignore the group, site transients are
/// global and ignore the group.
pub struct MokaStore<V>
where
    V: Debug + Send + Sync + Clone + 'static,
{
    kind: StoreKind,
    site_id: u64,
    default_ttl: Option<Duration>,
    cache: Cache<Slot, Stored<V>>,
}

impl<V> MokaStore<V>
where
    V: Debug + Send + Sync + Clone + 'static,
{
    pub fn new(kind: StoreKind, site_id: u64, config: &StoreConfig) -> Self {
        let mut builder = Cache::builder()
            .name(&config.name)
            .expire_after(StoredExpiry);

        if let Some(capacity) = config.max_entries {
            builder = builder.max_capacity(capacity);
        }

        Self {
            kind,
            site_id,
            default_ttl: config.default_ttl,
            cache: builder.build(),
        }
    }

    pub fn object_cache(config: &StoreConfig) -> Self {
        Self::new(StoreKind::ObjectCache, 0, config)
    }

    pub fn transient(site_id: u64, config: &StoreConfig) -> Self {
        Self::new(StoreKind::Transient, site_id, config)
    }

    pub fn site_transient(config: &StoreConfig) -> Self {
        Self::new(StoreKind::SiteTransient, 0, config)
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    fn slot(&self, key: &str, group: &str) -> Result<Slot> {
        if key.is_empty() {
            return Err(Error::InvalidKey(format!("empty key for {}", self.kind)));
        }

        let scope = if self.kind.supports_groups() {
            let group = if group.is_empty() { DEFAULT_GROUP } else { group };
            group.to_string()
        } else if self.kind == StoreKind::Transient {
            format!("{}{}", TRANSIENT_PREFIX, self.site_id)
        } else {
            SITE_TRANSIENT_SCOPE.to_string()
        };

        Ok((scope, key.to_string()))
    }
}

#[async_trait]
impl<V> StoreHandle<V> for MokaStore<V>
where
    V: Debug + Send + Sync + Clone + 'static,
{
    fn kind(&self) -> StoreKind {
        self.kind
    }

    async fn get(&self, key: &str, group: &str) -> Result<GetResponse<V>> {
        let slot = self.slot(key, group)?;
        // Expired entries read as absent
        Ok(self.cache.get(&slot).await.map(|stored| stored.value).into())
    }

    async fn set(&self, key: &str, value: V, group: &str, expire: TtlSecs) -> Result<PutResponse> {
        let slot = self.slot(key, group)?;
        let ttl = expire.as_duration().or(self.default_ttl);

        // Upsert under moka's per-key lock so `created` is exact under concurrent writers
        let entry = self
            .cache
            .entry(slot)
            .and_upsert_with(|_| std::future::ready(Stored { value, ttl }))
            .await;

        if entry.is_old_value_replaced() {
            Ok(PutResponse::new(false, "Successfully replaced"))
        } else {
            Ok(PutResponse::new(true, "Successfully inserted"))
        }
    }

    async fn delete(&self, key: &str, group: &str) -> Result<DeleteResponse> {
        let slot = self.slot(key, group)?;
        let existed = self.cache.remove(&slot).await.is_some();
        Ok(DeleteResponse::new(existed))
    }
}

impl<V> Debug for MokaStore<V>
where
    V: Debug + Send + Sync + Clone + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaStore")
            .field("kind", &self.kind)
            .field("site_id", &self.site_id)
            .field("entry_count", &self.entry_count())
            .field("weighted_size", &self.cache.weighted_size())
            .finish()
    }
}
