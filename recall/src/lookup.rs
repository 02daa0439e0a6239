use crate::domain::StoreKind;
use crate::domain::response::GetResponse;
use crate::events::{ItemStoredEvent, LookupEvent, LookupKeyEvent, now_timestamp};
use crate::ports::StoreHandle;
use shared::TtlSecs;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Failure of a `remember` call.
///
/// `Compute` hands back the compute function's own error untouched; the
/// store was not written. `Store` is a fault reading from the store.
#[derive(thiserror::Error, Debug)]
pub enum RememberError<E> {
    #[error("compute failed: {0}")]
    Compute(E),
    #[error(transparent)]
    Store(#[from] shared::Error),
}

impl<E> RememberError<E> {
    pub fn is_compute(&self) -> bool {
        matches!(self, RememberError::Compute(_))
    }

    pub fn into_compute(self) -> Option<E> {
        match self {
            RememberError::Compute(err) => Some(err),
            RememberError::Store(_) => None,
        }
    }
}

/// Get-or-compute-and-store over a single backing store.
///
/// Holds no state of its own between calls. Each `remember` performs one
/// read, at most one compute and at most one write; each `forget` performs
/// one read and at most one delete. Concurrent misses on the same key each
/// run their compute function.
#[derive(Clone)]
pub struct MemoizedLookup<V> {
    store: Arc<dyn StoreHandle<V>>,
    event_broadcaster: Option<broadcast::Sender<LookupEvent>>,
}

impl<V> MemoizedLookup<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(store: Arc<dyn StoreHandle<V>>) -> Self {
        Self {
            store,
            event_broadcaster: None,
        }
    }

    pub fn with_event_broadcaster(
        store: Arc<dyn StoreHandle<V>>,
        broadcaster: broadcast::Sender<LookupEvent>,
    ) -> Self {
        Self {
            store,
            event_broadcaster: Some(broadcaster),
        }
    }

    pub fn kind(&self) -> StoreKind {
        self.store.kind()
    }

    /// Return the cached value for `key`, or run `compute` and cache its result.
    ///
    /// `compute` runs only on a miss. An `Err` from it is returned as
    /// [`RememberError::Compute`] and is not written back, so the next call
    /// computes again. The write itself is best-effort: a failed `set` is
    /// logged and the computed value is still returned.
    pub async fn remember<F, Fut, E>(
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
        let kind = self.store.kind();

        if let GetResponse::Found(cached) = self.store.get(key, group).await? {
            debug!("{} hit for key '{}' in group '{}'", kind, key, group);
            self.broadcast(LookupEvent::Hit(LookupKeyEvent::new(kind, key, group)));
            return Ok(cached);
        }

        debug!("{} miss for key '{}' in group '{}'", kind, key, group);
        self.broadcast(LookupEvent::Miss(LookupKeyEvent::new(kind, key, group)));

        let value = match compute().await {
            Ok(value) => value,
            Err(err) => {
                debug!(
                    "Compute failed for key '{}' in {}, skipping write-back",
                    key, kind
                );
                self.broadcast(LookupEvent::WriteSkipped(LookupKeyEvent::new(
                    kind, key, group,
                )));
                return Err(RememberError::Compute(err));
            }
        };

        match self.store.set(key, value.clone(), group, expire).await {
            Ok(_) => {
                self.broadcast(LookupEvent::Stored(ItemStoredEvent {
                    store: kind,
                    key: key.to_string(),
                    group: group.to_string(),
                    expire_secs: expire.0,
                    timestamp: now_timestamp(),
                }));
            }
            Err(err) => {
                warn!(
                    "Failed to write key '{}' to {} (group '{}'): {}",
                    key, kind, group, err
                );
            }
        }

        Ok(value)
    }

    /// Remove `key` and return what was stored, or `None` if nothing was.
    pub async fn forget(&self, key: &str, group: &str) -> shared::Result<Option<V>> {
        let kind = self.store.kind();

        match self.store.get(key, group).await? {
            GetResponse::Found(cached) => {
                self.store.delete(key, group).await?;
                debug!("{} forgot key '{}' in group '{}'", kind, key, group);
                self.broadcast(LookupEvent::Forgotten(LookupKeyEvent::new(kind, key, group)));
                Ok(Some(cached))
            }
            GetResponse::Absent => Ok(None),
        }
    }

    /// Like [`forget`](Self::forget), returning `default` when nothing was stored.
    pub async fn forget_or(&self, key: &str, group: &str, default: V) -> shared::Result<V> {
        Ok(self.forget(key, group).await?.unwrap_or(default))
    }

    fn broadcast(&self, event: LookupEvent) {
        let Some(ref broadcaster) = self.event_broadcaster else {
            return;
        };

        let event_type = event.event_type();
        let key = event.key().to_string();
        let kind = event.store();

        match broadcaster.send(event) {
            Ok(subscriber_count) => {
                debug!(
                    "Broadcasted {} event for key '{}' in {} to {} subscriber(s)",
                    event_type, key, kind, subscriber_count
                );
            }
            Err(_) => {
                debug!(
                    "No subscribers for {} event on key '{}' in {}",
                    event_type, key, kind
                );
            }
        }
    }
}

impl<V: 'static> Debug for MemoizedLookup<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoizedLookup")
            .field("store", &self.store.kind())
            .field("events", &self.event_broadcaster.is_some())
            .finish()
    }
}
