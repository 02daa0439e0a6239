use crate::moka_cache::MokaStore;
use recall::StoreKind;
use recall::ports::{StoreFactory, StoreHandle};
use shared::config::{Config, StoreConfig};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::info;

/// Builds a [`MokaStore`] for each store kind
#[derive(Clone, Copy, Debug)]
pub struct MokaStoreFactory {
    site_id: u64,
}

impl MokaStoreFactory {
    pub fn new(site_id: u64) -> Self {
        Self { site_id }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.site_id)
    }
}

impl<V> StoreFactory<V> for MokaStoreFactory
where
    V: Debug + Send + Sync + Clone + 'static,
{
    fn create(&self, kind: StoreKind, config: &StoreConfig) -> Arc<dyn StoreHandle<V>> {
        info!(
            "Creating {} store '{}' (max_entries: {:?}, default_ttl: {:?})",
            kind, config.name, config.max_entries, config.default_ttl
        );
        Arc::new(MokaStore::new(kind, self.site_id, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall::{CacheHelpers, RememberError, TtlSecs};
    use std::convert::Infallible;
    use std::future::ready;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, PartialEq)]
    enum Payload {
        User { name: String },
        Flag(bool),
    }

    fn ann() -> Payload {
        Payload::User {
            name: "Ann".to_string(),
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    fn helpers() -> CacheHelpers<Payload> {
        init_tracing();
        let config = Config::default();
        CacheHelpers::from_factory(&MokaStoreFactory::from_config(&config), &config)
    }

    #[tokio::test]
    async fn test_remember_and_forget_user() {
        let helpers = helpers();
        let first_calls = AtomicUsize::new(0);
        let second_calls = AtomicUsize::new(0);

        let first = helpers
            .cache_remember("user:42", "", TtlSecs::STORE_DEFAULT, || {
                first_calls.fetch_add(1, Ordering::SeqCst);
                ready(Ok::<_, Infallible>(ann()))
            })
            .await
            .unwrap();
        assert_eq!(first, ann());
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);

        let second = helpers
            .cache_remember("user:42", "", TtlSecs::STORE_DEFAULT, || {
                second_calls.fetch_add(1, Ordering::SeqCst);
                ready(Ok::<_, Infallible>(Payload::User {
                    name: "Bob".to_string(),
                }))
            })
            .await
            .unwrap();
        assert_eq!(second, ann());
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);

        assert_eq!(helpers.cache_forget("user:42", "").await.unwrap(), Some(ann()));
        assert_eq!(helpers.cache_forget("user:42", "").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cached_false_survives_in_transients() {
        let helpers = helpers();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = helpers
                .transient_remember("maintenance", TtlSecs(60), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    ready(Ok::<_, Infallible>(Payload::Flag(false)))
                })
                .await
                .unwrap();
            assert_eq!(value, Payload::Flag(false));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_compute_is_retried_next_time() {
        let helpers = helpers();
        let calls = AtomicUsize::new(0);

        let err = helpers
            .site_transient_remember("update_core", TtlSecs(3600), || {
                calls.fetch_add(1, Ordering::SeqCst);
                ready(Err::<Payload, _>("http_request_failed"))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RememberError::Compute("http_request_failed")));

        let value = helpers
            .site_transient_remember("update_core", TtlSecs(3600), || {
                calls.fetch_add(1, Ordering::SeqCst);
                ready(Ok::<_, &str>(Payload::Flag(true)))
            })
            .await
            .unwrap();
        assert_eq!(value, Payload::Flag(true));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_forget_or_returns_default_when_absent() {
        let helpers = helpers();

        let fallback = helpers
            .transient_forget_or("never-set", Payload::Flag(true))
            .await
            .unwrap();
        assert_eq!(fallback, Payload::Flag(true));
    }

    #[tokio::test]
    async fn test_stores_do_not_share_keys() {
        let helpers = helpers();

        helpers
            .transient_remember("shared-key", TtlSecs::STORE_DEFAULT, || {
                ready(Ok::<_, Infallible>(Payload::Flag(true)))
            })
            .await
            .unwrap();

        assert_eq!(helpers.site_transient_forget("shared-key").await.unwrap(), None);
        assert_eq!(helpers.cache_forget("shared-key", "").await.unwrap(), None);
        assert_eq!(
            helpers.transient_forget("shared-key").await.unwrap(),
            Some(Payload::Flag(true))
        );
    }

    #[tokio::test]
    async fn test_empty_key_surfaces_as_store_error() {
        let helpers = helpers();
        let calls = AtomicUsize::new(0);

        let err = helpers
            .cache_remember("", "", TtlSecs::STORE_DEFAULT, || {
                calls.fetch_add(1, Ordering::SeqCst);
                ready(Ok::<_, Infallible>(ann()))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RememberError::Store(shared::Error::InvalidKey(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
