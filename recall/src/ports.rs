#![deny(clippy::all)]

use crate::domain::StoreKind;
use crate::domain::response::{DeleteResponse, GetResponse, PutResponse};
use async_trait::async_trait;
use shared::config::StoreConfig;
use shared::{Result, TtlSecs};
use std::sync::Arc;

// Ports are the pluggable extension points for the stores behind the helpers

/// Port for creating a store of a given kind from configuration
pub trait StoreFactory<V>: Send + Sync + 'static {
    fn create(&self, kind: StoreKind, config: &StoreConfig) -> Arc<dyn StoreHandle<V>>;
}

/// Port for the key-value store a lookup reads from and writes back to.
///
/// `group` scopes keys only where [`StoreKind::supports_groups`] holds;
/// other stores ignore it. Atomicity and cross-caller visibility are the
/// store's business.
#[async_trait]
pub trait StoreHandle<V>: Send + Sync + 'static {
    fn kind(&self) -> StoreKind;
    async fn get(&self, key: &str, group: &str) -> Result<GetResponse<V>>;
    async fn set(&self, key: &str, value: V, group: &str, expire: TtlSecs) -> Result<PutResponse>;
    async fn delete(&self, key: &str, group: &str) -> Result<DeleteResponse>;
}
