use serde::{Deserialize, Serialize};
use std::fmt;

pub mod response {

    /// Result of a store read. `Absent` never collides with a stored value,
    /// including `false`, `0` or an empty string.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum GetResponse<V> {
        Found(V),
        Absent,
    }

    impl<V> GetResponse<V> {
        pub fn found(&self) -> bool {
            matches!(self, GetResponse::Found(_))
        }

        pub fn into_value(self) -> Option<V> {
            match self {
                GetResponse::Found(value) => Some(value),
                GetResponse::Absent => None,
            }
        }
    }

    impl<V> From<Option<V>> for GetResponse<V> {
        fn from(value: Option<V>) -> Self {
            match value {
                Some(value) => GetResponse::Found(value),
                None => GetResponse::Absent,
            }
        }
    }

    #[derive(Clone, Debug)]
    pub struct PutResponse {
        pub created: bool,
        pub message: String,
    }

    impl PutResponse {
        pub fn new(created: bool, message: impl Into<String>) -> Self {
            Self {
                created,
                message: message.into(),
            }
        }
    }

    #[derive(Clone, Debug)]
    pub struct DeleteResponse {
        pub deleted: bool,
    }

    impl DeleteResponse {
        pub fn new(deleted: bool) -> Self {
            Self { deleted }
        }
    }
}

/// Which backing store a lookup is bound to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// Grouped object cache
    ObjectCache,
    /// Per-site transient store, no grouping
    Transient,
    /// Network-wide transient store, no grouping
    SiteTransient,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::ObjectCache => "object_cache",
            StoreKind::Transient => "transient",
            StoreKind::SiteTransient => "site_transient",
        }
    }

    /// Whether the `group` argument scopes keys in this store
    pub fn supports_groups(&self) -> bool {
        matches!(self, StoreKind::ObjectCache)
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
