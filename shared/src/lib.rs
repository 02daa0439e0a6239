// shared/src/lib.rs

use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Relative expiry in seconds. `0` defers to the store's default policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TtlSecs(pub u64);

impl TtlSecs {
    pub const STORE_DEFAULT: TtlSecs = TtlSecs(0);

    pub fn is_store_default(&self) -> bool {
        self.0 == 0
    }

    /// `None` when the store default should apply
    pub fn as_duration(&self) -> Option<Duration> {
        if self.is_store_default() {
            None
        } else {
            Some(Duration::from_secs(self.0))
        }
    }
}

pub mod config;
