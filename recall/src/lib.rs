//! Remember/forget helpers over pluggable key-value stores.
//!
//! `remember` reads a key and, on a miss, runs the caller's compute function
//! once and writes the result back unless the computation failed. `forget`
//! reads a key, deletes it if present and hands back the removed value.
//!
//! The stores behind [`ports::StoreHandle`] own storage, expiry and
//! consistency. Nothing here coalesces concurrent misses: two callers that
//! miss the same key at the same time will both run their compute function.

pub mod domain;
pub mod events;
pub mod helpers;
pub mod lookup;
pub mod ports;

pub use domain::StoreKind;
pub use helpers::CacheHelpers;
pub use lookup::{MemoizedLookup, RememberError};
pub use ports::{StoreFactory, StoreHandle};
pub use shared::{Error, Result, TtlSecs};
