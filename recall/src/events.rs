use crate::domain::StoreKind;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LookupEvent {
    Hit(LookupKeyEvent),
    Miss(LookupKeyEvent),
    Stored(ItemStoredEvent),
    WriteSkipped(LookupKeyEvent),
    Forgotten(LookupKeyEvent),
}

impl LookupEvent {
    pub fn store(&self) -> StoreKind {
        match self {
            LookupEvent::Hit(e)
            | LookupEvent::Miss(e)
            | LookupEvent::WriteSkipped(e)
            | LookupEvent::Forgotten(e) => e.store,
            LookupEvent::Stored(e) => e.store,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            LookupEvent::Hit(e)
            | LookupEvent::Miss(e)
            | LookupEvent::WriteSkipped(e)
            | LookupEvent::Forgotten(e) => &e.key,
            LookupEvent::Stored(e) => &e.key,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            LookupEvent::Hit(_) => "hit",
            LookupEvent::Miss(_) => "miss",
            LookupEvent::Stored(_) => "stored",
            LookupEvent::WriteSkipped(_) => "write_skipped",
            LookupEvent::Forgotten(_) => "forgotten",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupKeyEvent {
    pub store: StoreKind,
    pub key: String,
    pub group: String,
    pub timestamp: u64,
}

impl LookupKeyEvent {
    pub fn new(store: StoreKind, key: &str, group: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
            group: group.to_string(),
            timestamp: now_timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStoredEvent {
    pub store: StoreKind,
    pub key: String,
    pub group: String,
    pub expire_secs: u64,
    pub timestamp: u64,
}

/// Helper to get current timestamp in seconds since UNIX epoch
pub fn now_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
