use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Sizing and expiry policy for one backing store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub name: String,
    pub max_entries: Option<u64>,     // None -> unbounded
    pub default_ttl: Option<Duration>, // applied when expire == 0; None -> never expires
}

impl StoreConfig {
    pub fn new(
        name: impl Into<String>,
        max_entries: Option<u64>,
        default_ttl: Option<Duration>,
    ) -> Self {
        Self {
            name: name.into(),
            max_entries,
            default_ttl,
        }
    }

    pub fn unbounded(name: impl Into<String>) -> Self {
        Self::new(name, None, None)
    }
}

pub struct Config {
    pub site_id: u64,
    pub object_cache: StoreConfig,
    pub transient: StoreConfig,
    pub site_transient: StoreConfig,
}

impl Config {
    const DEFAULT_SITE_ID: u64 = 1;
    const OBJECT_CACHE_NAME: &str = "object-cache";
    const TRANSIENT_NAME: &str = "transient";
    const SITE_TRANSIENT_NAME: &str = "site-transient";

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_ttl = parse_var::<u64, _>(&lookup, "RECALL_DEFAULT_EXPIRE_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            site_id: parse_var(&lookup, "RECALL_SITE_ID").unwrap_or(Self::DEFAULT_SITE_ID),
            object_cache: StoreConfig::new(
                Self::OBJECT_CACHE_NAME,
                parse_var(&lookup, "RECALL_OBJECT_CACHE_MAX_ENTRIES"),
                default_ttl,
            ),
            transient: StoreConfig::new(
                Self::TRANSIENT_NAME,
                parse_var(&lookup, "RECALL_TRANSIENT_MAX_ENTRIES"),
                default_ttl,
            ),
            site_transient: StoreConfig::new(
                Self::SITE_TRANSIENT_NAME,
                parse_var(&lookup, "RECALL_SITE_TRANSIENT_MAX_ENTRIES"),
                default_ttl,
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{} has unparsable value '{}', using default", name, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = Config::default();
        assert_eq!(config.site_id, 1);
        assert_eq!(config.object_cache, StoreConfig::unbounded("object-cache"));
        assert_eq!(config.transient, StoreConfig::unbounded("transient"));
        assert_eq!(config.site_transient, StoreConfig::unbounded("site-transient"));
    }

    #[test]
    fn test_reads_store_bounds_and_default_ttl() {
        let config = config_from(&[
            ("RECALL_SITE_ID", "7"),
            ("RECALL_OBJECT_CACHE_MAX_ENTRIES", "1000"),
            ("RECALL_SITE_TRANSIENT_MAX_ENTRIES", " 50 "),
            ("RECALL_DEFAULT_EXPIRE_SECS", "300"),
        ]);

        assert_eq!(config.site_id, 7);
        assert_eq!(config.object_cache.max_entries, Some(1000));
        assert_eq!(config.transient.max_entries, None);
        assert_eq!(config.site_transient.max_entries, Some(50));
        assert_eq!(config.transient.default_ttl, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = config_from(&[
            ("RECALL_SITE_ID", "main"),
            ("RECALL_TRANSIENT_MAX_ENTRIES", "-3"),
            ("RECALL_DEFAULT_EXPIRE_SECS", "0"),
        ]);

        assert_eq!(config.site_id, 1);
        assert_eq!(config.transient.max_entries, None);
        assert_eq!(config.object_cache.default_ttl, None);
    }
}
