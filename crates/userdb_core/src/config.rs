//! Store configuration.

use std::time::Duration;

use redb::Durability;

const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Whether to create the database file if it doesn't exist.
    pub create_if_missing: bool,

    /// Page cache size in bytes (`None` = engine default).
    pub cache_size: Option<usize>,

    /// Whether every commit waits for the data to reach disk.
    pub sync_on_commit: bool,

    /// How long `close` waits for live snapshots and in-flight operations.
    pub close_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            cache_size: None,
            sync_on_commit: true,
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the database if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets the page cache size in bytes.
    #[must_use]
    pub const fn cache_size(mut self, bytes: usize) -> Self {
        self.cache_size = Some(bytes);
        self
    }

    /// Sets whether to sync on every commit.
    #[must_use]
    pub const fn sync_on_commit(mut self, value: bool) -> Self {
        self.sync_on_commit = value;
        self
    }

    /// Sets how long `close` waits before giving up.
    #[must_use]
    pub const fn close_timeout(mut self, timeout: Duration) -> Self {
        self.close_timeout = timeout;
        self
    }

    pub(crate) fn durability(&self) -> Durability {
        if self.sync_on_commit {
            Durability::Immediate
        } else {
            Durability::Eventual
        }
    }

    pub(crate) fn builder(&self) -> redb::Builder {
        let mut builder = redb::Builder::new();
        if let Some(bytes) = self.cache_size {
            builder.set_cache_size(bytes);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert!(config.create_if_missing);
        assert!(config.sync_on_commit);
        assert_eq!(config.cache_size, None);
        assert_eq!(config.close_timeout, DEFAULT_CLOSE_TIMEOUT);
        assert!(matches!(config.durability(), Durability::Immediate));
    }

    #[test]
    fn builder_pattern() {
        let config = StoreConfig::new()
            .create_if_missing(false)
            .sync_on_commit(false)
            .cache_size(4 * 1024 * 1024)
            .close_timeout(Duration::from_millis(50));

        assert!(!config.create_if_missing);
        assert!(!config.sync_on_commit);
        assert_eq!(config.cache_size, Some(4 * 1024 * 1024));
        assert_eq!(config.close_timeout, Duration::from_millis(50));
        assert!(matches!(config.durability(), Durability::Eventual));
    }
}
