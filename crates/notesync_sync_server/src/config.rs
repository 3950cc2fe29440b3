//! Server configuration.

use notesync_sync_engine::EngineConfig;
use std::time::Duration;

/// Configuration for the sync server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// How long a sync waits for another pass on the same workspace.
    pub lock_timeout: Duration,
    /// Maximum accepted request body size.
    pub max_body_bytes: usize,
    /// Default page size for change log reads.
    pub default_changes_page: u32,
    /// Engine configuration.
    pub engine: EngineConfig,
}

impl ServerConfig {
    /// Creates a new server configuration.
    pub fn new() -> Self {
        Self {
            lock_timeout: Duration::from_secs(30),
            max_body_bytes: 256 * 1024 * 1024,
            default_changes_page: 100,
            engine: EngineConfig::default(),
        }
    }

    /// Sets the workspace lock timeout.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Sets the maximum request body size.
    pub fn with_max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }

    /// Sets the default change log page size.
    pub fn with_default_changes_page(mut self, size: u32) -> Self {
        self.default_changes_page = size;
        self
    }

    /// Sets the engine configuration.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.lock_timeout, Duration::from_secs(30));
        assert_eq!(config.default_changes_page, 100);
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new()
            .with_lock_timeout(Duration::from_millis(50))
            .with_max_body_bytes(1024)
            .with_default_changes_page(10)
            .with_engine(EngineConfig::new().with_max_records(7));

        assert_eq!(config.lock_timeout, Duration::from_millis(50));
        assert_eq!(config.max_body_bytes, 1024);
        assert_eq!(config.default_changes_page, 10);
        assert_eq!(config.engine.max_records, 7);
    }
}
