//! Storage configuration.

use std::time::Duration;

/// SQLite journal mode used by sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
    /// Write-ahead logging; readers do not block the writer.
    Wal,
    /// Rollback journal.
    Delete,
}

impl JournalMode {
    /// Returns the pragma value.
    pub fn as_pragma(self) -> &'static str {
        match self {
            JournalMode::Wal => "WAL",
            JournalMode::Delete => "DELETE",
        }
    }
}

/// Configuration for opening a notesync database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// How long a session waits for the SQLite write lock.
    pub busy_timeout: Duration,
    /// Journal mode applied to every session.
    pub journal_mode: JournalMode,
    /// Create missing parent directories of the database file.
    pub create_dirs: bool,
}

impl StoreConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
            journal_mode: JournalMode::Wal,
            create_dirs: true,
        }
    }

    /// Sets the busy timeout.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets the journal mode.
    pub fn with_journal_mode(mut self, mode: JournalMode) -> Self {
        self.journal_mode = mode;
        self
    }

    /// Sets whether missing parent directories are created.
    pub fn with_create_dirs(mut self, create: bool) -> Self {
        self.create_dirs = create;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
        assert_eq!(config.journal_mode, JournalMode::Wal);
        assert!(config.create_dirs);
    }

    #[test]
    fn config_builder() {
        let config = StoreConfig::new()
            .with_busy_timeout(Duration::from_millis(50))
            .with_journal_mode(JournalMode::Delete)
            .with_create_dirs(false);
        assert_eq!(config.busy_timeout, Duration::from_millis(50));
        assert_eq!(config.journal_mode.as_pragma(), "DELETE");
        assert!(!config.create_dirs);
    }
}
