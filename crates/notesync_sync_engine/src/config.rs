//! Configuration for the sync engine.

/// Configuration for reconciliation passes.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of records accepted in one snapshot.
    pub max_records: usize,
    /// Whether passes append to the workspace change log.
    pub record_changes: bool,
    /// Maximum number of change log entries returned per page.
    pub max_changes_page: u32,
}

impl EngineConfig {
    /// Creates a configuration with default limits.
    pub fn new() -> Self {
        Self {
            max_records: 100_000,
            record_changes: true,
            max_changes_page: 1_000,
        }
    }

    /// Sets the snapshot size limit.
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    /// Enables or disables the change log.
    pub fn with_record_changes(mut self, record_changes: bool) -> Self {
        self.record_changes = record_changes;
        self
    }

    /// Sets the change log page limit.
    pub fn with_max_changes_page(mut self, limit: u32) -> Self {
        self.max_changes_page = limit;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
