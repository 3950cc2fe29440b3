//! Blob store configuration.

/// Default limit for a single decoded image payload (32 MiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Configuration for a [`crate::BlobStore`].
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Largest accepted decoded payload in bytes.
    pub max_payload_bytes: usize,
}

impl BlobConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }

    /// Sets the largest accepted decoded payload.
    pub fn with_max_payload_bytes(mut self, limit: usize) -> Self {
        self.max_payload_bytes = limit;
        self
    }
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self::new()
    }
}
