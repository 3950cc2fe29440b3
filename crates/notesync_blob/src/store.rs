//! Blob store manager.

use crate::backend::BlobBackend;
use crate::config::BlobConfig;
use crate::error::{BlobError, BlobResult};
use crate::path::{sanitize_file_name, BlobKey};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Allocates, writes and reads attachment blobs for workspaces.
///
/// The store sits between the reconciliation engine and a [`BlobBackend`].
/// It owns payload encoding (standard base64), file name sanitization and
/// the layout of keys under each workspace's upload directory.
pub struct BlobStore {
    backend: Arc<dyn BlobBackend>,
    config: BlobConfig,
    last_prefix: AtomicI64,
}

impl BlobStore {
    /// Creates a store with the default configuration.
    pub fn new(backend: Arc<dyn BlobBackend>) -> Self {
        Self::with_config(backend, BlobConfig::default())
    }

    /// Creates a store with an explicit configuration.
    pub fn with_config(backend: Arc<dyn BlobBackend>, config: BlobConfig) -> Self {
        Self {
            backend,
            config,
            last_prefix: AtomicI64::new(0),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BlobConfig {
        &self.config
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &Arc<dyn BlobBackend> {
        &self.backend
    }

    /// Decodes an inline base64 payload.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::InvalidPayload`] for malformed base64 and
    /// [`BlobError::PayloadTooLarge`] when the decoded size exceeds the
    /// configured limit.
    pub fn decode_payload(&self, encoded: &str) -> BlobResult<Vec<u8>> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| BlobError::InvalidPayload(e.to_string()))?;
        if bytes.len() > self.config.max_payload_bytes {
            return Err(BlobError::PayloadTooLarge {
                size: bytes.len(),
                limit: self.config.max_payload_bytes,
            });
        }
        Ok(bytes)
    }

    /// Encodes bytes as an inline base64 payload.
    #[must_use]
    pub fn encode_payload(bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    /// Computes the key a client file name is stored under.
    ///
    /// With `unique` set, the sanitized name is prefixed with a nanosecond
    /// timestamp that is strictly increasing across calls on this store.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::EmptyFileName`] if nothing usable is left after
    /// sanitization, or a key error if the result would leave the workspace's
    /// image directory.
    pub fn allocate_image_key(
        &self,
        workspace_id: i64,
        client_name: &str,
        unique: bool,
    ) -> BlobResult<BlobKey> {
        let clean = sanitize_file_name(client_name);
        if clean.is_empty() || clean == "." {
            return Err(BlobError::EmptyFileName {
                original: client_name.to_string(),
            });
        }
        let name = if unique {
            format!("{}_{}", self.next_prefix(), clean)
        } else {
            clean
        };
        BlobKey::image(workspace_id, &name)
    }

    /// Writes a blob, returning true if the key did not exist before.
    pub fn write(&self, key: &BlobKey, data: &[u8]) -> BlobResult<bool> {
        let existed = self.backend.exists(key)?;
        self.backend.write(key, data)?;
        debug!(key = %key, size = data.len(), replaced = existed, "blob written");
        Ok(!existed)
    }

    /// Reads a blob.
    pub fn read(&self, key: &BlobKey) -> BlobResult<Vec<u8>> {
        self.backend.read(key)
    }

    /// Reads a blob and encodes it as base64.
    pub fn read_encoded(&self, key: &BlobKey) -> BlobResult<String> {
        self.read(key).map(|bytes| Self::encode_payload(&bytes))
    }

    /// Deletes a blob.
    pub fn delete(&self, key: &BlobKey) -> BlobResult<()> {
        self.backend.delete(key)?;
        debug!(key = %key, "blob deleted");
        Ok(())
    }

    /// Returns true if a blob exists under the key.
    pub fn exists(&self, key: &BlobKey) -> BlobResult<bool> {
        self.backend.exists(key)
    }

    fn next_prefix(&self) -> i64 {
        let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        let previous = self
            .last_prefix
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or(now);
        now.max(previous.saturating_add(1))
    }
}

impl std::fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
