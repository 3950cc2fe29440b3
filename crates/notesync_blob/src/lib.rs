//! # notesync Blob
//!
//! Attachment storage for notesync workspaces.
//!
//! Image attachments never live in database rows. Their bytes are kept in a
//! blob backend under a per-workspace directory and rows only carry the
//! [`BlobKey`] that names them.
//!
//! ## Design Principles
//!
//! - Backends are simple keyed byte stores (write, read, delete, exists)
//! - Every key is relative and confined to `workspace_{id}/images/`
//! - Destructive deletion is deferred until the owning transaction commits
//! - Files created by a pass that rolls back are removed again
//!
//! ## Available Backends
//!
//! - [`InMemoryBlobBackend`] - For testing
//! - [`FileBlobBackend`] - For persistent storage under an upload root
//!
//! ## Example
//!
//! ```rust
//! use notesync_blob::{BlobStore, InMemoryBlobBackend};
//! use std::sync::Arc;
//!
//! let store = BlobStore::new(Arc::new(InMemoryBlobBackend::new()));
//! let key = store.allocate_image_key(7, "photo.png", false).unwrap();
//! assert_eq!(key.as_str(), "workspace_7/images/photo.png");
//!
//! let bytes = store.decode_payload("aGVsbG8=").unwrap();
//! store.write(&key, &bytes).unwrap();
//! assert_eq!(store.read_encoded(&key).unwrap(), "aGVsbG8=");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod backend;
mod config;
mod error;
mod file;
mod ledger;
mod memory;
mod path;
mod store;

pub use backend::BlobBackend;
pub use config::BlobConfig;
pub use error::{BlobError, BlobResult};
pub use file::FileBlobBackend;
pub use ledger::{BlobLedger, CleanupReport};
pub use memory::InMemoryBlobBackend;
pub use path::{sanitize_file_name, workspace_image_dir, BlobKey};
pub use store::BlobStore;
