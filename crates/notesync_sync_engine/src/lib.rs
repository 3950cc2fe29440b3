//! # notesync Sync Engine
//!
//! Snapshot reconciliation for notesync workspaces.
//!
//! A client submits its complete view of a workspace. The engine makes the
//! stored workspace match that view and answers with the authoritative
//! result, which the client adopts wholesale.
//!
//! ## Pass order
//!
//! One pass runs inside a single write transaction:
//!
//! 1. bump the workspace version
//! 2. schedule entries
//! 3. folders, with parents linked once every folder has an identity
//! 4. notes, whose folder links resolve through the folder id map
//! 5. pinboard notes
//! 6. connections, whose endpoints resolve through the pinboard id map
//! 7. note images, whose notes resolve through the note id map
//! 8. deletion of folders the snapshot dropped
//! 9. re-read of the whole workspace into the response
//!
//! Identifier maps translate the ids a client used in this snapshot to the
//! ids the rows actually have. They live for one pass only.
//!
//! ## Image files
//!
//! Image bytes live in a [`notesync_blob::BlobStore`]. Files written by a
//! pass that rolls back are removed again. Files that lose their last
//! reference are only deleted after the transaction committed.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod assembler;
mod config;
mod context;
mod engine;
mod error;
mod idmap;
mod reconcile;
mod stats;

pub use config::EngineConfig;
pub use engine::{SyncEngine, SyncOutcome};
pub use error::{ErrorKind, SyncError, SyncResult};
pub use idmap::CrossReferenceMap;
pub use stats::{KindStats, PassStats};
