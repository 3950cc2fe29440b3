//! # notesync Core
//!
//! Workspace storage for notesync.
//!
//! This crate provides:
//! - Row types for workspaces and their six content kinds
//! - A SQLite-backed [`Database`] with embedded schema migrations
//! - Per-request [`Session`]s and scoped [`Transaction`] guards
//! - Workspace-scoped table access through [`store::EntityTable`]
//! - Membership roles and the workspace change log
//!
//! ## Referential integrity
//!
//! Foreign keys are enforced on every session. Deleting a folder clears the
//! folder link of its notes and child folders; deleting a pinboard note
//! removes its connections; deleting a note removes its image rows.
//!
//! ## Example
//!
//! ```no_run
//! use notesync_core::{store, Database, Role};
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("notesync.db")).unwrap();
//! let mut session = db.session().unwrap();
//! session
//!     .write(|tx| {
//!         let ws = store::workspace::create(tx, "Team", 1)?;
//!         store::member::upsert(tx, ws.id, 2, Role::Viewer)
//!     })
//!     .unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod database;
mod error;
mod model;
pub mod store;
mod transaction;
mod types;

pub use config::{JournalMode, StoreConfig};
pub use database::{schema_version, Database, Session, LATEST_SCHEMA_VERSION};
pub use error::{CoreError, CoreResult};
pub use model::{
    ChangeEntry, Connection, Entity, Folder, Member, Note, NoteImage, PinboardNote, ScheduleEntry,
    Workspace,
};
pub use store::EntityTable;
pub use transaction::{Transaction, TransactionMode, TransactionState};
pub use types::{advance_timestamp, ChangeOperation, EntityKind, Role};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
