//! # notesync Sync Protocol
//!
//! Wire types and JSON codec for notesync snapshot synchronization.
//!
//! This crate provides:
//! - Per-kind records as clients submit and receive them
//! - [`SyncRequest`] and [`SyncResponse`] for full-snapshot sync
//! - Read-side messages for the change log and workspace version
//! - JSON encoding/decoding helpers
//!
//! This is a pure protocol crate with no I/O operations.
//!
//! ## Identifiers
//!
//! A record whose `id` is zero, `null` or absent is not yet known to the
//! server. The server never trusts a submitted `database_id`; it always
//! files rows under the workspace the request addresses.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod error;
mod messages;
mod records;
mod serde_util;

pub use codec::{decode_request, encode, encode_pretty};
pub use error::{ProtocolError, ProtocolResult};
pub use messages::{
    ChangeRecord, ChangesResponse, ErrorBody, SyncRequest, SyncResponse, VersionResponse,
};
pub use records::{
    ConnectionRecord, FolderRecord, NoteImageRecord, NoteRecord, PinboardNoteRecord,
    ScheduleEntryRecord, WireRecord,
};
pub use serde_util::format_timestamp;
