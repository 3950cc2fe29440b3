//! # notesync Sync Server
//!
//! Request handling for notesync workspace sync.
//!
//! This crate provides:
//! - Role checks that run before any transaction opens
//! - Per-workspace serialization of sync passes
//! - Status-code mapping for every engine error
//! - A transport-neutral [`SyncServer`] returning status and JSON body
//!
//! ## Routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | POST | `/sync/{workspace}` | [`SyncServer::handle_sync`] |
//! | GET | `/sync/{workspace}` | [`SyncServer::handle_export`] |
//! | GET | `/sync/{workspace}/version` | [`SyncServer::handle_version`] |
//! | GET | `/sync/{workspace}/changes` | [`SyncServer::handle_changes`] |
//!
//! Status codes: 400 for rejected snapshots, 403 for viewers and
//! non-members, 404 for unknown workspaces, 409 when a workspace stays busy
//! past the lock timeout, 500 for storage failures.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod access;
mod config;
mod error;
mod handler;
mod locks;
mod response;
mod server;

pub use access::{AccessGuard, MembershipRoles, RoleLookup, StaticRoles};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{HandlerContext, RequestHandler};
pub use locks::WorkspaceLocks;
pub use response::HttpResponse;
pub use server::SyncServer;
