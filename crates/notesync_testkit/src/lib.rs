//! # notesync Testkit
//!
//! Test utilities for notesync.
//!
//! This crate provides:
//! - A throwaway environment with a database, an upload directory and a
//!   seeded workspace ([`TestEnv`])
//! - A builder for client snapshots ([`SnapshotBuilder`])
//! - Property-based snapshot generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notesync_testkit::prelude::*;
//!
//! #[test]
//! fn sync_creates_notes() {
//!     let env = TestEnv::new();
//!     let request = SnapshotBuilder::new().note(0, "hello", None).build();
//!     // ... run a pass against env.session()
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod scenarios;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::scenarios::*;
}

pub use fixtures::*;
pub use generators::*;
pub use scenarios::*;
