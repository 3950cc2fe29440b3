//! Client-to-server identifier maps.

use notesync_core::EntityKind;
use std::collections::HashMap;

/// Maps the identifiers a client submitted for one kind to the identifiers
/// the rows actually have after reconciliation.
///
/// A map lives for one pass. New rows share the submitted id `0`, so the
/// entry for `0` is whichever new row came last and is never used for
/// resolution.
#[derive(Debug, Clone)]
pub struct CrossReferenceMap {
    kind: EntityKind,
    entries: HashMap<i64, i64>,
}

impl CrossReferenceMap {
    /// Creates an empty map for a kind.
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
        }
    }

    /// Returns the kind whose identifiers are mapped.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Records that `submitted` now lives at `resolved`.
    pub fn record(&mut self, submitted: i64, resolved: i64) {
        self.entries.insert(submitted, resolved);
    }

    /// Resolves a client reference. Only positive identifiers resolve.
    pub fn resolve(&self, submitted: i64) -> Option<i64> {
        if submitted <= 0 {
            return None;
        }
        self.entries.get(&submitted).copied()
    }

    /// Returns the number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
