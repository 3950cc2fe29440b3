//! Per-pass statistics.

use notesync_core::{ChangeOperation, EntityKind};
use std::collections::BTreeMap;
use std::fmt;

/// Counters for one kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindStats {
    /// Rows inserted.
    pub created: u64,
    /// Existing rows overwritten.
    pub updated: u64,
    /// Rows removed because the snapshot no longer contained them.
    pub deleted: u64,
    /// Submitted records that were dropped.
    pub skipped: u64,
}

impl KindStats {
    /// Returns the number of rows written or removed.
    pub fn changes(&self) -> u64 {
        self.created + self.updated + self.deleted
    }
}

/// Statistics of one sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Workspace version the pass produced.
    pub version: i64,
    kinds: BTreeMap<EntityKind, KindStats>,
}

impl PassStats {
    /// Creates empty statistics for a pass producing `version`.
    pub fn new(version: i64) -> Self {
        Self {
            version,
            kinds: BTreeMap::new(),
        }
    }

    /// Returns the counters of one kind.
    pub fn kind(&self, kind: EntityKind) -> KindStats {
        self.kinds.get(&kind).copied().unwrap_or_default()
    }

    /// Returns the number of rows written or removed across all kinds.
    pub fn total_changes(&self) -> u64 {
        self.kinds.values().map(KindStats::changes).sum()
    }

    /// Returns the number of dropped records across all kinds.
    pub fn total_skipped(&self) -> u64 {
        self.kinds.values().map(|k| k.skipped).sum()
    }

    pub(crate) fn count(&mut self, kind: EntityKind, operation: ChangeOperation) {
        let entry = self.kinds.entry(kind).or_default();
        match operation {
            ChangeOperation::Create => entry.created += 1,
            ChangeOperation::Update => entry.updated += 1,
            ChangeOperation::Delete => entry.deleted += 1,
        }
    }

    pub(crate) fn skip(&mut self, kind: EntityKind) {
        self.kinds.entry(kind).or_default().skipped += 1;
    }
}

impl fmt::Display for PassStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "version {}", self.version)?;
        for kind in EntityKind::ALL {
            let k = self.kind(kind);
            write!(
                f,
                ", {kind} +{}/~{}/-{}",
                k.created, k.updated, k.deleted
            )?;
            if k.skipped > 0 {
                write!(f, " ({} skipped)", k.skipped)?;
            }
        }
        Ok(())
    }
}
