//! Per-workspace serialization of sync passes.
//!
//! SQLite already serializes writers, but a pass also deletes image files
//! after its commit. Holding the workspace lock until that cleanup ends keeps
//! a concurrent pass from reusing a path that is about to be removed.

use crate::error::{ServerError, ServerResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A lock per workspace, created on first use.
#[derive(Debug, Default)]
pub struct WorkspaceLocks {
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl WorkspaceLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding the lock for `workspace_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::WorkspaceBusy`] if the lock is not acquired
    /// within `timeout`; otherwise whatever `f` returns.
    pub fn run<T, F>(&self, workspace_id: i64, timeout: Duration, f: F) -> ServerResult<T>
    where
        F: FnOnce() -> ServerResult<T>,
    {
        let lock = self.entry(workspace_id);
        let started = Instant::now();
        let result = match lock.try_lock_for(timeout) {
            Some(_guard) => f(),
            None => {
                tracing::warn!(workspace_id, ?timeout, "Workspace lock timed out");
                Err(ServerError::WorkspaceBusy {
                    workspace_id,
                    waited: started.elapsed(),
                })
            }
        };
        self.release(workspace_id, lock);
        result
    }

    /// Returns the number of workspaces with a lock entry.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    /// Returns true if no workspace has a lock entry.
    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }

    fn entry(&self, workspace_id: i64) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.lock().entry(workspace_id).or_default())
    }

    /// Drops the table entry once no other request holds or awaits it.
    fn release(&self, workspace_id: i64, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock();
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&workspace_id);
        }
    }
}
