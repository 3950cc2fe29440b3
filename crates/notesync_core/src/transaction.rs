//! Scoped storage transactions.
//!
//! A [`Transaction`] wraps one SQLite transaction of a [`crate::Session`].
//! It rolls back on every exit that is not an explicit [`Transaction::commit`]:
//! an early `?` return, a dropped guard, or unwinding from a panic.

use crate::error::{CoreError, CoreResult};
use rusqlite::TransactionBehavior;
use std::ops::Deref;
use std::time::Instant;
use tracing::{debug, warn};

/// Whether a transaction may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    /// Read-only snapshot.
    Read,
    /// Writer; takes the database write lock on begin.
    Write,
}

/// State of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Transaction is active and can perform operations.
    Active,
    /// Transaction has been committed.
    Committed,
    /// Transaction has been rolled back.
    RolledBack,
}

/// Logs implicit rollbacks when the owning transaction is dropped.
#[derive(Debug)]
struct ExitGuard {
    mode: TransactionMode,
    started: Instant,
    state: TransactionState,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        if self.state != TransactionState::Active {
            return;
        }
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        if std::thread::panicking() {
            warn!(mode = ?self.mode, elapsed_ms, "transaction rolled back while unwinding");
        } else {
            debug!(mode = ?self.mode, elapsed_ms, "transaction rolled back");
        }
    }
}

/// An active storage transaction.
///
/// Dereferences to [`rusqlite::Connection`] so table operations accept it
/// wherever they accept a connection.
#[derive(Debug)]
pub struct Transaction<'s> {
    tx: rusqlite::Transaction<'s>,
    guard: ExitGuard,
}

impl<'s> Transaction<'s> {
    pub(crate) fn begin(conn: &'s mut rusqlite::Connection, mode: TransactionMode) -> CoreResult<Self> {
        let behavior = match mode {
            TransactionMode::Read => TransactionBehavior::Deferred,
            TransactionMode::Write => TransactionBehavior::Immediate,
        };
        let tx = conn.transaction_with_behavior(behavior)?;
        Ok(Self {
            tx,
            guard: ExitGuard {
                mode,
                started: Instant::now(),
                state: TransactionState::Active,
            },
        })
    }

    /// Returns the transaction mode.
    #[must_use]
    pub fn mode(&self) -> TransactionMode {
        self.guard.mode
    }

    /// Fails unless the transaction may write.
    pub fn ensure_writable(&self) -> CoreResult<()> {
        match self.guard.mode {
            TransactionMode::Write => Ok(()),
            TransactionMode::Read => Err(CoreError::invalid_operation(
                "write attempted in a read transaction",
            )),
        }
    }

    /// Commits the transaction.
    pub fn commit(self) -> CoreResult<()> {
        let Self { tx, mut guard } = self;
        tx.commit()?;
        guard.state = TransactionState::Committed;
        debug!(
            mode = ?guard.mode,
            elapsed_ms = guard.started.elapsed().as_millis() as u64,
            "transaction committed"
        );
        Ok(())
    }

    /// Rolls the transaction back explicitly.
    pub fn rollback(self) -> CoreResult<()> {
        let Self { tx, mut guard } = self;
        guard.state = TransactionState::RolledBack;
        tx.rollback()?;
        debug!(mode = ?guard.mode, "transaction rolled back");
        Ok(())
    }
}

impl Deref for Transaction<'_> {
    type Target = rusqlite::Connection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}
