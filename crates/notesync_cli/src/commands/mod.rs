//! CLI command implementations.

pub mod admin;
pub mod changes;
pub mod export;
pub mod inspect;
pub mod sync;

use notesync_sync_server::{ServerConfig, SyncServer};
use std::fs;
use std::path::Path;

/// Result type for commands.
pub type CommandResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Opens an existing database and its upload directory.
pub fn open_server(db_path: &Path, uploads: &Path) -> CommandResult<SyncServer> {
    require_database(db_path)?;
    Ok(SyncServer::open(db_path, uploads, ServerConfig::default())?)
}

/// Fails unless a database file exists at `db_path`.
pub fn require_database(db_path: &Path) -> CommandResult {
    if !db_path.is_file() {
        return Err(format!("No database found at {:?}, run `notesync init` first", db_path).into());
    }
    Ok(())
}

/// Writes `bytes` to `output`, or to stdout when no file is given.
pub fn write_output(output: Option<&Path>, bytes: &[u8]) -> CommandResult {
    match output {
        Some(path) => {
            fs::write(path, bytes)?;
            println!("✓ Wrote {} bytes to {:?}", bytes.len(), path);
        }
        None => println!("{}", String::from_utf8_lossy(bytes)),
    }
    Ok(())
}
