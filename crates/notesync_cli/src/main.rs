//! notesync CLI
//!
//! Command-line tools for notesync workspace management.
//!
//! # Commands
//!
//! - `init` - Create a database and a workspace
//! - `add-member` - Grant a user a role in a workspace
//! - `sync` - Apply a JSON snapshot file as a user
//! - `export` - Write the current snapshot of a workspace
//! - `inspect` - Display row counts and versions
//! - `changes` - Dump change log entries

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use notesync_core::Role;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// notesync command-line workspace tools.
#[derive(Parser)]
#[command(name = "notesync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database file
    #[arg(global = true, short, long, default_value = "notesync.db")]
    db: PathBuf,

    /// Directory for stored note images
    #[arg(global = true, short, long, default_value = "uploads")]
    uploads: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database (if needed) and a new workspace
    Init {
        /// Workspace name
        #[arg(short, long)]
        name: String,

        /// Owning user
        #[arg(short, long)]
        owner: i64,
    },

    /// Grant a user a role in a workspace
    AddMember {
        /// Workspace ID
        #[arg(short, long)]
        workspace: i64,

        /// User ID
        #[arg(short = 'U', long)]
        user: i64,

        /// Role to grant
        #[arg(short, long, value_enum, default_value = "collaborator")]
        role: RoleArg,
    },

    /// Apply a JSON snapshot file as a user
    Sync {
        /// Workspace ID
        #[arg(short, long)]
        workspace: i64,

        /// User ID
        #[arg(short = 'U', long)]
        user: i64,

        /// Snapshot file
        file: PathBuf,

        /// Write the resulting snapshot here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the current snapshot of a workspace
    Export {
        /// Workspace ID
        #[arg(short, long)]
        workspace: i64,

        /// User ID
        #[arg(short = 'U', long)]
        user: i64,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display row counts and versions
    Inspect {
        /// Only this workspace
        #[arg(short, long)]
        workspace: Option<i64>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Dump change log entries
    Changes {
        /// Workspace ID
        #[arg(short, long)]
        workspace: i64,

        /// User ID
        #[arg(short = 'U', long)]
        user: i64,

        /// Only changes after this version
        #[arg(short, long, default_value = "0")]
        since: i64,

        /// Maximum number of entries
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show version information
    Version,
}

/// Roles accepted on the command line.
#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Owner,
    Editor,
    Collaborator,
    Viewer,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Owner => Role::Owner,
            RoleArg::Editor => Role::Editor,
            RoleArg::Collaborator => Role::Collaborator,
            RoleArg::Viewer => Role::Viewer,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { name, owner } => {
            commands::admin::init(&cli.db, &name, owner)?;
        }
        Commands::AddMember {
            workspace,
            user,
            role,
        } => {
            commands::admin::add_member(&cli.db, workspace, user, role.into())?;
        }
        Commands::Sync {
            workspace,
            user,
            file,
            output,
        } => {
            commands::sync::run(&cli.db, &cli.uploads, workspace, user, &file, output.as_deref())?;
        }
        Commands::Export {
            workspace,
            user,
            output,
        } => {
            commands::export::run(&cli.db, &cli.uploads, workspace, user, output.as_deref())?;
        }
        Commands::Inspect { workspace, format } => {
            commands::inspect::run(&cli.db, workspace, &format)?;
        }
        Commands::Changes {
            workspace,
            user,
            since,
            limit,
        } => {
            commands::changes::run(&cli.db, &cli.uploads, workspace, user, since, limit)?;
        }
        Commands::Version => {
            println!("notesync CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("notesync core v{}", notesync_core::VERSION);
            println!("database schema v{}", notesync_core::LATEST_SCHEMA_VERSION);
        }
    }

    Ok(())
}
