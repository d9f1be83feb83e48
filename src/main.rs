use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use neona_tui::logging;
use neona_tui::remote::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_LEASE_TTL_SECS, DEFAULT_TIMEOUT_SECS,
};

mod cli_exec;

#[derive(Parser)]
#[command(name = "neona-tui")]
#[command(about = "Terminal session for the Neona task daemon", long_about = None)]
struct Cli {
    /// Daemon base URL
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    api: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Lease TTL in seconds sent with claim
    #[arg(long, global = true, default_value_t = DEFAULT_LEASE_TTL_SECS)]
    lease_ttl: u64,

    /// Append logs to this file (the interactive session logs nowhere otherwise)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive session (the default)
    Tui,

    /// Check daemon health; exits non-zero when the daemon is offline
    Health {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// List tasks
    Tasks {
        /// Only tasks in this status
        #[arg(long)]
        status: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one task
    Show {
        task_id: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the runs of a task
    Logs {
        task_id: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Show worker pool stats
    Workers {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Add or search memory items
    Memory {
        #[command(subcommand)]
        command: MemoryCommands,
    },
}

#[derive(Subcommand)]
enum MemoryCommands {
    /// Add a memory item
    Add {
        #[arg(long)]
        content: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
        /// Associate the item with a task
        #[arg(long)]
        task: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Search memory
    Query {
        query: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    match (&cli.log_file, &command) {
        (Some(path), _) => logging::init_file_logging(path)?,
        (None, Commands::Tui) => {}
        (None, _) => logging::init_stderr_logging()?,
    }

    let config = ClientConfig {
        base_url: cli.api.trim_end_matches('/').to_string(),
        timeout: Duration::from_secs(cli.timeout_secs),
        lease_ttl_sec: cli.lease_ttl,
    };
    cli_exec::handle_command(&config, command)
}
