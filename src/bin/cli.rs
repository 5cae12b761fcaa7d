//! GDStore CLI
//!
//! Command-line interface for inspecting and editing a GDStore log file.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gdstore::{Config, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// GDStore CLI
#[derive(Parser, Debug)]
#[command(name = "gdstore-cli")]
#[command(about = "CLI for the GDStore embedded key-value store")]
#[command(version)]
struct Args {
    /// Log file
    #[arg(short, long, default_value = "gdstore.data")]
    file: String,

    /// Write through a buffer (flushed on exit)
    #[arg(short, long)]
    buffered: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Put {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    #[command(alias = "del")]
    Delete {
        /// The key to delete
        key: String,
    },

    /// List all keys
    Keys,

    /// Print the number of keys
    Count,

    /// Rewrite the log to its minimal form
    Consolidate,
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays scriptable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gdstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .path(&args.file)
        .buffered(args.buffered)
        .build();

    let store = match Store::open(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run(&store, args.command) {
        tracing::error!("Command failed: {}", e);
        return ExitCode::FAILURE;
    }

    if let Err(e) = store.close() {
        tracing::error!("Failed to close store: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(store: &Store, command: Commands) -> gdstore::Result<()> {
    match command {
        Commands::Get { key } => match store.get(&key) {
            Some(value) => println!("{}", String::from_utf8_lossy(&value)),
            None => tracing::warn!("Key not found: {}", key),
        },
        Commands::Put { key, value } => store.put(key, value)?,
        Commands::Delete { key } => store.delete(key)?,
        Commands::Keys => {
            for key in store.keys() {
                println!("{}", String::from_utf8_lossy(&key));
            }
        }
        Commands::Count => println!("{}", store.count()),
        Commands::Consolidate => store.consolidate()?,
    }
    Ok(())
}
