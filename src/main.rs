/// Main entry point for the MuscleUp tracker MCP server
///
/// Sets up logging, parses command line arguments and starts the server,
/// which answers JSON-RPC requests over stdin/stdout.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use muscleup_tracker::HabitTrackerServer;

const DB_FILE: &str = "muscleup.db";

/// Pick the first writable location for the database file
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let candidates = [
        dirs::home_dir().map(|p| p.join(".muscleup")),
        dirs::data_dir().map(|p| p.join("muscleup")),
        dirs::config_dir().map(|p| p.join("muscleup")),
        std::env::current_dir().ok().map(|p| p.join(".muscleup")),
    ];

    for dir in candidates.iter().flatten() {
        if std::fs::create_dir_all(dir).is_err() {
            continue;
        }
        let marker = dir.join(".write_check");
        if std::fs::write(&marker, b"ok").is_ok() {
            let _ = std::fs::remove_file(&marker);
            return Ok(dir.join(DB_FILE));
        }
    }

    let temp_dir = std::env::temp_dir().join("muscleup");
    std::fs::create_dir_all(&temp_dir)?;
    let temp_path = temp_dir.join(DB_FILE);

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path)
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    ///
    /// Defaults to ~/.muscleup/muscleup.db, falling back to other writable
    /// locations. Instances pointed at the same file stay in sync.
    #[arg(long)]
    database: Option<PathBuf>,
    
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
    
    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };
    
    tracing_subscriber::fmt()
        .with_env_filter(format!("muscleup_tracker={}", log_level))
        .with_writer(std::io::stderr) // stdout carries the protocol
        .init();
    
    info!("Starting MuscleUp tracker");
    
    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            path
        }
        None => get_default_database_path()?,
    };
    
    info!("Using database at: {}", db_path.display());
    
    let server = HabitTrackerServer::new(db_path).await?;
    server.run().await?;

    info!("MuscleUp tracker shutdown complete");
    Ok(())
}