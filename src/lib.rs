/// Public library interface for the MuscleUp habit and weight tracker
///
/// This module exports the tracker engine, its storage and sync backends,
/// and the MCP server that exposes it as a set of tools.

use std::path::PathBuf;
use thiserror::Error;

pub mod analytics;
pub mod domain;
pub mod mcp;
pub mod storage;
pub mod sync;
pub mod tools;
pub mod tracker;

// Re-export the types most callers need
pub use analytics::{Dashboard, MonthOverview, Statistics};
pub use domain::*;
pub use storage::{KeyValueStore, MemoryStore, SqliteChangeFeed, SqliteStore, StorageError, StorageKey};
pub use sync::{BroadcastFeed, ChangeFeed, NoSync, StorageEvent};
pub use tools::ToolError;
pub use tracker::HabitTracker;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tracker server backed by a SQLite file
///
/// Several servers may open the same file; each picks up the others'
/// writes through a [`SqliteChangeFeed`] before handling a request.
pub struct HabitTrackerServer {
    tracker: HabitTracker<SqliteStore>,
}

impl HabitTrackerServer {
    /// Open the database at `db_path`, creating and seeding it if needed
    pub async fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing tracker with database: {:?}", db_path);

        let store = SqliteStore::new(db_path)?;
        let fresh = StorageKey::ALL
            .iter()
            .map(|key| store.read(*key))
            .collect::<Result<Vec<_>, _>>()?
            .iter()
            .all(Option::is_none);
        let feed: Box<dyn ChangeFeed> = match store.change_feed() {
            Ok(feed) => Box::new(feed),
            Err(e) => {
                tracing::warn!("Change feed unavailable, running without sync: {}", e);
                Box::new(NoSync)
            }
        };

        let tracker = HabitTracker::load(store, CivilCalendar::ist(), feed);
        if fresh {
            tracing::info!("New database, writing default records");
            tracker.save_all();
        }

        Ok(Self { tracker })
    }

    /// Run the MCP server over stdin/stdout until stdin closes
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!(
            "Server started, {} habits in catalog, today is {}",
            self.tracker.habits().len(),
            self.tracker.calendar().today()
        );

        let mut mcp_server = mcp::McpServer::new(self.tracker);
        mcp_server.run().await?;

        Ok(())
    }

    pub fn tracker(&self) -> &HabitTracker<SqliteStore> {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut HabitTracker<SqliteStore> {
        &mut self.tracker
    }
}
