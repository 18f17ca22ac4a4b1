//! Durable cache storage for the solve tracker.
//!
//! Three things survive restarts:
//! - user cache: id → `User`, last-write-wins
//! - team cache: id → `Team`, last-write-wins
//! - seen-log: ordered, append-only list of processed `Submission`s; its
//!   length is the high-water mark for the poll diff
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── users.json            # User cache
//! ├── teams.json            # Team cache
//! └── solves.json           # Seen-submissions log (append-only)
//! ```
//!
//! A single active writer is assumed; running multiple bot instances over
//! the same store is unsupported.

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Submission, Team, User};

// Re-export for convenience
pub use local::LocalStore;

/// Header for solves.json with bookkeeping metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveLog {
    /// ISO 8601 timestamp of last append
    pub updated_at: DateTime<Utc>,
    /// Total processed submission count
    pub count: usize,
    /// The processed submissions, in arrival order
    pub solves: Vec<Submission>,
}

impl SolveLog {
    pub fn new(solves: Vec<Submission>) -> Self {
        Self {
            updated_at: Utc::now(),
            count: solves.len(),
            solves,
        }
    }
}

/// Trait for durable solve-tracker storage backends.
#[async_trait]
pub trait SolveStore: Send + Sync {
    /// Look up a cached user by id.
    async fn get_user(&self, id: u64) -> Result<Option<User>>;

    /// Cache a user (last write wins).
    async fn put_user(&self, user: &User) -> Result<()>;

    /// Look up a cached team by id.
    async fn get_team(&self, id: u64) -> Result<Option<Team>>;

    /// Cache a team (last write wins).
    async fn put_team(&self, team: &Team) -> Result<()>;

    /// Number of submissions in the seen-log.
    async fn solve_count(&self) -> Result<usize>;

    /// Load the full seen-log in arrival order.
    async fn load_solves(&self) -> Result<Vec<Submission>>;

    /// Append a batch of processed submissions in one durable write.
    async fn append_solves(&self, batch: &[Submission]) -> Result<()>;
}
