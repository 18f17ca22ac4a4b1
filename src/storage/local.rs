//! Local filesystem storage implementation.
//!
//! JSON files under a root directory, written atomically (temp file +
//! rename) so a crash mid-write never leaves a torn cache or log.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{Submission, Team, User};
use crate::storage::{SolveLog, SolveStore};

const USERS_FILE: &str = "users.json";
const TEAMS_FILE: &str = "teams.json";
const SOLVES_FILE: &str = "solves.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
}

impl LocalStore {
    /// Create a new LocalStore rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Read an id-keyed cache map, empty when the file is absent.
    async fn read_map<T: DeserializeOwned>(&self, key: &str) -> Result<HashMap<u64, T>> {
        Ok(self.read_json(key).await?.unwrap_or_default())
    }

    /// Load the seen-log, empty when no log has been written yet.
    async fn read_log(&self) -> Result<SolveLog> {
        match self.read_json::<SolveLog>(SOLVES_FILE).await? {
            Some(log) => Ok(log),
            None => Ok(SolveLog::new(Vec::new())),
        }
    }
}

#[async_trait]
impl SolveStore for LocalStore {
    async fn get_user(&self, id: u64) -> Result<Option<User>> {
        let users: HashMap<u64, User> = self.read_map(USERS_FILE).await?;
        Ok(users.get(&id).cloned())
    }

    async fn put_user(&self, user: &User) -> Result<()> {
        let mut users: HashMap<u64, User> = self.read_map(USERS_FILE).await?;
        users.insert(user.id, user.clone());
        self.write_json(USERS_FILE, &users).await
    }

    async fn get_team(&self, id: u64) -> Result<Option<Team>> {
        let teams: HashMap<u64, Team> = self.read_map(TEAMS_FILE).await?;
        Ok(teams.get(&id).cloned())
    }

    async fn put_team(&self, team: &Team) -> Result<()> {
        let mut teams: HashMap<u64, Team> = self.read_map(TEAMS_FILE).await?;
        teams.insert(team.id, team.clone());
        self.write_json(TEAMS_FILE, &teams).await
    }

    async fn solve_count(&self) -> Result<usize> {
        Ok(self.read_log().await?.solves.len())
    }

    async fn load_solves(&self) -> Result<Vec<Submission>> {
        Ok(self.read_log().await?.solves)
    }

    async fn append_solves(&self, batch: &[Submission]) -> Result<()> {
        let mut solves = self.read_log().await?.solves;
        solves.extend_from_slice(batch);
        let log = SolveLog::new(solves);
        self.write_json(SOLVES_FILE, &log).await?;
        log::debug!("Seen-log extended to {} submissions", log.count);
        Ok(())
    }
}
