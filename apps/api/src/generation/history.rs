//! Resume history: generated resumes per profile, newest first.
//!
//! Persisted as one JSON document keyed by profile name. Appends and removals hold
//! the write lock across the file write, so the file and memory never disagree.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::profiles::models::TailoredResume;
use crate::storage::write_atomic;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub profile_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    pub job_description: String,
    pub resume: TailoredResume,
}

impl HistoryEntry {
    pub fn new(
        profile_name: &str,
        job_title: Option<&str>,
        company: Option<&str>,
        job_description: &str,
        resume: TailoredResume,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            profile_name: profile_name.to_string(),
            job_title: job_title.unwrap_or_default().trim().to_string(),
            company: company.unwrap_or_default().trim().to_string(),
            job_description: job_description.to_string(),
            resume,
        }
    }
}

pub struct HistoryLog {
    path: Option<PathBuf>,
    limit: usize,
    entries: RwLock<HashMap<String, Vec<HistoryEntry>>>,
}

impl HistoryLog {
    /// Loads the log at `path`. A missing file starts an empty log; a corrupt one
    /// is logged and replaced on the next append.
    pub async fn open(path: impl Into<PathBuf>, limit: usize) -> Self {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<HashMap<String, Vec<HistoryEntry>>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring unreadable history file {}: {e}", path.display());
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        info!(
            "Loaded resume history for {} profiles from {}",
            entries.len(),
            path.display()
        );

        Self {
            path: Some(path),
            limit,
            entries: RwLock::new(entries),
        }
    }

    pub fn in_memory(limit: usize) -> Self {
        Self {
            path: None,
            limit,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Records `entry` at the front of its profile's list, dropping the oldest
    /// entries beyond the retention limit.
    pub async fn append(&self, entry: HistoryEntry) -> Result<Uuid, AppError> {
        let id = entry.id;
        let profile = entry.profile_name.clone();

        let mut entries = self.entries.write().await;
        let mut updated = entries.clone();
        let list = updated.entry(profile.clone()).or_default();
        list.insert(0, entry);
        list.truncate(self.limit.max(1));

        self.persist(&updated).await?;
        *entries = updated;

        info!("Recorded history entry {id} for '{profile}'");
        Ok(id)
    }

    /// Deletes one entry from a profile's history.
    pub async fn remove(&self, profile_name: &str, id: Uuid) -> Result<(), AppError> {
        let mut entries = self.entries.write().await;
        let mut updated = entries.clone();
        let list = updated.get_mut(profile_name).filter(|list| list.iter().any(|e| e.id == id));
        let Some(list) = list else {
            return Err(AppError::NotFound(format!(
                "History entry {id} not found for '{profile_name}'"
            )));
        };
        list.retain(|e| e.id != id);
        if list.is_empty() {
            updated.remove(profile_name);
        }

        self.persist(&updated).await?;
        *entries = updated;

        info!("Removed history entry {id} for '{profile_name}'");
        Ok(())
    }

    async fn persist(&self, entries: &HashMap<String, Vec<HistoryEntry>>) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(entries)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize history: {e}")))?;
        write_atomic(path, &json)
            .await
            .map_err(|e| AppError::Storage(format!("{e:#}")))
    }

    pub async fn list(&self, profile_name: &str) -> Vec<HistoryEntry> {
        self.entries
            .read()
            .await
            .get(profile_name)
            .cloned()
            .unwrap_or_default()
    }
}
