//! Profile store: one pretty-printed JSON file per profile name.
//!
//! No locking beyond the filesystem: last writer wins. Writes are atomic renames,
//! so a concurrent `load` sees either the previous profile or the new one.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::profiles::models::Profile;
use crate::storage::{ensure_dir, write_atomic};

#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns every stored profile name, sorted.
    pub async fn list(&self) -> Result<Vec<String>, AppError> {
        ensure_dir(&self.dir).await.map_err(storage_error)?;

        let mut entries = fs::read_dir(&self.dir).await.map_err(|e| {
            AppError::Storage(format!("Failed to read {}: {e}", self.dir.display()))
        })?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        debug!("Found {} profiles in {}", names.len(), self.dir.display());
        Ok(names)
    }

    pub async fn load(&self, name: &str) -> Result<Profile, AppError> {
        let clean = clean_name(name)?;
        let path = self.path_for(&clean);

        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!("Profile '{clean}' not found")));
            }
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };

        parse_profile(&raw, &clean)
    }

    /// Creates or overwrites the profile. Returns the cleaned name it was stored under.
    pub async fn save(&self, name: &str, profile: &Profile) -> Result<String, AppError> {
        let clean = clean_name(name)?;
        let path = self.path_for(&clean);

        let json = serde_json::to_vec_pretty(profile)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize profile: {e}")))?;
        write_atomic(&path, &json).await.map_err(storage_error)?;

        info!("Saved profile '{clean}' to {}", path.display());
        Ok(clean)
    }

    pub async fn delete(&self, name: &str) -> Result<(), AppError> {
        let clean = clean_name(name)?;
        let path = self.path_for(&clean);

        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted profile '{clean}'");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("Profile '{clean}' not found")))
            }
            Err(e) => Err(AppError::Storage(format!(
                "Failed to delete {}: {e}",
                path.display()
            ))),
        }
    }

    fn path_for(&self, clean: &str) -> PathBuf {
        self.dir.join(format!("{clean}.json"))
    }
}

/// Reads a profile from an arbitrary JSON file, outside any store directory.
pub async fn load_profile_file(path: &Path) -> Result<Profile, AppError> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!(
                "Profile file {} not found",
                path.display()
            )));
        }
        Err(e) => {
            return Err(AppError::Storage(format!(
                "Failed to read {}: {e}",
                path.display()
            )))
        }
    };
    parse_profile(&raw, &path.display().to_string())
}

fn parse_profile(raw: &str, label: &str) -> Result<Profile, AppError> {
    let mut value: Value = serde_json::from_str(raw)
        .map_err(|e| AppError::Storage(format!("Profile '{label}' is not valid JSON: {e}")))?;
    migrate_legacy_education(&mut value);

    serde_json::from_value(value)
        .map_err(|e| AppError::Storage(format!("Profile '{label}' has an invalid shape: {e}")))
}

/// Normalizes a user-chosen profile name into the form used as a file stem:
/// trimmed, inner whitespace collapsed, dots removed.
pub fn clean_name(name: &str) -> Result<String, AppError> {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let clean = collapsed.replace('.', "");

    if clean.is_empty() {
        return Err(AppError::Validation(
            "Profile name cannot be empty".to_string(),
        ));
    }
    if clean.contains(['/', '\\']) || clean.chars().any(char::is_control) {
        return Err(AppError::Validation(format!(
            "Profile name '{clean}' contains invalid characters"
        )));
    }
    Ok(clean)
}

/// Older files stored a single `graduation_date` per education entry.
/// Converts it to `start_date`/`end_date`, estimating a four-year programme.
fn migrate_legacy_education(value: &mut Value) {
    let Some(education) = value.get_mut("education").and_then(Value::as_array_mut) else {
        return;
    };

    for edu in education.iter_mut().filter_map(Value::as_object_mut) {
        if edu.contains_key("start_date") {
            continue;
        }
        let Some(grad) = edu.remove("graduation_date") else {
            continue;
        };
        let grad = grad.as_str().unwrap_or_default().to_string();

        let parts: Vec<&str> = grad.split_whitespace().collect();
        let start = match parts.as_slice() {
            [month, year] => year
                .parse::<i32>()
                .map(|y| format!("{month} {}", y - 4))
                .unwrap_or_default(),
            _ => String::new(),
        };

        edu.insert("start_date".to_string(), Value::String(start));
        edu.insert("end_date".to_string(), Value::String(grad));
    }
}

fn storage_error(e: anyhow::Error) -> AppError {
    AppError::Storage(format!("{e:#}"))
}
