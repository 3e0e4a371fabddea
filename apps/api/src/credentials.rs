//! LLM credential store. Single writer; readers only ever see a persisted value.
//!
//! A key from the environment wins at startup and is never written to disk.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::storage::write_atomic;

/// Keys shorter than this are masked entirely.
const MIN_MASKABLE_LEN: usize = 8;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredential {
    #[serde(default)]
    api_key: String,
}

/// What the API may reveal about the stored key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredentialStatus {
    pub configured: bool,
    pub masked_key: Option<String>,
}

pub struct CredentialStore {
    path: PathBuf,
    key: RwLock<Option<String>>,
}

impl CredentialStore {
    pub async fn open(path: impl Into<PathBuf>, env_key: Option<String>) -> Self {
        let path = path.into();
        let key = match env_key.filter(|k| !k.trim().is_empty()) {
            Some(key) => {
                info!("Using LLM API key from the environment");
                Some(key.trim().to_string())
            }
            None => read_stored(&path).await,
        };

        Self {
            path,
            key: RwLock::new(key),
        }
    }

    pub async fn get(&self) -> Option<String> {
        self.key.read().await.clone()
    }

    /// Persists `api_key`, then makes it visible to readers.
    pub async fn set(&self, api_key: &str) -> Result<(), AppError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::Validation("API key cannot be empty".to_string()));
        }

        let mut current = self.key.write().await;
        let json = serde_json::to_vec_pretty(&StoredCredential {
            api_key: api_key.to_string(),
        })
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize credential: {e}")))?;
        write_atomic(&self.path, &json)
            .await
            .map_err(|e| AppError::Storage(format!("{e:#}")))?;
        *current = Some(api_key.to_string());

        info!("Stored new LLM API key ({})", mask_key(api_key));
        Ok(())
    }

    pub async fn status(&self) -> CredentialStatus {
        let key = self.key.read().await;
        CredentialStatus {
            configured: key.is_some(),
            masked_key: key.as_deref().map(mask_key),
        }
    }
}

async fn read_stored(path: &std::path::Path) -> Option<String> {
    let raw = tokio::fs::read_to_string(path).await.ok()?;
    match serde_json::from_str::<StoredCredential>(&raw) {
        Ok(stored) => Some(stored.api_key.trim().to_string()).filter(|k| !k.is_empty()),
        Err(e) => {
            warn!("Ignoring unreadable credential file {}: {e}", path.display());
            None
        }
    }
}

/// Shows only the last four characters: `sk-ant-...abcd`.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < MIN_MASKABLE_LEN {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("sk-ant-...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key_keeps_last_four() {
        assert_eq!(mask_key("sk-ant-api03-abcdefWXYZ"), "sk-ant-...WXYZ");
        assert_eq!(mask_key("short"), "****");
    }

    #[tokio::test]
    async fn test_set_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("api_config.json");

        let store = CredentialStore::open(&path, None).await;
        assert_eq!(store.get().await, None);
        assert!(!store.status().await.configured);

        store.set("  sk-ant-secret-1234 ").await.unwrap();
        assert_eq!(store.get().await.as_deref(), Some("sk-ant-secret-1234"));

        let reopened = CredentialStore::open(&path, None).await;
        assert_eq!(
            reopened.status().await,
            CredentialStatus {
                configured: true,
                masked_key: Some("sk-ant-...1234".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_env_key_takes_precedence_and_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_config.json");
        tokio::fs::write(&path, r#"{"api_key": "sk-ant-stored-0000"}"#)
            .await
            .unwrap();

        let store = CredentialStore::open(&path, Some("sk-ant-env-9999".to_string())).await;
        assert_eq!(store.get().await.as_deref(), Some("sk-ant-env-9999"));

        let on_disk = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(on_disk.contains("sk-ant-stored-0000"));
    }

    #[tokio::test]
    async fn test_blank_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::open(dir.path().join("c.json"), None).await;
        assert!(matches!(store.set("   ").await, Err(AppError::Validation(_))));
        assert_eq!(store.get().await, None);
    }
}
