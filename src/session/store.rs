use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SpotgateError;

use super::record::TokenRecord;

/// Everything persisted for one user session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub tokens: TokenRecord,
    /// Path the user asked for before being sent to log in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_to: Option<String>,
}

/// Per-session key-value handle provided by the host.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<SessionData, SpotgateError>;

    async fn save(&self, data: &SessionData) -> Result<(), SpotgateError>;
}

impl std::fmt::Debug for dyn SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

/// Session kept in process memory, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    data: Mutex<SessionData>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenRecord) -> Self {
        Self {
            data: Mutex::new(SessionData {
                tokens,
                return_to: None,
            }),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<SessionData, SpotgateError> {
        let guard = self
            .data
            .lock()
            .map_err(|_| SpotgateError::Session("session lock poisoned".into()))?;
        Ok(guard.clone())
    }

    async fn save(&self, data: &SessionData) -> Result<(), SpotgateError> {
        let mut guard = self
            .data
            .lock()
            .map_err(|_| SpotgateError::Session("session lock poisoned".into()))?;
        *guard = data.clone();
        Ok(())
    }
}

/// Session persisted as a JSON file, one file per CLI profile.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `profile` under the default session directory.
    pub fn for_profile(profile: &str) -> Self {
        Self::new(session_dir().join(format!("{profile}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `SPOTGATE_SESSION_DIR`, or `~/.spotgate/sessions`.
pub fn session_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SPOTGATE_SESSION_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".spotgate")
        .join("sessions")
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<SessionData, SpotgateError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionData::default())
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|e| {
            SpotgateError::Session(format!(
                "Failed to parse session file {}: {e}",
                self.path.display()
            ))
        })
    }

    async fn save(&self, data: &SessionData) -> Result<(), SpotgateError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| SpotgateError::Session(format!("Failed to serialize session: {e}")))?;

        // Readers see either the old file or the new one, never a partial write.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
        }
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
