//! Session token storage.
//!
//! The session is a single bearer token persisted in `<base>/session.json`
//! with restricted permissions (0600). It is read synchronously when the
//! holder is created, so the first request already sees it. Tokens are never
//! logged or displayed in full.
//!
//! Each process reads its own copy at start-up; concurrent processes with
//! different sessions do not reconcile.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// On-disk shape of the session file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// Holder of the current authentication token.
///
/// Shared as `Arc<Session>` between the transport and the login flow.
/// Presence of a token means "authenticated" for routing purposes only; the
/// server decides whether it is still valid.
pub struct Session {
    path: PathBuf,
    token: RwLock<Option<String>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("path", &self.path)
            .field("token", &self.get().as_deref().map(mask_token))
            .finish()
    }
}

impl Session {
    /// Loads the session from the default session path.
    ///
    /// # Errors
    /// Returns an error if the session file exists but cannot be read.
    pub fn load() -> Result<Self> {
        Self::load_from(paths::session_path())
    }

    /// Loads the session persisted at `path`.
    ///
    /// A missing or unparseable file yields an anonymous session; the next
    /// `set` overwrites it and `clear` removes it.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let token = read_token(&path)?;
        Ok(Self {
            path,
            token: RwLock::new(token),
        })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current token, if any.
    pub fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Installs `token` and persists it.
    ///
    /// The in-memory value is replaced first, so subsequent requests are
    /// authenticated even if writing the file fails.
    ///
    /// The token is opaque and stored exactly as given.
    ///
    /// # Errors
    /// Returns an error if the token is empty or cannot be persisted.
    pub fn set(&self, token: &str) -> Result<()> {
        if token.is_empty() {
            anyhow::bail!("Token cannot be empty");
        }

        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        tracing::info!(token = %mask_token(token), "session established");

        write_token(&self.path, token)
    }

    /// Removes the token from memory and from disk.
    /// Returns whether a token was present.
    ///
    /// # Errors
    /// Returns an error if the session file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool> {
        let had_token = self
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();

        let had_file = self.path.exists();
        if had_file {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }

        if had_token || had_file {
            tracing::info!("session cleared");
        }
        Ok(had_token || had_file)
    }
}

fn read_token(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session from {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<SessionFile>(&contents) {
        Ok(file) => Ok(file.token.filter(|t| !t.is_empty())),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable session file");
            Ok(None)
        }
    }
}

/// Writes the session file with restricted permissions (0600).
fn write_token(path: &Path, token: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let contents = serde_json::to_string_pretty(&SessionFile {
        token: Some(token.to_string()),
    })
    .context("Failed to serialize session")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .with_context(|| format!("Failed to open {} for writing", path.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    }

    Ok(())
}

/// Masks a token for display, keeping only a short prefix.
pub fn mask_token(token: &str) -> String {
    if token.chars().count() > 12 {
        let prefix: String = token.chars().take(12).collect();
        format!("{prefix}...")
    } else {
        "***".to_string()
    }
}
