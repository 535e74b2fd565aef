//! Matrix session persistence.
//!
//! Login credentials and the latest sync token are stored in a JSON file so
//! the bot can restore its session across restarts instead of logging in
//! again. The SQLite database used by the Matrix SDK lives next to it.

use std::{fs::exists, path::PathBuf};

use tokio::fs;

use log::{debug, trace};
use matrix_sdk::authentication::matrix;
use serde::{Deserialize, Serialize};

/// Serialized session data.
///
/// Contains the Matrix user session and, once the first sync completed, the
/// latest sync token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Session {
    /// The Matrix user session containing authentication credentials.
    user_session: matrix::MatrixSession,

    /// The latest sync token for resuming sync operations.
    ///
    /// Omitted from serialization when `None` to keep the file clean.
    #[serde(skip_serializing_if = "Option::is_none")]
    sync_token: Option<String>,
}

/// Matrix session manager.
///
/// Loads an existing session from disk at construction and persists updates
/// to it. The session directory contains:
/// - `session`: JSON file with user authentication and sync token
/// - `sqlite`: SQLite database for Matrix SDK state
#[derive(Clone)]
pub struct MatrixSession {
    /// The user session if it exists.
    session: Option<Session>,
    /// Path to the sqlite database. Value is `dir_path/sqlite`
    sqlite_path: String,
    /// Path to the session file. Value is `dir_path/session`
    session_path: String,
}

impl MatrixSession {
    /// Creates a new session manager for the given directory.
    ///
    /// An existing session file is loaded if present; otherwise the manager
    /// starts without a session and [`MatrixSession::has_session`] returns
    /// `false` until one is persisted.
    pub async fn new(dir_path: &str) -> Result<MatrixSession, anyhow::Error> {
        debug!("read session at {}", dir_path);

        let sqlite_path_buf: PathBuf = [dir_path, "sqlite"].iter().collect();
        let sqlite_path = sqlite_path_buf.to_str().unwrap().to_owned();
        debug!("sql path {}", sqlite_path);

        let session_path_buf: PathBuf = [dir_path, "session"].iter().collect();
        let session_path = session_path_buf.to_str().unwrap().to_owned();
        debug!("session path {}", session_path);

        let session = MatrixSession::get_session(&session_path).await.ok();
        debug!("found user session {:?}", session);

        Ok(MatrixSession {
            session,
            sqlite_path,
            session_path,
        })
    }

    /// Loads the session from disk.
    async fn get_session(session_path: &str) -> Result<Session, anyhow::Error> {
        if !exists(session_path).unwrap_or_default() {
            return Err(anyhow::anyhow!("session file does not exist"));
        }

        let session_data = fs::read_to_string(session_path).await?;
        let session: Session = serde_json::from_str(&session_data).map_err(anyhow::Error::new)?;
        Ok(session)
    }

    /// Checks if a session is currently loaded.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Returns the path to the SQLite database used by the Matrix SDK.
    pub fn get_sqlite_path(&self) -> String {
        self.sqlite_path.clone()
    }

    /// Returns the user session if one is loaded.
    pub fn get_user_session(&self) -> Option<&matrix::MatrixSession> {
        self.session.as_ref().map(|s| &s.user_session)
    }

    /// Returns the sync token if one is stored.
    pub fn get_sync_token(&self) -> Option<String> {
        self.session.as_ref().and_then(|s| s.sync_token.clone())
    }

    /// Persists the sync token to disk.
    ///
    /// Updates the session file with the new sync token while preserving
    /// the user session data.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be read, parsed, or written.
    pub async fn persist_sync_token(&self, sync_token: String) -> anyhow::Result<()> {
        trace!("persist sync token {}", sync_token);

        let serialized_session = fs::read_to_string(&self.session_path).await?;
        let mut full_session: Session = serde_json::from_str(&serialized_session)?;

        full_session.sync_token = Some(sync_token);
        let serialized_session = serde_json::to_string(&full_session)?;
        fs::write(&self.session_path, serialized_session).await?;

        trace!("sync token persisted");
        Ok(())
    }

    /// Persists the user session to disk.
    ///
    /// Creates a new session file with the provided user session data. The
    /// sync token is not included when creating a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be written.
    pub async fn persist_user_session(
        &self,
        user_session: &matrix::MatrixSession,
    ) -> anyhow::Result<()> {
        trace!("persist user session");

        let session = Session {
            user_session: user_session.clone(),
            sync_token: None,
        };

        let serialized_session = serde_json::to_string(&session)?;
        fs::write(&self.session_path, serialized_session).await?;

        trace!("user session persisted");
        Ok(())
    }
}
