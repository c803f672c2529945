//! Authentication gate and persisted session state
//!
//! The session flag outlives a single process run, so it is compensated by
//! a clean-shutdown marker: resuming without one invalidates a persisted
//! login. Theme keys live in the same document and are cleared together
//! with the flag on logout.

use backoffice_client::{Authenticator, ClientError};
use backoffice_core::{DashboardConfig, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

/// File holding the session flag and theme keys
pub const SESSION_FILE: &str = "session.json";

/// Marker file recording that the previous run closed cleanly
pub const CLEAN_SHUTDOWN_FILE: &str = "clean-shutdown";

/// Generic login failure message for transport-level trouble
pub const LOGIN_FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// The persisted session document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    /// Whether the operator is logged in
    #[serde(default)]
    pub authenticated: bool,

    /// Last chosen theme color
    #[serde(default)]
    pub theme_color: Option<String>,

    /// Last chosen theme mode (light/dark)
    #[serde(default)]
    pub theme_mode: Option<String>,
}

/// Filesystem persistence for [`PersistedSession`] and the shutdown marker
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at a directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create a store rooted at the configured state directory
    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.session.state_dir.clone())
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    fn marker_path(&self) -> PathBuf {
        self.dir.join(CLEAN_SHUTDOWN_FILE)
    }

    /// Load the persisted session
    ///
    /// A missing file is a default (logged-out) session. A corrupt file is
    /// treated the same way: the only credential here is the flag itself,
    /// so unreadable state must degrade to "ask the operator to log in".
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] only for genuine I/O trouble other than the
    /// file being absent.
    pub async fn load(&self) -> Result<PersistedSession> {
        let path = self.session_path();
        match fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(session) => Ok(session),
                Err(err) => {
                    warn!(path = %path.display(), %err, "corrupt session file; treating as logged out");
                    Ok(PersistedSession::default())
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(PersistedSession::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist the session document
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory or file cannot be written.
    pub async fn save(&self, session: &PersistedSession) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(self.session_path(), raw).await?;
        Ok(())
    }

    /// Remove the session document; flag and theme keys go together
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file exists but cannot be removed.
    pub async fn clear(&self) -> Result<()> {
        match fs::remove_file(self.session_path()).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Record that this run is closing cleanly
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the marker cannot be written.
    pub async fn write_clean_shutdown(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.marker_path(), b"clean").await?;
        Ok(())
    }

    /// Consume the clean-shutdown marker, reporting whether it was present
    pub async fn take_clean_shutdown(&self) -> bool {
        let path = self.marker_path();
        match fs::remove_file(&path).await {
            Ok(()) => true,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
            Err(err) => {
                warn!(path = %path.display(), %err, "could not consume the shutdown marker");
                false
            }
        }
    }

    /// The directory this store writes under
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Authentication state of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No valid session; only the login form is reachable
    LoggedOut,
    /// Authenticated; pages render
    LoggedIn,
}

/// Top-level authentication boundary
///
/// Owns the persisted flag, delegates credential checks to the
/// authentication collaborator, and applies the stale-session rule on
/// resume.
pub struct SessionGate {
    store: SessionStore,
    authenticator: Arc<dyn Authenticator>,
    state: SessionState,
    session: PersistedSession,
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("state", &self.state)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl SessionGate {
    /// Restore the gate from persisted state
    ///
    /// A persisted login survives only a clean shutdown: resuming without
    /// the marker forces a logout before anything renders.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the persisted state cannot be read or the
    /// forced logout cannot clear it.
    pub async fn resume(store: SessionStore, authenticator: Arc<dyn Authenticator>) -> Result<Self> {
        let session = store.load().await?;
        let clean = store.take_clean_shutdown().await;

        let state = if session.authenticated {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        };
        let mut gate = Self {
            store,
            authenticator,
            state,
            session,
        };

        if gate.session.authenticated && !clean {
            info!("previous run did not close cleanly; invalidating the session");
            gate.logout().await?;
        }

        Ok(gate)
    }

    /// Whether pages may render
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::LoggedIn
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Last persisted theme color
    #[must_use]
    pub fn theme_color(&self) -> Option<&str> {
        self.session.theme_color.as_deref()
    }

    /// Last persisted theme mode
    #[must_use]
    pub fn theme_mode(&self) -> Option<&str> {
        self.session.theme_mode.as_deref()
    }

    /// Attempt a login through the authentication collaborator
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] when either credential is empty (caught at
    ///   the form boundary, never sent).
    /// - [`Error::Authentication`] carrying the collaborator's message
    ///   verbatim on rejection, or [`LOGIN_FALLBACK_MESSAGE`] when the
    ///   collaborator could not be reached.
    /// - [`Error::Io`] if the accepted session cannot be persisted.
    pub async fn login(&mut self, identifier: &str, secret: &str) -> Result<()> {
        if identifier.is_empty() || secret.is_empty() {
            return Err(Error::Validation {
                field: "credentials".to_string(),
                message: "Please enter both userId and password".to_string(),
            });
        }

        match self.authenticator.login(identifier, secret).await {
            Ok(()) => {
                self.session.authenticated = true;
                self.state = SessionState::LoggedIn;
                self.store.save(&self.session).await?;
                info!(identifier, "login accepted");
                Ok(())
            }
            Err(ClientError::Http { status, body }) => {
                warn!(identifier, status, "login rejected");
                Err(Error::Authentication(rejection_message(&body)))
            }
            Err(err) => {
                warn!(identifier, %err, "authentication collaborator unreachable");
                Err(Error::Authentication(LOGIN_FALLBACK_MESSAGE.to_string()))
            }
        }
    }

    /// Log out and clear every persisted key
    ///
    /// The in-memory state transitions to logged-out unconditionally, before
    /// any filesystem work.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the persisted state cannot be removed.
    pub async fn logout(&mut self) -> Result<()> {
        self.state = SessionState::LoggedOut;
        self.session = PersistedSession::default();
        self.store.clear().await
    }

    /// Persist the theme choice alongside the session flag
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the state cannot be written.
    pub async fn set_theme(&mut self, color: impl Into<String>, mode: impl Into<String>) -> Result<()> {
        self.session.theme_color = Some(color.into());
        self.session.theme_mode = Some(mode.into());
        self.store.save(&self.session).await
    }

    /// Record a graceful close so the next resume honors the session
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the marker cannot be written.
    pub async fn mark_graceful_close(&self) -> Result<()> {
        self.store.write_clean_shutdown().await
    }
}

/// Extract the collaborator's error message from a rejection body
///
/// The backend answers rejections with `{"error": message}`; the message is
/// surfaced verbatim. Anything else falls back to the generic message.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(serde_json::Value::as_str)
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| LOGIN_FALLBACK_MESSAGE.to_string())
}
