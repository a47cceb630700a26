use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::api::{LoginResponse, UserProfile, VerifyResponse};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No active session")]
    NoSession,

    #[error("Token rejected by verification")]
    Rejected,

    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// `now + expires_in` seconds, saturating at the latest representable instant.
fn expiry(now: DateTime<Utc>, expires_in: u64) -> DateTime<Utc> {
    i64::try_from(expires_in)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Owns the signed-in session: created on login, refreshed on verify, destroyed on logout or expiry.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: Option<Session>,
    path: Option<PathBuf>,
}

impl SessionStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads a previously saved session. A missing file simply means "signed out".
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let current = match fs::read_to_string(&path) {
            Ok(raw) => Some(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(Self { current, path: Some(path) })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn create(&mut self, login: LoginResponse, now: DateTime<Utc>) -> Result<&Session, SessionError> {
        info!(user = %login.user.email, expires_in = login.expires_in, "session created");
        self.current = Some(Session {
            token: login.token,
            user: login.user,
            issued_at: now,
            expires_at: expiry(now, login.expires_in),
        });
        self.persist()?;
        self.current.as_ref().ok_or(SessionError::NoSession)
    }

    /// Applies a verify result. An invalid token destroys the session.
    pub fn refresh(&mut self, verify: VerifyResponse, now: DateTime<Utc>) -> Result<&Session, SessionError> {
        if !verify.valid {
            warn!("token failed verification; destroying session");
            self.destroy()?;
            return Err(SessionError::Rejected);
        }
        let session = self.current.as_mut().ok_or(SessionError::NoSession)?;
        if let Some(token) = verify.token {
            session.token = token;
        }
        if let Some(expires_in) = verify.expires_in {
            session.issued_at = now;
            session.expires_at = expiry(now, expires_in);
        }
        self.persist()?;
        self.current.as_ref().ok_or(SessionError::NoSession)
    }

    pub fn destroy(&mut self) -> Result<(), SessionError> {
        if self.current.take().is_some() {
            info!("session destroyed");
        }
        if let Some(path) = &self.path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// The live session, if any. An expired session is destroyed on access.
    pub fn current(&mut self, now: DateTime<Utc>) -> Option<&Session> {
        if self.current.as_ref().is_some_and(|s| s.is_expired(now)) {
            info!("session expired");
            if let Err(e) = self.destroy() {
                warn!(error = %e, "failed to remove expired session file");
            }
        }
        self.current.as_ref()
    }

    pub fn bearer_header(&mut self, now: DateTime<Utc>) -> Option<String> {
        self.current(now).map(|s| format!("Bearer {}", s.token))
    }

    /// Any 401 from the API ends the session.
    pub fn on_unauthorized(&mut self) -> Result<(), SessionError> {
        warn!("API answered 401; clearing credentials");
        self.destroy()
    }

    fn persist(&self) -> Result<(), SessionError> {
        let (Some(path), Some(session)) = (&self.path, &self.current) else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }
}
