use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::clock::{Clock, SystemClock};
use crate::api::{ApiError, Result};

/// Session lifetime in seconds.
/// The server does not refresh tokens; a login is good for about ninety minutes.
pub const SESSION_LIFETIME_SECS: i64 = 5400;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub token: String,
    /// When the server issued the token
    pub release: DateTime<Utc>,
    /// Server-declared expiry. Recorded, never used for validity checks.
    pub expire: DateTime<Utc>,
}

impl SessionData {
    fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        now - self.release
    }
}

/// Per-account authentication state held in memory only.
pub struct Session {
    clock: Arc<dyn Clock>,
    data: Option<SessionData>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.data.is_some())
            .field("release", &self.validity_start())
            .field("expire", &self.validity_end())
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl Session {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, data: None }
    }

    /// Check if a token exists and is younger than the session lifetime.
    /// This is a local estimate, not a server round trip.
    pub fn is_valid(&self) -> bool {
        self.data
            .as_ref()
            .map(|d| d.elapsed(self.clock.now()) < Duration::seconds(SESSION_LIFETIME_SECS))
            .unwrap_or(false)
    }

    /// Get the token if the session is locally valid
    pub fn token(&self) -> Result<&str> {
        let data = self.data.as_ref().ok_or(ApiError::TokenMissing)?;
        if !self.is_valid() {
            return Err(ApiError::TokenExpired);
        }
        Ok(&data.token)
    }

    /// Replace whatever was there with a fresh login.
    pub fn record_authentication(
        &mut self,
        token: String,
        release: DateTime<Utc>,
        expire: DateTime<Utc>,
    ) {
        self.data = Some(SessionData {
            token,
            release,
            expire,
        });
    }

    pub fn validity_start(&self) -> Option<DateTime<Utc>> {
        self.data.as_ref().map(|d| d.release)
    }

    pub fn validity_end(&self) -> Option<DateTime<Utc>> {
        self.data.as_ref().map(|d| d.expire)
    }

    /// Time left before the local estimate runs out (zero when expired or absent).
    pub fn time_until_expiry(&self) -> Duration {
        self.data
            .as_ref()
            .map(|d| Duration::seconds(SESSION_LIFETIME_SECS) - d.elapsed(self.clock.now()))
            .filter(|left| *left > Duration::zero())
            .unwrap_or_else(Duration::zero)
    }
}
