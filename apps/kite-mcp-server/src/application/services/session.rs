//! Connection state.
//!
//! A [`Session`] is either unconfigured or holds a broker client whose
//! credentials were proven by a profile round-trip. It is shared by the
//! dispatcher and the resource catalog and written only by configure.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::application::ports::{BrokerPort, UserProfile};

/// A validated brokerage session.
#[derive(Clone)]
pub struct ActiveSession {
    broker: Arc<dyn BrokerPort>,
    user_id: String,
    user_name: String,
    configured_at: DateTime<Utc>,
}

impl ActiveSession {
    /// Create a session for a broker whose profile fetch succeeded.
    #[must_use]
    pub fn new(broker: Arc<dyn BrokerPort>, profile: &UserProfile) -> Self {
        Self {
            broker,
            user_id: profile.user_id.clone(),
            user_name: profile.display_name().to_string(),
            configured_at: Utc::now(),
        }
    }

    /// The broker client.
    #[must_use]
    pub fn broker(&self) -> Arc<dyn BrokerPort> {
        Arc::clone(&self.broker)
    }

    /// Authenticated user ID.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Authenticated user name.
    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// When the session was established.
    #[must_use]
    pub const fn configured_at(&self) -> DateTime<Utc> {
        self.configured_at
    }
}

impl std::fmt::Debug for ActiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveSession")
            .field("user_id", &self.user_id)
            .field("user_name", &self.user_name)
            .field("configured_at", &self.configured_at)
            .finish_non_exhaustive()
    }
}

/// Process-scoped connection state.
#[derive(Debug, Default)]
pub struct Session {
    state: RwLock<Option<ActiveSession>>,
}

impl Session {
    /// Create an unconfigured session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a validated broker client is installed.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.state.read().is_some()
    }

    /// Snapshot of the active session, if any.
    #[must_use]
    pub fn active(&self) -> Option<ActiveSession> {
        self.state.read().clone()
    }

    /// The broker client of the active session, if any.
    #[must_use]
    pub fn broker(&self) -> Option<Arc<dyn BrokerPort>> {
        self.state.read().as_ref().map(ActiveSession::broker)
    }

    /// Install a validated session, replacing any previous one.
    pub fn establish(&self, session: ActiveSession) {
        *self.state.write() = Some(session);
    }

    /// Drop back to unconfigured. Returns whether a session was active.
    pub fn reset(&self) -> bool {
        self.state.write().take().is_some()
    }
}
