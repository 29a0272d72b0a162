//! Broker Port (Driven Port)
//!
//! Interface for the brokerage account behind the tools and resources.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::credentials::Credentials;
use crate::domain::order::{CancelOrder, ModifyOrder, PlaceOrder};

/// Authenticated user, as returned by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Broker-assigned user ID.
    pub user_id: String,
    /// Full name.
    #[serde(default)]
    pub user_name: Option<String>,
    /// Remaining profile fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Display name, falling back to `N/A` when the broker omits it.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or("N/A")
    }
}

/// Broker port error.
///
/// Every variant keeps the brokerage's own description so callers see the
/// remote message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// Connection or transport error.
    #[error("Broker connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Credentials rejected or session expired.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Error details.
        message: String,
    },

    /// Request rejected by the broker (bad input, order rule, margin).
    #[error("Rejected: {reason}")]
    Rejected {
        /// Rejection reason.
        reason: String,
    },

    /// Order or instrument not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Error details.
        message: String,
    },

    /// Rate limited.
    #[error("Rate limited by broker: {message}")]
    RateLimited {
        /// Error details.
        message: String,
    },

    /// Unknown error.
    #[error("Broker error: {message}")]
    Unknown {
        /// Error details.
        message: String,
    },
}

/// Port for brokerage account operations.
///
/// Bulk reads return the broker's JSON unchanged; the dispatch layer only
/// pretty-prints it. Order operations return the broker-assigned order ID.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrokerPort: Send + Sync {
    /// Get the authenticated user's profile.
    async fn profile(&self) -> Result<UserProfile, BrokerError>;

    /// Get long-term holdings.
    async fn holdings(&self) -> Result<Value, BrokerError>;

    /// Get net and day positions.
    async fn positions(&self) -> Result<Value, BrokerError>;

    /// Get the day's order book.
    async fn orders(&self) -> Result<Value, BrokerError>;

    /// Get funds and margins.
    async fn margins(&self) -> Result<Value, BrokerError>;

    /// Get GTT triggers.
    async fn gtts(&self) -> Result<Value, BrokerError>;

    /// Get full quotes for `EXCHANGE:TRADINGSYMBOL` instruments.
    async fn quote(&self, instruments: Vec<String>) -> Result<Value, BrokerError>;

    /// Place an order.
    async fn place_order(&self, order: PlaceOrder) -> Result<String, BrokerError>;

    /// Modify a pending order.
    async fn modify_order(&self, order: ModifyOrder) -> Result<String, BrokerError>;

    /// Cancel a pending order.
    async fn cancel_order(&self, order: CancelOrder) -> Result<String, BrokerError>;
}

/// Builds a broker client for a set of credentials.
///
/// Connecting performs no I/O; the credentials are only proven by the
/// profile round-trip that follows.
#[cfg_attr(test, mockall::automock)]
pub trait BrokerConnector: Send + Sync {
    /// Create a broker client bound to `credentials`.
    fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn BrokerPort>, BrokerError>;
}
