//! Resource catalog.
//!
//! Read-only `kite://` views of the account. Each read is a live broker
//! call rendered as pretty-printed JSON.

use std::sync::Arc;

use super::executor::BrokerCallExecutor;
use super::response::pretty_json;
use super::session::Session;
use crate::application::error::DispatchError;
use crate::application::ports::BrokerError;
use crate::domain::resource::{ResourceDescriptor, ResourceKind};
use crate::domain::toolset::Toolset;

/// Lists and reads account resources.
#[derive(Debug)]
pub struct ResourceCatalog {
    toolset: Toolset,
    descriptors: Vec<ResourceDescriptor>,
    session: Arc<Session>,
    executor: BrokerCallExecutor,
}

impl ResourceCatalog {
    /// Create a catalog for `toolset`.
    #[must_use]
    pub fn new(toolset: Toolset, session: Arc<Session>, executor: BrokerCallExecutor) -> Self {
        Self {
            toolset,
            descriptors: toolset
                .resources()
                .iter()
                .map(|kind| kind.descriptor())
                .collect(),
            session,
            executor,
        }
    }

    /// Published resources. Listing does not depend on the session.
    #[must_use]
    pub fn list(&self) -> &[ResourceDescriptor] {
        &self.descriptors
    }

    /// Read a resource as JSON text.
    ///
    /// Unknown URIs are rejected before the session gate, so a typo is
    /// reported as such even when unconfigured.
    pub async fn read(&self, uri: &str) -> Result<String, DispatchError> {
        let kind = ResourceKind::from_uri(uri)
            .filter(|kind| self.toolset.resources().contains(kind))
            .ok_or_else(|| DispatchError::UnknownResource(uri.to_string()))?;

        let broker = self
            .session
            .broker()
            .ok_or(DispatchError::NotConfigured {
                configure_tool: self.toolset.configure_tool_name(),
            })?;

        let result = match kind {
            ResourceKind::Profile => {
                self.executor
                    .run("profile", async move {
                        let profile = broker.profile().await?;
                        serde_json::to_value(profile).map_err(|e| BrokerError::Unknown {
                            message: e.to_string(),
                        })
                    })
                    .await
            }
            ResourceKind::Portfolio => {
                self.executor
                    .run("holdings", async move { broker.holdings().await })
                    .await
            }
            ResourceKind::Positions => {
                self.executor
                    .run("positions", async move { broker.positions().await })
                    .await
            }
            ResourceKind::Orders => {
                self.executor
                    .run("orders", async move { broker.orders().await })
                    .await
            }
            ResourceKind::Funds => {
                self.executor
                    .run("margins", async move { broker.margins().await })
                    .await
            }
            ResourceKind::GttOrders => {
                self.executor
                    .run("gtts", async move { broker.gtts().await })
                    .await
            }
        };

        match result {
            Ok(value) => {
                tracing::debug!(uri, "Resource read");
                Ok(pretty_json(&value))
            }
            Err(err) => {
                tracing::error!(uri, error_kind = err.kind(), error = %err, "Resource read failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockBrokerPort, UserProfile};
    use crate::application::services::session::ActiveSession;
    use serde_json::{Map, json};

    fn catalog(toolset: Toolset) -> ResourceCatalog {
        ResourceCatalog::new(toolset, Arc::new(Session::new()), BrokerCallExecutor::default())
    }

    fn configured(toolset: Toolset, broker: MockBrokerPort) -> ResourceCatalog {
        let catalog = catalog(toolset);
        let profile = UserProfile {
            user_id: "AB1234".to_string(),
            user_name: Some("Asha".to_string()),
            extra: Map::new(),
        };
        catalog
            .session
            .establish(ActiveSession::new(Arc::new(broker), &profile));
        catalog
    }

    #[test]
    fn lists_without_session() {
        let uris: Vec<_> = catalog(Toolset::Full).list().iter().map(|d| d.uri).collect();
        assert_eq!(
            uris,
            vec![
                "kite://profile",
                "kite://portfolio",
                "kite://positions",
                "kite://orders",
                "kite://funds",
                "kite://gtt-orders"
            ]
        );
        assert_eq!(catalog(Toolset::Compact).list().len(), 3);
    }

    #[tokio::test]
    async fn unknown_uri_wins_over_gate() {
        let err = catalog(Toolset::Full).read("kite://nope").await.unwrap_err();
        assert_eq!(err, DispatchError::UnknownResource("kite://nope".to_string()));
    }

    #[tokio::test]
    async fn compact_hides_full_only_resources() {
        let err = catalog(Toolset::Compact).read("kite://funds").await.unwrap_err();
        assert_eq!(err.kind(), "unknown_resource");
    }

    #[tokio::test]
    async fn unconfigured_read_is_gated() {
        let err = catalog(Toolset::Full).read("kite://portfolio").await.unwrap_err();
        assert_eq!(
            err,
            DispatchError::NotConfigured {
                configure_tool: "configure_kite"
            }
        );
    }

    #[tokio::test]
    async fn reads_positions_as_pretty_json() {
        let mut broker = MockBrokerPort::new();
        broker
            .expect_positions()
            .times(1)
            .returning(|| Ok(json!({"net": [], "day": []})));
        let catalog = configured(Toolset::Full, broker);

        let text = catalog.read("kite://positions").await.unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"net": [], "day": []}));
        assert!(text.contains('\n'));
    }

    #[tokio::test]
    async fn reads_profile() {
        let mut broker = MockBrokerPort::new();
        broker.expect_profile().returning(|| {
            let mut extra = Map::new();
            extra.insert("email".to_string(), json!("asha@example.com"));
            Ok(UserProfile {
                user_id: "AB1234".to_string(),
                user_name: Some("Asha".to_string()),
                extra,
            })
        });
        let catalog = configured(Toolset::Full, broker);

        let text = catalog.read("kite://profile").await.unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["user_id"], "AB1234");
        assert_eq!(parsed["email"], "asha@example.com");
    }

    #[tokio::test]
    async fn broker_failure_propagates() {
        let mut broker = MockBrokerPort::new();
        broker.expect_margins().returning(|| {
            Err(BrokerError::AuthenticationFailed {
                message: "Token expired".to_string(),
            })
        });
        let catalog = configured(Toolset::Full, broker);

        let err = catalog.read("kite://funds").await.unwrap_err();

        assert!(err.to_string().contains("Token expired"));
    }
}
