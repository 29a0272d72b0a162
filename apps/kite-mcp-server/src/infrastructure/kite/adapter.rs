//! Kite broker adapter implementing `BrokerPort`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::application::ports::{BrokerConnector, BrokerError, BrokerPort, UserProfile};
use crate::domain::credentials::Credentials;
use crate::domain::order::{CancelOrder, ModifyOrder, PlaceOrder};

use super::api_types::{KiteModifyOrderForm, KiteOrderResponse, KitePlaceOrderForm};
use super::config::KiteConfig;
use super::error::KiteError;
use super::http_client::{KiteHttpClient, build_client};

/// Kite Connect broker adapter for one set of credentials.
#[derive(Debug, Clone)]
pub struct KiteBrokerAdapter {
    client: KiteHttpClient,
}

impl KiteBrokerAdapter {
    /// Create an adapter over an authenticated client.
    #[must_use]
    pub const fn new(client: KiteHttpClient) -> Self {
        Self { client }
    }

    async fn get_value(&self, operation: &'static str, segments: &[&str]) -> Result<Value, BrokerError> {
        self.client
            .get(operation, segments, &[])
            .await
            .map_err(BrokerError::from)
    }
}

#[async_trait]
impl BrokerPort for KiteBrokerAdapter {
    async fn profile(&self) -> Result<UserProfile, BrokerError> {
        self.client
            .get("profile", &["user", "profile"], &[])
            .await
            .map_err(BrokerError::from)
    }

    async fn holdings(&self) -> Result<Value, BrokerError> {
        self.get_value("holdings", &["portfolio", "holdings"]).await
    }

    async fn positions(&self) -> Result<Value, BrokerError> {
        self.get_value("positions", &["portfolio", "positions"]).await
    }

    async fn orders(&self) -> Result<Value, BrokerError> {
        self.get_value("orders", &["orders"]).await
    }

    async fn margins(&self) -> Result<Value, BrokerError> {
        self.get_value("margins", &["user", "margins"]).await
    }

    async fn gtts(&self) -> Result<Value, BrokerError> {
        self.get_value("gtts", &["gtt", "triggers"]).await
    }

    async fn quote(&self, instruments: Vec<String>) -> Result<Value, BrokerError> {
        let query: Vec<(&str, &str)> = instruments.iter().map(|i| ("i", i.as_str())).collect();
        self.client
            .get("quote", &["quote"], &query)
            .await
            .map_err(BrokerError::from)
    }

    async fn place_order(&self, order: PlaceOrder) -> Result<String, BrokerError> {
        let form = KitePlaceOrderForm::from(&order);

        tracing::info!(
            variety = %order.variety,
            tradingsymbol = %form.tradingsymbol,
            exchange = %form.exchange,
            transaction_type = %form.transaction_type,
            order_type = %form.order_type,
            quantity = form.quantity,
            price = ?form.price,
            "Submitting order to Kite"
        );

        let response: KiteOrderResponse = self
            .client
            .post_form("place_order", &["orders", order.variety.as_str()], &form)
            .await
            .map_err(BrokerError::from)?;

        tracing::info!(order_id = %response.order_id, "Order accepted by Kite");
        Ok(response.order_id)
    }

    async fn modify_order(&self, order: ModifyOrder) -> Result<String, BrokerError> {
        let form = KiteModifyOrderForm::from(&order);

        tracing::info!(
            order_id = %order.order_id,
            variety = %order.variety,
            "Modifying order on Kite"
        );

        let response: KiteOrderResponse = self
            .client
            .put_form(
                "modify_order",
                &["orders", order.variety.as_str(), order.order_id.as_str()],
                &form,
            )
            .await
            .map_err(BrokerError::from)?;

        Ok(response.order_id)
    }

    async fn cancel_order(&self, order: CancelOrder) -> Result<String, BrokerError> {
        tracing::info!(
            order_id = %order.order_id,
            variety = %order.variety,
            "Cancelling order on Kite"
        );

        let response: KiteOrderResponse = self
            .client
            .delete("cancel_order", &["orders", order.variety.as_str(), order.order_id.as_str()])
            .await
            .map_err(BrokerError::from)?;

        Ok(response.order_id)
    }
}

/// Creates Kite adapters that share one connection pool.
#[derive(Debug, Clone)]
pub struct KiteConnector {
    client: Client,
    config: KiteConfig,
}

impl KiteConnector {
    /// Create a connector for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: KiteConfig) -> Result<Self, KiteError> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    /// Adapter configuration.
    #[must_use]
    pub const fn config(&self) -> &KiteConfig {
        &self.config
    }
}

impl BrokerConnector for KiteConnector {
    fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn BrokerPort>, BrokerError> {
        let client = KiteHttpClient::new(self.client.clone(), &self.config.base_url, credentials)?;
        Ok(Arc::new(KiteBrokerAdapter::new(client)))
    }
}
