//! Command dispatcher.
//!
//! Resolves a tool name against the active toolset, applies the session
//! gate, validates the argument bag against the declared schema and runs
//! the broker call on the executor. Every outcome becomes a
//! [`ToolResponse`]; nothing escapes as a protocol error.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use super::executor::BrokerCallExecutor;
use super::response::{ToolResponse, is_empty_listing, json_block};
use super::session::{ActiveSession, Session};
use crate::application::error::DispatchError;
use crate::application::ports::{BrokerConnector, BrokerPort};
use crate::domain::command::{Command, CommandDescriptor};
use crate::domain::credentials::Credentials;
use crate::domain::toolset::Toolset;

/// Routes tool invocations to the brokerage.
pub struct CommandDispatcher {
    toolset: Toolset,
    descriptors: Vec<CommandDescriptor>,
    session: Arc<Session>,
    connector: Arc<dyn BrokerConnector>,
    executor: BrokerCallExecutor,
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("toolset", &self.toolset)
            .field("session", &self.session)
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl CommandDispatcher {
    /// Create a dispatcher for `toolset`.
    #[must_use]
    pub fn new(
        toolset: Toolset,
        session: Arc<Session>,
        connector: Arc<dyn BrokerConnector>,
        executor: BrokerCallExecutor,
    ) -> Self {
        Self {
            toolset,
            descriptors: CommandDescriptor::for_toolset(toolset),
            session,
            connector,
            executor,
        }
    }

    /// Active toolset.
    #[must_use]
    pub const fn toolset(&self) -> Toolset {
        self.toolset
    }

    /// Tool descriptors, in listing order.
    #[must_use]
    pub fn descriptors(&self) -> &[CommandDescriptor] {
        &self.descriptors
    }

    /// Shared session.
    #[must_use]
    pub const fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Invoke the tool `name` with an argument bag.
    pub async fn execute(&self, name: &str, arguments: &Value) -> ToolResponse {
        let call_id = Uuid::new_v4();

        let Some(descriptor) = self.descriptors.iter().find(|d| d.name == name) else {
            tracing::warn!(%call_id, tool = name, "Unknown tool");
            return ToolResponse::failure(DispatchError::UnknownCommand(name.to_string()).to_string());
        };
        let kind = descriptor.kind;

        tracing::debug!(%call_id, tool = name, "Tool call started");

        match self.dispatch(descriptor, arguments).await {
            Ok(text) => {
                tracing::info!(%call_id, tool = name, "Tool call succeeded");
                ToolResponse::success(text)
            }
            Err(err) => {
                tracing::error!(
                    %call_id,
                    tool = name,
                    error_kind = err.kind(),
                    error = %err,
                    "Tool call failed"
                );
                ToolResponse::from_error(kind, &err)
            }
        }
    }

    async fn dispatch(
        &self,
        descriptor: &CommandDescriptor,
        arguments: &Value,
    ) -> Result<String, DispatchError> {
        // Gate before parsing: an unconfigured session never sees argument errors.
        let broker = if descriptor.kind.requires_session() {
            Some(self.require_broker()?)
        } else {
            None
        };

        let command = Command::parse(descriptor, arguments)?;

        match (command, broker) {
            (Command::Configure(credentials), _) => self.configure(credentials).await,
            (command, Some(broker)) => self.run(broker, command).await,
            (_, None) => Err(self.not_configured()),
        }
    }

    async fn configure(&self, credentials: Credentials) -> Result<String, DispatchError> {
        tracing::info!(toolset = %self.toolset, "Configuring Kite Connect session");

        let broker = match self.connector.connect(&credentials) {
            Ok(broker) => broker,
            Err(e) => {
                self.session.reset();
                return Err(DispatchError::Configuration(e));
            }
        };

        let probe = Arc::clone(&broker);
        match self
            .executor
            .run("profile", async move { probe.profile().await })
            .await
        {
            Ok(profile) => {
                let active = ActiveSession::new(broker, &profile);
                tracing::info!(
                    user_id = active.user_id(),
                    user_name = active.user_name(),
                    "Kite Connect session established"
                );
                let text = format!(
                    "Kite Connect configured successfully!\nUser: {}",
                    active.user_name()
                );
                self.session.establish(active);
                Ok(text)
            }
            Err(err) => {
                if self.session.reset() {
                    tracing::warn!("Previous Kite Connect session dropped after failed configure");
                }
                Err(match err {
                    DispatchError::Broker(e) => DispatchError::Configuration(e),
                    other => other,
                })
            }
        }
    }

    async fn run(&self, broker: Arc<dyn BrokerPort>, command: Command) -> Result<String, DispatchError> {
        match command {
            Command::Configure(credentials) => self.configure(credentials).await,
            Command::GetQuote(request) => {
                tracing::debug!(instruments = request.instruments.len(), "Fetching quotes");
                let quotes = self
                    .executor
                    .run("quote", async move { broker.quote(request.instruments).await })
                    .await?;
                Ok(json_block("Real-time Quotes", &quotes))
            }
            Command::PlaceOrder(order) => {
                tracing::warn!(
                    tradingsymbol = %order.tradingsymbol,
                    exchange = %order.exchange,
                    transaction_type = %order.transaction_type,
                    quantity = order.quantity,
                    order_type = %order.order_type,
                    variety = %order.variety,
                    "Submitting live order"
                );
                let order_id = self
                    .executor
                    .run("place_order", async move { broker.place_order(order).await })
                    .await?;
                tracing::info!(%order_id, "Order placed");
                Ok(format!("Order placed successfully!\nOrder ID: {order_id}"))
            }
            Command::ModifyOrder(order) => {
                tracing::warn!(
                    order_id = %order.order_id,
                    variety = %order.variety,
                    "Modifying live order"
                );
                let order_id = self
                    .executor
                    .run("modify_order", async move { broker.modify_order(order).await })
                    .await?;
                Ok(format!("Order modified successfully!\nOrder ID: {order_id}"))
            }
            Command::CancelOrder(order) => {
                tracing::warn!(
                    order_id = %order.order_id,
                    variety = %order.variety,
                    "Cancelling live order"
                );
                let order_id = self
                    .executor
                    .run("cancel_order", async move { broker.cancel_order(order).await })
                    .await?;
                Ok(format!("Order cancelled successfully!\nOrder ID: {order_id}"))
            }
            Command::GetHoldings => {
                let holdings = self
                    .executor
                    .run("holdings", async move { broker.holdings().await })
                    .await?;
                Ok(json_block("Current Holdings", &holdings))
            }
            Command::GetGttOrders => {
                let gtts = self
                    .executor
                    .run("gtts", async move { broker.gtts().await })
                    .await?;
                if is_empty_listing(&gtts) {
                    Ok("No active GTT orders found.".to_string())
                } else {
                    Ok(json_block("Active GTT Orders", &gtts))
                }
            }
        }
    }

    fn require_broker(&self) -> Result<Arc<dyn BrokerPort>, DispatchError> {
        self.session.broker().ok_or_else(|| self.not_configured())
    }

    const fn not_configured(&self) -> DispatchError {
        DispatchError::NotConfigured {
            configure_tool: self.toolset.configure_tool_name(),
        }
    }
}
