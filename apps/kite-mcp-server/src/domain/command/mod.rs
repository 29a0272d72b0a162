//! Typed Commands
//!
//! A tool call arrives as a name plus a JSON argument bag. The name resolves
//! to a [`CommandKind`] for the active toolset, and the bag is checked against
//! that kind's [`CommandDescriptor`] and then deserialized into a [`Command`]
//! variant. Nothing reaches the brokerage unless both steps succeed.

mod descriptor;
mod kind;

pub use descriptor::CommandDescriptor;
pub use kind::CommandKind;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use super::credentials::Credentials;
use super::order::{CancelOrder, ModifyOrder, PlaceOrder};

/// Maximum instruments accepted by a single quote command.
pub const MAX_QUOTE_INSTRUMENTS: usize = 100;

/// Argument bag rejected at the dispatch boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// The bag is not a JSON object.
    #[error("arguments must be a JSON object")]
    NotAnObject,

    /// A required key is absent or null.
    #[error("missing argument '{0}'")]
    Missing(String),

    /// A key is not declared by the tool schema.
    #[error("unexpected argument '{0}'")]
    Unexpected(String),

    /// A value has the wrong type or violates a constraint.
    #[error("invalid argument '{field}': {reason}")]
    Invalid {
        /// Offending key.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Deserialization failed for a reason not tied to one key.
    #[error("invalid arguments: {0}")]
    Malformed(String),
}

impl ArgumentError {
    /// Build an `Invalid` error.
    #[must_use]
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Report an `Invalid` field under the key `descriptor` publishes for it.
    #[must_use]
    pub fn keyed_by(self, descriptor: &CommandDescriptor) -> Self {
        match self {
            Self::Invalid { field, reason } => Self::Invalid {
                field: descriptor.argument_key(&field).to_string(),
                reason,
            },
            other => other,
        }
    }
}

/// Quote request for a list of `EXCHANGE:TRADINGSYMBOL` instruments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteRequest {
    /// Instruments to quote.
    #[serde(alias = "symbols")]
    pub instruments: Vec<String>,
}

impl QuoteRequest {
    /// Check invariants the schema cannot express.
    pub fn validate(&self) -> Result<(), ArgumentError> {
        if self.instruments.is_empty() {
            return Err(ArgumentError::invalid(
                "instruments",
                "at least one instrument is required",
            ));
        }
        if self.instruments.len() > MAX_QUOTE_INSTRUMENTS {
            return Err(ArgumentError::invalid(
                "instruments",
                format!("at most {MAX_QUOTE_INSTRUMENTS} instruments per request"),
            ));
        }
        if self.instruments.iter().any(|i| i.trim().is_empty()) {
            return Err(ArgumentError::invalid(
                "instruments",
                "instrument identifiers must not be empty",
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigureArgs {
    api_key: String,
    access_token: String,
}

/// A fully parsed and validated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a session with these credentials.
    Configure(Credentials),
    /// Fetch quotes.
    GetQuote(QuoteRequest),
    /// Place an order.
    PlaceOrder(PlaceOrder),
    /// Modify an order.
    ModifyOrder(ModifyOrder),
    /// Cancel an order.
    CancelOrder(CancelOrder),
    /// Fetch holdings.
    GetHoldings,
    /// Fetch GTT triggers.
    GetGttOrders,
}

impl Command {
    /// Parse an argument bag against a descriptor.
    ///
    /// `Null` is treated as an empty bag, since clients may omit
    /// `arguments` for tools that take none.
    pub fn parse(descriptor: &CommandDescriptor, arguments: &Value) -> Result<Self, ArgumentError> {
        let empty = Map::new();
        let bag = match arguments {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => return Err(ArgumentError::NotAnObject),
        };

        descriptor.check_arguments(bag)?;

        let command = match descriptor.kind {
            CommandKind::Configure => {
                let args: ConfigureArgs = deserialize(bag)?;
                if args.api_key.trim().is_empty() {
                    return Err(ArgumentError::invalid("api_key", "must not be empty"));
                }
                if args.access_token.trim().is_empty() {
                    return Err(ArgumentError::invalid("access_token", "must not be empty"));
                }
                Self::Configure(Credentials::new(args.api_key, args.access_token))
            }
            CommandKind::GetQuote => {
                let request: QuoteRequest = deserialize(bag)?;
                request.validate().map_err(|e| e.keyed_by(descriptor))?;
                Self::GetQuote(request)
            }
            CommandKind::PlaceOrder => {
                let order: PlaceOrder = deserialize(bag)?;
                order.validate().map_err(|e| e.keyed_by(descriptor))?;
                Self::PlaceOrder(order)
            }
            CommandKind::ModifyOrder => {
                let order: ModifyOrder = deserialize(bag)?;
                order.validate().map_err(|e| e.keyed_by(descriptor))?;
                Self::ModifyOrder(order)
            }
            CommandKind::CancelOrder => {
                let order: CancelOrder = deserialize(bag)?;
                order.validate().map_err(|e| e.keyed_by(descriptor))?;
                Self::CancelOrder(order)
            }
            CommandKind::GetHoldings => Self::GetHoldings,
            CommandKind::GetGttOrders => Self::GetGttOrders,
        };

        Ok(command)
    }

    /// The identity of this command.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::Configure(_) => CommandKind::Configure,
            Self::GetQuote(_) => CommandKind::GetQuote,
            Self::PlaceOrder(_) => CommandKind::PlaceOrder,
            Self::ModifyOrder(_) => CommandKind::ModifyOrder,
            Self::CancelOrder(_) => CommandKind::CancelOrder,
            Self::GetHoldings => CommandKind::GetHoldings,
            Self::GetGttOrders => CommandKind::GetGttOrders,
        }
    }
}

fn deserialize<T: DeserializeOwned>(bag: &Map<String, Value>) -> Result<T, ArgumentError> {
    serde_json::from_value(Value::Object(bag.clone()))
        .map_err(|e| ArgumentError::Malformed(e.to_string()))
}
