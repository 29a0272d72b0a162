//! Declared tool schemas.
//!
//! Every descriptor carries a JSON Schema for its argument bag. The same
//! schema that is published in `tools/list` is enforced on `tools/call`:
//! required keys must be present and non-null, and keys outside
//! `properties` are rejected.

use serde::Serialize;
use serde_json::{Map, Value, json};

use super::{ArgumentError, CommandKind};
use crate::domain::toolset::Toolset;

/// Static description of one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDescriptor {
    /// Command identity.
    #[serde(skip)]
    pub kind: CommandKind,
    /// Public tool name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// JSON Schema of the argument bag.
    pub input_schema: Value,
}

impl CommandDescriptor {
    /// Build the descriptor of `kind` as published by `toolset`.
    #[must_use]
    pub fn new(kind: CommandKind, toolset: Toolset) -> Self {
        let (description, input_schema) = match toolset {
            Toolset::Full => full_schema(kind),
            Toolset::Compact => compact_schema(kind),
        };
        Self {
            kind,
            name: kind.name(toolset),
            description,
            input_schema,
        }
    }

    /// Descriptors for every command of a toolset, in listing order.
    #[must_use]
    pub fn for_toolset(toolset: Toolset) -> Vec<Self> {
        toolset
            .commands()
            .iter()
            .map(|kind| Self::new(*kind, toolset))
            .collect()
    }

    /// Required argument keys, in schema order.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.input_schema
            .get("required")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    /// Whether `key` is a declared property.
    #[must_use]
    pub fn declares(&self, key: &str) -> bool {
        self.input_schema
            .get("properties")
            .and_then(Value::as_object)
            .is_some_and(|properties| properties.contains_key(key))
    }

    /// Argument key under which this tool accepts the typed field `field`.
    ///
    /// The compact toolset publishes shorter keys for some fields; errors
    /// are reported under the key the caller actually sent.
    #[must_use]
    pub fn argument_key<'a>(&self, field: &'a str) -> &'a str {
        if self.declares(field) {
            return field;
        }
        match field {
            "tradingsymbol" if self.declares("symbol") => "symbol",
            "instruments" if self.declares("symbols") => "symbols",
            _ => field,
        }
    }

    /// Check an argument bag against the declared keys.
    ///
    /// Value types are checked later, when the bag is deserialized into the
    /// typed command.
    pub fn check_arguments(&self, arguments: &Map<String, Value>) -> Result<(), ArgumentError> {
        if let Some(missing) = self
            .required()
            .find(|key| arguments.get(*key).is_none_or(Value::is_null))
        {
            return Err(ArgumentError::Missing(missing.to_string()));
        }

        if let Some(unexpected) = arguments.keys().find(|key| !self.declares(key)) {
            return Err(ArgumentError::Unexpected(unexpected.clone()));
        }

        Ok(())
    }
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

fn no_arguments() -> Value {
    object_schema(json!({}), &[])
}

fn credentials_schema() -> Value {
    object_schema(
        json!({
            "api_key": {"type": "string"},
            "access_token": {"type": "string"}
        }),
        &["api_key", "access_token"],
    )
}

fn full_schema(kind: CommandKind) -> (&'static str, Value) {
    match kind {
        CommandKind::Configure => ("Configure Kite Connect API credentials", credentials_schema()),
        CommandKind::GetQuote => (
            "Get real-time market quotes",
            object_schema(
                json!({
                    "instruments": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Instruments as EXCHANGE:TRADINGSYMBOL, e.g. NSE:INFY"
                    }
                }),
                &["instruments"],
            ),
        ),
        CommandKind::PlaceOrder => (
            "Place a new trading order",
            object_schema(
                json!({
                    "tradingsymbol": {"type": "string"},
                    "exchange": {"type": "string"},
                    "transaction_type": {"type": "string"},
                    "quantity": {"type": "integer"},
                    "product": {"type": "string"},
                    "order_type": {"type": "string"},
                    "price": {"type": "number"},
                    "trigger_price": {"type": "number"},
                    "variety": {"type": "string", "default": "regular"}
                }),
                &[
                    "tradingsymbol",
                    "exchange",
                    "transaction_type",
                    "quantity",
                    "product",
                    "order_type",
                ],
            ),
        ),
        CommandKind::ModifyOrder => (
            "Modify an existing order",
            object_schema(
                json!({
                    "order_id": {"type": "string"},
                    "variety": {"type": "string", "default": "regular"},
                    "quantity": {"type": "integer"},
                    "price": {"type": "number"},
                    "order_type": {"type": "string"},
                    "trigger_price": {"type": "number"},
                    "validity": {"type": "string"},
                    "disclosed_quantity": {"type": "integer"}
                }),
                &["order_id"],
            ),
        ),
        CommandKind::CancelOrder => (
            "Cancel an existing order",
            object_schema(
                json!({
                    "order_id": {"type": "string"},
                    "variety": {"type": "string", "default": "regular"}
                }),
                &["order_id"],
            ),
        ),
        CommandKind::GetHoldings => ("Get your current portfolio holdings", no_arguments()),
        CommandKind::GetGttOrders => (
            "Get active GTT (Good Till Triggered) orders",
            no_arguments(),
        ),
    }
}

fn compact_schema(kind: CommandKind) -> (&'static str, Value) {
    match kind {
        CommandKind::Configure => ("Set API credentials", credentials_schema()),
        CommandKind::GetQuote => (
            "Get quotes",
            object_schema(
                json!({"symbols": {"type": "array", "items": {"type": "string"}}}),
                &["symbols"],
            ),
        ),
        CommandKind::PlaceOrder => (
            "Place order",
            object_schema(
                json!({
                    "symbol": {"type": "string"},
                    "exchange": {"type": "string"},
                    "transaction_type": {"type": "string"},
                    "quantity": {"type": "integer"},
                    "product": {"type": "string"},
                    "order_type": {"type": "string"},
                    "price": {"type": "number"}
                }),
                &[
                    "symbol",
                    "exchange",
                    "transaction_type",
                    "quantity",
                    "product",
                    "order_type",
                ],
            ),
        ),
        CommandKind::GetHoldings => ("Get portfolio holdings", no_arguments()),
        CommandKind::GetGttOrders => ("Get GTT orders", no_arguments()),
        // Not published by the compact toolset; fall back to the full shape.
        CommandKind::ModifyOrder | CommandKind::CancelOrder => full_schema(kind),
    }
}
