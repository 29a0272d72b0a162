//! Order request value objects.
//!
//! These are the typed forms of the `place_order`, `modify_order` and
//! `cancel_order` argument bags. Exchange, product, order type and
//! transaction type are passed through as Kite constants (`NSE`, `CNC`,
//! `LIMIT`, `BUY`, ...); the brokerage validates their values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::command::ArgumentError;

/// Order variety used when the caller does not name one.
pub const DEFAULT_VARIETY: &str = "regular";

fn default_variety() -> String {
    DEFAULT_VARIETY.to_string()
}

/// Request to place a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaceOrder {
    /// Trading symbol, e.g. `INFY`.
    #[serde(alias = "symbol")]
    pub tradingsymbol: String,
    /// Exchange, e.g. `NSE`.
    pub exchange: String,
    /// `BUY` or `SELL`.
    pub transaction_type: String,
    /// Number of shares or lots.
    pub quantity: u32,
    /// Product code, e.g. `CNC`, `MIS`, `NRML`.
    pub product: String,
    /// Order type, e.g. `MARKET`, `LIMIT`, `SL`, `SL-M`.
    pub order_type: String,
    /// Limit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Trigger price for stop-loss orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
    /// Order variety (`regular`, `amo`, `co`, `iceberg`, `auction`).
    #[serde(default = "default_variety")]
    pub variety: String,
}

impl PlaceOrder {
    /// Check invariants the schema cannot express.
    pub fn validate(&self) -> Result<(), ArgumentError> {
        require_non_empty("tradingsymbol", &self.tradingsymbol)?;
        require_non_empty("exchange", &self.exchange)?;
        require_non_empty("transaction_type", &self.transaction_type)?;
        require_non_empty("product", &self.product)?;
        require_non_empty("order_type", &self.order_type)?;
        require_non_empty("variety", &self.variety)?;
        if self.quantity == 0 {
            return Err(ArgumentError::invalid("quantity", "must be greater than zero"));
        }
        require_non_negative("price", self.price)?;
        require_non_negative("trigger_price", self.trigger_price)
    }
}

/// Request to modify a pending order.
///
/// Only the fields below may be changed; anything else in the argument bag
/// is rejected before the brokerage is contacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModifyOrder {
    /// Order to modify.
    pub order_id: String,
    /// Variety the order was placed with.
    #[serde(default = "default_variety")]
    pub variety: String,
    /// New quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// New limit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// New order type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    /// New trigger price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
    /// New validity (`DAY`, `IOC`, `TTL`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity: Option<String>,
    /// New disclosed quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclosed_quantity: Option<u32>,
}

impl ModifyOrder {
    /// Check invariants the schema cannot express.
    pub fn validate(&self) -> Result<(), ArgumentError> {
        require_non_empty("order_id", &self.order_id)?;
        require_non_empty("variety", &self.variety)?;
        if self.quantity == Some(0) {
            return Err(ArgumentError::invalid("quantity", "must be greater than zero"));
        }
        require_non_negative("price", self.price)?;
        require_non_negative("trigger_price", self.trigger_price)
    }
}

/// Request to cancel a pending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CancelOrder {
    /// Order to cancel.
    pub order_id: String,
    /// Variety the order was placed with.
    #[serde(default = "default_variety")]
    pub variety: String,
}

impl CancelOrder {
    /// Check invariants the schema cannot express.
    pub fn validate(&self) -> Result<(), ArgumentError> {
        require_non_empty("order_id", &self.order_id)?;
        require_non_empty("variety", &self.variety)
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ArgumentError> {
    if value.trim().is_empty() {
        return Err(ArgumentError::invalid(field, "must not be empty"));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: Option<Decimal>) -> Result<(), ArgumentError> {
    match value {
        Some(v) if v.is_sign_negative() => Err(ArgumentError::invalid(field, "must not be negative")),
        _ => Ok(()),
    }
}
