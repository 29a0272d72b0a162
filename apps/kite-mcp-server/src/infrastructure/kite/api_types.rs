//! Kite Connect request and response types.
//!
//! These types map directly to the Kite REST wire format.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order::{ModifyOrder, PlaceOrder};

/// Validity sent with new orders.
const DEFAULT_VALIDITY: &str = "DAY";

// ============================================================================
// Envelope
// ============================================================================

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct KiteEnvelope<T> {
    /// `success` or `error`.
    pub status: String,
    /// Payload on success.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Error message.
    #[serde(default)]
    pub message: Option<String>,
    /// Kite exception class.
    #[serde(default)]
    pub error_type: Option<String>,
}

impl<T> KiteEnvelope<T> {
    /// Whether the envelope reports success.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Error body, decoded without knowing the payload type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KiteErrorBody {
    /// Error message.
    #[serde(default)]
    pub message: Option<String>,
    /// Kite exception class.
    #[serde(default)]
    pub error_type: Option<String>,
}

// ============================================================================
// Order Types
// ============================================================================

/// Payload of place, modify and cancel responses.
#[derive(Debug, Clone, Deserialize)]
pub struct KiteOrderResponse {
    /// Broker order ID.
    pub order_id: String,
}

/// Form body for `POST /orders/{variety}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KitePlaceOrderForm {
    pub tradingsymbol: String,
    pub exchange: String,
    pub transaction_type: String,
    pub order_type: String,
    pub quantity: u32,
    pub product: String,
    pub validity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
}

impl From<&PlaceOrder> for KitePlaceOrderForm {
    fn from(order: &PlaceOrder) -> Self {
        Self {
            tradingsymbol: order.tradingsymbol.clone(),
            exchange: order.exchange.clone(),
            transaction_type: order.transaction_type.clone(),
            order_type: order.order_type.clone(),
            quantity: order.quantity,
            product: order.product.clone(),
            validity: DEFAULT_VALIDITY.to_string(),
            price: order.price,
            trigger_price: order.trigger_price,
        }
    }
}

/// Form body for `PUT /orders/{variety}/{order_id}`.
///
/// Only the fields being changed are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KiteModifyOrderForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclosed_quantity: Option<u32>,
}

impl From<&ModifyOrder> for KiteModifyOrderForm {
    fn from(order: &ModifyOrder) -> Self {
        Self {
            quantity: order.quantity,
            price: order.price,
            order_type: order.order_type.clone(),
            trigger_price: order.trigger_price,
            validity: order.validity.clone(),
            disclosed_quantity: order.disclosed_quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn success_envelope() {
        let envelope: KiteEnvelope<KiteOrderResponse> =
            serde_json::from_str(r#"{"status":"success","data":{"order_id":"151220000000000"}}"#)
                .unwrap();
        assert!(envelope.is_success());
        assert_eq!(envelope.data.unwrap().order_id, "151220000000000");
    }

    #[test]
    fn error_envelope() {
        let envelope: KiteEnvelope<Value> = serde_json::from_str(
            r#"{"status":"error","message":"Invalid `api_key` or `access_token`.","error_type":"TokenException","data":null}"#,
        )
        .unwrap();
        assert!(!envelope.is_success());
        assert!(envelope.data.is_none());
        assert_eq!(envelope.error_type.as_deref(), Some("TokenException"));
    }

    #[test]
    fn place_form_skips_absent_prices() {
        let order = PlaceOrder {
            tradingsymbol: "INFY".to_string(),
            exchange: "NSE".to_string(),
            transaction_type: "BUY".to_string(),
            quantity: 5,
            product: "CNC".to_string(),
            order_type: "MARKET".to_string(),
            price: None,
            trigger_price: None,
            variety: "regular".to_string(),
        };

        let form = KitePlaceOrderForm::from(&order);
        let value = serde_json::to_value(&form).unwrap();

        assert_eq!(value["validity"], "DAY");
        assert_eq!(value["quantity"], 5);
        assert!(value.get("price").is_none());
        assert!(value.get("variety").is_none());
    }

    #[test]
    fn modify_form_sends_only_changes() {
        let order = ModifyOrder {
            order_id: "1".to_string(),
            variety: "regular".to_string(),
            quantity: None,
            price: Some(Decimal::new(1510, 0)),
            order_type: None,
            trigger_price: None,
            validity: None,
            disclosed_quantity: None,
        };

        let value = serde_json::to_value(KiteModifyOrderForm::from(&order)).unwrap();

        assert_eq!(value.as_object().unwrap().len(), 1);
        assert!(value.get("price").is_some());
    }
}
