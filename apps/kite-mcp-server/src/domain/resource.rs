//! Readable resource endpoints.
//!
//! Each resource is a zero-argument read of one account view, addressed by a
//! `kite://` URI and returned as JSON.

use serde::Serialize;

/// MIME type of every resource payload.
pub const JSON_MIME_TYPE: &str = "application/json";

/// The closed set of readable resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `kite://profile`
    Profile,
    /// `kite://portfolio`
    Portfolio,
    /// `kite://positions`
    Positions,
    /// `kite://orders`
    Orders,
    /// `kite://funds`
    Funds,
    /// `kite://gtt-orders`
    GttOrders,
}

impl ResourceKind {
    /// Every resource kind.
    pub const ALL: [Self; 6] = [
        Self::Profile,
        Self::Portfolio,
        Self::Positions,
        Self::Orders,
        Self::Funds,
        Self::GttOrders,
    ];

    /// The resource URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Profile => "kite://profile",
            Self::Portfolio => "kite://portfolio",
            Self::Positions => "kite://positions",
            Self::Orders => "kite://orders",
            Self::Funds => "kite://funds",
            Self::GttOrders => "kite://gtt-orders",
        }
    }

    /// Resolve a URI to a resource kind.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.uri() == uri)
    }

    /// Descriptor published in `resources/list`.
    #[must_use]
    pub const fn descriptor(self) -> ResourceDescriptor {
        let (name, description) = match self {
            Self::Profile => ("User Profile", "Get user profile"),
            Self::Portfolio => ("Portfolio Holdings", "Get holdings"),
            Self::Positions => ("Trading Positions", "Get positions"),
            Self::Orders => ("Order Book", "Get order book"),
            Self::Funds => ("Account Funds", "Get funds"),
            Self::GttOrders => ("GTT Orders", "Get active GTT orders"),
        };
        ResourceDescriptor {
            uri: self.uri(),
            name,
            description,
            mime_type: JSON_MIME_TYPE,
        }
    }
}

/// Static description of a readable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// Resource URI.
    pub uri: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Payload content type.
    pub mime_type: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_round_trips() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_uri(kind.uri()), Some(kind));
        }
    }

    #[test]
    fn unknown_uri_does_not_resolve() {
        assert_eq!(ResourceKind::from_uri("kite://unknown"), None);
        assert_eq!(ResourceKind::from_uri("kite://Profile"), None);
    }

    #[test]
    fn descriptor_serializes_mime_type_in_camel_case() {
        let json = serde_json::to_value(ResourceKind::Funds.descriptor()).unwrap();
        assert_eq!(json["uri"], "kite://funds");
        assert_eq!(json["mimeType"], "application/json");
    }
}
