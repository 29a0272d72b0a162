//! Command identities.

use crate::domain::toolset::Toolset;

/// The closed set of supported commands.
///
/// Public tool names differ between toolsets; the variant is the identity
/// the rest of the server matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Set credentials and validate them with a profile round-trip.
    Configure,
    /// Fetch live quotes for a list of instruments.
    GetQuote,
    /// Place a new order.
    PlaceOrder,
    /// Modify a pending order.
    ModifyOrder,
    /// Cancel a pending order.
    CancelOrder,
    /// Fetch portfolio holdings.
    GetHoldings,
    /// Fetch active GTT triggers.
    GetGttOrders,
}

impl CommandKind {
    /// Public tool name in the given toolset.
    #[must_use]
    pub const fn name(self, toolset: Toolset) -> &'static str {
        match (self, toolset) {
            (Self::Configure, Toolset::Full) => "configure_kite",
            (Self::Configure, Toolset::Compact) => "configure",
            (Self::GetQuote, Toolset::Full) => "get_quote",
            (Self::GetQuote, Toolset::Compact) => "quote",
            (Self::PlaceOrder, _) => "place_order",
            (Self::ModifyOrder, _) => "modify_order",
            (Self::CancelOrder, _) => "cancel_order",
            (Self::GetHoldings, _) => "get_holdings",
            (Self::GetGttOrders, _) => "get_gtt_orders",
        }
    }

    /// Resolve a public tool name among the commands of a toolset.
    #[must_use]
    pub fn resolve(toolset: Toolset, name: &str) -> Option<Self> {
        toolset
            .commands()
            .iter()
            .copied()
            .find(|kind| kind.name(toolset) == name)
    }

    /// Whether the command needs a configured session.
    #[must_use]
    pub const fn requires_session(self) -> bool {
        !matches!(self, Self::Configure)
    }

    /// Whether the command changes state on the brokerage account.
    #[must_use]
    pub const fn is_trading(self) -> bool {
        matches!(
            self,
            Self::PlaceOrder | Self::ModifyOrder | Self::CancelOrder
        )
    }

    /// Phrase used in failure messages ("Error placing order: ...").
    #[must_use]
    pub const fn failure_context(self) -> &'static str {
        match self {
            Self::Configure => "configuring Kite",
            Self::GetQuote => "getting quotes",
            Self::PlaceOrder => "placing order",
            Self::ModifyOrder => "modifying order",
            Self::CancelOrder => "cancelling order",
            Self::GetHoldings => "getting holdings",
            Self::GetGttOrders => "retrieving GTT orders",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Toolset::Full, "configure_kite", Some(CommandKind::Configure))]
    #[test_case(Toolset::Full, "get_quote", Some(CommandKind::GetQuote))]
    #[test_case(Toolset::Full, "quote", None)]
    #[test_case(Toolset::Full, "cancel_order", Some(CommandKind::CancelOrder))]
    #[test_case(Toolset::Compact, "configure", Some(CommandKind::Configure))]
    #[test_case(Toolset::Compact, "quote", Some(CommandKind::GetQuote))]
    #[test_case(Toolset::Compact, "modify_order", None)]
    #[test_case(Toolset::Compact, "cancel_order", None)]
    #[test_case(Toolset::Full, "drop_tables", None)]
    fn resolve_by_toolset(toolset: Toolset, name: &str, expected: Option<CommandKind>) {
        assert_eq!(CommandKind::resolve(toolset, name), expected);
    }

    #[test]
    fn only_configure_skips_session_gate() {
        for kind in Toolset::Full.commands() {
            assert_eq!(kind.requires_session(), *kind != CommandKind::Configure);
        }
    }
}
