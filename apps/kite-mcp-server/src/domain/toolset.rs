//! Published tool surfaces.
//!
//! Two surfaces exist for the same brokerage operations. `Full` is the
//! descriptive surface (`configure_kite`, `get_quote`, order management, six
//! resources). `Compact` is the terse surface (`configure`, `quote`, three
//! resources) with shorter argument keys.

use super::command::CommandKind;
use super::resource::ResourceKind;

/// Which tool surface the server publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Toolset {
    /// Full surface with order modification, cancellation and six resources.
    #[default]
    Full,
    /// Compact surface with short names and three resources.
    Compact,
}

const FULL_COMMANDS: &[CommandKind] = &[
    CommandKind::Configure,
    CommandKind::GetQuote,
    CommandKind::PlaceOrder,
    CommandKind::ModifyOrder,
    CommandKind::CancelOrder,
    CommandKind::GetHoldings,
    CommandKind::GetGttOrders,
];

const COMPACT_COMMANDS: &[CommandKind] = &[
    CommandKind::Configure,
    CommandKind::GetQuote,
    CommandKind::PlaceOrder,
    CommandKind::GetHoldings,
    CommandKind::GetGttOrders,
];

const FULL_RESOURCES: &[ResourceKind] = &[
    ResourceKind::Profile,
    ResourceKind::Portfolio,
    ResourceKind::Positions,
    ResourceKind::Orders,
    ResourceKind::Funds,
    ResourceKind::GttOrders,
];

const COMPACT_RESOURCES: &[ResourceKind] = &[
    ResourceKind::Portfolio,
    ResourceKind::Positions,
    ResourceKind::Orders,
];

impl Toolset {
    /// Parse a toolset name. Accepts `full` and `compact` in any case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "full" => Some(Self::Full),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }

    /// Get the toolset name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Compact => "compact",
        }
    }

    /// Commands published by this toolset, in listing order.
    #[must_use]
    pub const fn commands(self) -> &'static [CommandKind] {
        match self {
            Self::Full => FULL_COMMANDS,
            Self::Compact => COMPACT_COMMANDS,
        }
    }

    /// Resources published by this toolset, in listing order.
    #[must_use]
    pub const fn resources(self) -> &'static [ResourceKind] {
        match self {
            Self::Full => FULL_RESOURCES,
            Self::Compact => COMPACT_RESOURCES,
        }
    }

    /// Name of the configure tool in this toolset.
    #[must_use]
    pub const fn configure_tool_name(self) -> &'static str {
        CommandKind::Configure.name(self)
    }
}

impl std::fmt::Display for Toolset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
