//! Application Ports (Driven)
//!
//! Ports define the interfaces the dispatch layer uses to reach the
//! brokerage. Infrastructure adapters implement them; tests substitute fakes.

mod broker_port;

pub use broker_port::{BrokerConnector, BrokerError, BrokerPort, UserProfile};

#[cfg(test)]
pub use broker_port::{MockBrokerConnector, MockBrokerPort};
