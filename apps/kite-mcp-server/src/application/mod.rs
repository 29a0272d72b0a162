//! Application Layer
//!
//! Dispatch of tool calls and resource reads over the broker port.

pub mod error;
pub mod ports;
pub mod services;
