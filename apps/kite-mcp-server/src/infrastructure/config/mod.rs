//! Configuration Module
//!
//! Settings loaded from environment variables, and the container that wires
//! them into running components.

mod container;
mod settings;

pub use container::Container;
pub use settings::{ConfigError, ExecutorSettings, ServerConfig};
