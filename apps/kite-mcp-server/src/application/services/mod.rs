//! Application Services
//!
//! Command dispatch, resource reads and the shared session they gate on.

mod catalog;
mod dispatcher;
mod executor;
mod response;
mod session;

pub use catalog::ResourceCatalog;
pub use dispatcher::CommandDispatcher;
pub use executor::{BrokerCallExecutor, DEFAULT_CALL_TIMEOUT, DEFAULT_MAX_CONCURRENT_CALLS};
pub use response::ToolResponse;
pub use session::{ActiveSession, Session};
