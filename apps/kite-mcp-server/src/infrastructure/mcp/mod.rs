//! Model Context Protocol surface.

pub mod protocol;
mod server;
mod stdio;

pub use protocol::{JsonRpcError, McpRequest, McpResponse, PROTOCOL_VERSION};
pub use server::{McpServer, SERVER_NAME, SERVER_VERSION};
pub use stdio::StdioTransport;
