//! Thin MCP client: JSON-RPC envelope plus a streamable-HTTP tool session.

pub mod protocol;
pub mod session;

pub use protocol::{ToolCallResult, ToolContent, ToolDescriptor};
pub use session::ToolSession;
