//! MCP (Model Context Protocol) server for Trellis.
//!
//! Speaks JSON-RPC 2.0 over a byte stream (stdio in production) and
//! exposes a [`trellis_tools::ToolRegistry`] to the host:
//!
//! - `initialize` negotiates the protocol version
//! - `tools/list` advertises every registered tool
//! - `tools/call` runs one tool and returns its JSON, or a structured
//!   error result the model can read
//!
//! ```rust,ignore
//! let server = McpServer::new(trellis_tools::trellis_registry(&client));
//! server.serve(tokio::io::stdin(), tokio::io::stdout()).await?;
//! ```

pub mod error;
pub mod protocol;
pub mod server;
pub mod transport;

pub use error::{McpError, Result};
pub use protocol::{
    CallToolResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, LATEST_PROTOCOL_VERSION,
    RequestId, SUPPORTED_PROTOCOL_VERSIONS, ServerInfo, ToolContent, ToolInfo,
};
pub use server::{McpServer, SERVER_NAME};
pub use transport::{Frame, Framing, MessageReader, write_message};
