//! Configuration for the Trellis MCP server.
//!
//! All configuration comes from the process environment and is loaded once
//! at startup:
//!
//! | variable               | required | meaning                                  |
//! |------------------------|----------|------------------------------------------|
//! | `TRELLIS_API_KEY`      | yes      | API credential sent on every request     |
//! | `TRELLIS_WORKFLOW_ID`  | yes      | the one workflow this process may modify |
//! | `TRELLIS_PROJECT_ID`   | yes      | project used to list transforms/entities |
//! | `TRELLIS_BASE_URL`     | no       | override of the remote API base URL      |
//! | `TRELLIS_TIMEOUT_SECS` | no       | per-request timeout in seconds           |
//! | `TRELLIS_LOG_DIR`      | no       | directory for `server.log`               |
//!
//! The resulting [`TrellisConfig`] is immutable and is handed explicitly to
//! the API client and the tool adapter.

pub mod env;
pub mod error;
pub mod paths;

pub use env::{Scope, TrellisConfig};
pub use error::{ConfigError, Result};
pub use paths::{LOG_FILE_NAME, ensure_dir, log_dir};
