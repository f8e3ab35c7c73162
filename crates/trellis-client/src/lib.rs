//! HTTP client for the Trellis workflow-automation API.
//!
//! Wraps the handful of REST endpoints the MCP tools need. Every request
//! carries the API key and `API-Version` header, bodies are JSON, and
//! responses are handed back as untouched [`serde_json::Value`]s.
//!
//! # Example
//!
//! ```no_run
//! use trellis_client::{Result, TrellisClient};
//! use trellis_config::Scope;
//!
//! # async fn example() -> Result<()> {
//! let client = TrellisClient::builder()
//!     .api_key("key_123")
//!     .scope(Scope::new("proj_1", "wflow_A"))
//!     .build()?;
//!
//! let transforms = client.transforms().list().await?;
//! let config = client.workflows().config().await?;
//! println!("{transforms}\n{config}");
//! # Ok(())
//! # }
//! ```
//!
//! # Failure model
//!
//! There are no retries. A non-2xx status becomes [`Error::Api`] with the
//! status and raw body; anything that prevents a response from arriving
//! becomes [`Error::Transport`].

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use client::{API_VERSION, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, TrellisClient};
pub use error::{Error, Result};
pub use types::{BlockChanges, EntitiesQuery, TransformsQuery};
