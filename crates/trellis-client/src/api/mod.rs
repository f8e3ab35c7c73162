//! API endpoint implementations.

mod entities;
mod transforms;
mod workflows;

pub use entities::EntitiesApi;
pub use transforms::TransformsApi;
pub use workflows::WorkflowsApi;
