//! Two-phase external transfers: queue now, settle later.

pub mod error;
pub mod workflow;

pub use error::WorkflowError;
pub use workflow::{ExternalWorkflow, QueueRequest};
