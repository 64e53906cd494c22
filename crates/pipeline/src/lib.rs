//! Batch queuing of workflow templates.
//!
//! Discovers templates, patches each with the user prompt and optional
//! uploaded image, and submits them one at a time to a
//! [`WorkflowQueue`](queue::WorkflowQueue).

pub mod batch;
pub mod config;
pub mod queue;
