//! Core workflow types shared by the comfyq crates.
//!
//! Holds the workflow document model, template discovery, the
//! prompt/image patching rules applied before a workflow is queued, and
//! environment configuration helpers.

pub mod config;
pub mod document;
pub mod error;
pub mod patch;
pub mod templates;
