//! ComfyUI REST client library.
//!
//! Wraps the two ComfyUI HTTP endpoints the batch queuer needs: image
//! upload and workflow submission.

pub mod api;
