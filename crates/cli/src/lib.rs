//! `comfyq-cli` library crate.
//!
//! Argument definitions, output formatting and logging setup shared by the
//! `comfyq-queue` and `comfyq-fal` binaries. Exposed as a library so the
//! argument parsing can be tested without spawning processes.

pub mod args;
pub mod logging;
pub mod output;
