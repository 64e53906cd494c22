//! Hosted inference queue client.
//!
//! Talks to fal.ai's queue API: submit a request for an application,
//! poll its status (with logs) until it completes, then fetch the result.

pub mod config;
pub mod error;
pub mod fal;
