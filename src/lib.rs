//! form-tabs Library
//!
//! Headless front end for the form-tabs panel engine: NDJSON commands in,
//! NDJSON events out.

pub mod headless;

// Re-export main entry points
pub use headless::runner::{run_headless, HeadlessOptions};
