//! Configuration file parsing for form-tabs
//!
//! Supports:
//! - `.form-tabs/config.toml` - Panel defaults and logging settings

pub mod settings;
pub mod types;

pub use settings::{config_path, init_config_dir, load_settings};
pub use types::*;
