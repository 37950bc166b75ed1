//! # form-tabs-core - Core Domain Types
//!
//! Foundation crate for form-tabs. Provides the field descriptor input
//! types, server-side tab definitions, the URL fragment codec, error handling
//! and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, regex, url, tracing).
//!
//! ## Public API
//!
//! ### Input Types (`types`)
//! - [`FieldDescriptor`] - A field with its owning tab, position and value
//! - [`TabInfo`] - Tab-level properties, including a visibility dependency
//! - [`Theme`] - Light/dark theme broadcast by the host
//!
//! ### Tab Definitions (`definition`)
//! - [`TabDefinition`] - Builder for one tab (name, slug, dependency, classes)
//! - [`TabGroup`] - Flattens definitions into stamped field descriptors
//!
//! ### Fragment Codec (`hash`)
//! - [`LocationHashState`] - Ordered group-reference to tab-slug mapping
//! - [`hash::decode`], [`hash::encode`] - Fragment round-trip
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use form_tabs_core::prelude::*;
//! ```

pub mod definition;
pub mod error;
pub mod hash;
pub mod logging;
pub mod prelude;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use definition::{slugify, TabDefinition, TabGroup};
pub use error::{Error, Result, ResultExt};
pub use hash::LocationHashState;
pub use types::{value_to_string, FieldDescriptor, TabInfo, Theme, RELATIONSHIP_COMPONENTS};
