//! form-tabs-app - Tab panel state machine and page orchestration
//!
//! This crate implements the TEA (The Elm Architecture) pattern for tab
//! panels: assembly of tabs from field descriptors, conditional visibility,
//! active tab selection, validation error markers, and the `Page` engine that
//! owns the event bus, the browser location and the navigation listeners.

pub mod annotator;
pub mod bus;
pub mod config;
pub mod handler;
pub mod message;
pub mod navigation;
pub mod page;
pub mod registry;
pub mod selection;
pub mod state;
pub mod tabs;
pub mod visibility;

// Re-export primary types
pub use annotator::ValidationErrors;
pub use bus::{BusEvent, EventBus};
pub use config::{PanelConfig, PanelMode, Settings};
pub use handler::{UpdateAction, UpdateResult};
pub use message::Message;
pub use navigation::BrowserLocation;
pub use page::Page;
pub use registry::{Capability, CapabilityRegistry};
pub use state::{PanelContext, PanelId, PanelView, TabPanelState};
pub use tabs::{Tab, TabMap};
