//! Message types for a tab panel (TEA pattern)

use form_tabs_core::{LocationHashState, Theme};
use serde_json::Value;

use crate::annotator::ValidationErrors;
use crate::bus::BusEvent;

/// Everything that can happen to a mounted tab panel
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Panel entered the page; `fragment` is the decoded location fragment
    Mount { fragment: LocationHashState },

    /// Panel left the page
    Unmount,

    // ─────────────────────────────────────────────────────────
    // User Input
    // ─────────────────────────────────────────────────────────
    /// User clicked a tab header
    TabClicked { slug: String },

    // ─────────────────────────────────────────────────────────
    // Bus Events
    // ─────────────────────────────────────────────────────────
    /// A field of the form changed its value
    AttributeChanged { attribute: String, value: Value },

    /// Host switched the color theme
    ThemeSwitched { theme: Theme },

    // ─────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────
    /// New validation result; `None` means no errors
    ValidationErrorsChanged { errors: Option<ValidationErrors> },
}

impl Message {
    /// Message delivered to a panel subscribed to `event`
    ///
    /// Tab selections are outbound only and map to no message.
    pub fn from_bus(event: &BusEvent) -> Option<Self> {
        match event {
            BusEvent::AttributeChanged { attribute, value } => Some(Message::AttributeChanged {
                attribute: attribute.clone(),
                value: value.clone(),
            }),
            BusEvent::ThemeSwitched { theme } => Some(Message::ThemeSwitched { theme: *theme }),
            BusEvent::TabsChanged { .. } => None,
        }
    }
}
