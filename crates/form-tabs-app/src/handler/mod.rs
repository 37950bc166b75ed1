//! Handler module - TEA update function for tab panels
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch

pub(crate) mod update;

#[cfg(test)]
mod tests;

use crate::bus::BusEvent;
use crate::message::Message;

// Re-export main entry point
pub use update::update;

/// Actions the page engine performs after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Publish an event on the page bus
    Broadcast(BusEvent),

    /// Merge a selection into the location fragment
    PersistSelection { group: String, slug: String },

    /// Listen for `event` (replaces an existing subscription)
    Subscribe { event: String },

    /// Drop every subscription of the panel
    UnsubscribeAll,

    /// Install the page-wide navigation listeners unless already installed
    RegisterNavigationListener,
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Actions for the page engine, in order
    pub actions: Vec<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            actions: Vec::new(),
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self::actions(vec![action])
    }

    pub fn actions(actions: Vec<UpdateAction>) -> Self {
        Self {
            message: None,
            actions,
        }
    }
}
