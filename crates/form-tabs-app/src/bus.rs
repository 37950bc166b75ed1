//! Publish/subscribe bus shared by every tab panel on a page
//!
//! Subscriptions are keyed by event name and subscriber. Subscribing twice
//! to the same name replaces the slot instead of stacking a second handler,
//! so re-initializing a panel never causes duplicate delivery.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use form_tabs_core::prelude::*;
use form_tabs_core::Theme;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::PanelId;

/// Event emitted when a panel selects a tab
pub const TABS_CHANGED_EVENT: &str = "nova-tabs-changed";

/// Event emitted by the host when the color theme switches
pub const THEME_SWITCHED_EVENT: &str = "nova-theme-switched";

/// Undrained published events kept for external listeners
pub const MAX_PUBLISHED: usize = 1024;

/// Name of the change notification for a field
pub fn change_event_name(attribute: &str) -> String {
    format!("{}-change", attribute)
}

/// Payloads carried on the bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BusEvent {
    /// A field's value changed (`<attribute>-change`)
    AttributeChanged { attribute: String, value: Value },

    /// Host theme switched (`nova-theme-switched`)
    ThemeSwitched { theme: Theme },

    /// A panel selected a tab (`nova-tabs-changed`)
    TabsChanged { group: String, tab: String },
}

impl BusEvent {
    pub fn name(&self) -> String {
        match self {
            BusEvent::AttributeChanged { attribute, .. } => change_event_name(attribute),
            BusEvent::ThemeSwitched { .. } => THEME_SWITCHED_EVENT.to_string(),
            BusEvent::TabsChanged { .. } => TABS_CHANGED_EVENT.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct EventBus {
    /// Event name to subscribed panels, one slot per panel
    slots: BTreeMap<String, BTreeSet<PanelId>>,

    /// Published events not yet drained, oldest first, capped at
    /// [`MAX_PUBLISHED`]
    published: VecDeque<BusEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `subscriber` to `event`
    ///
    /// Returns `true` when an existing slot was replaced.
    pub fn subscribe(&mut self, event: &str, subscriber: PanelId) -> bool {
        let replaced = !self
            .slots
            .entry(event.to_string())
            .or_default()
            .insert(subscriber);
        if replaced {
            trace!("Replaced {:?} subscription of panel {}", event, subscriber);
        } else {
            trace!("Panel {} subscribed to {:?}", subscriber, event);
        }
        replaced
    }

    /// Remove one subscription; returns whether it existed
    pub fn unsubscribe(&mut self, event: &str, subscriber: PanelId) -> bool {
        let Some(subscribers) = self.slots.get_mut(event) else {
            return false;
        };
        let removed = subscribers.remove(&subscriber);
        if subscribers.is_empty() {
            self.slots.remove(event);
        }
        removed
    }

    /// Remove every subscription of `subscriber`; returns how many were removed
    pub fn unsubscribe_all(&mut self, subscriber: PanelId) -> usize {
        let mut removed = 0;
        self.slots.retain(|_, subscribers| {
            if subscribers.remove(&subscriber) {
                removed += 1;
            }
            !subscribers.is_empty()
        });
        removed
    }

    /// Record `event` and return its subscribers in id order
    ///
    /// Once [`MAX_PUBLISHED`] undrained events are held, the oldest is dropped.
    pub fn publish(&mut self, event: BusEvent) -> Vec<PanelId> {
        let subscribers = self.subscribers(&event.name());
        if self.published.len() >= MAX_PUBLISHED {
            self.published.pop_front();
            trace!("Outbox full, dropped oldest published event");
        }
        self.published.push_back(event);
        subscribers
    }

    pub fn subscribers(&self, event: &str) -> Vec<PanelId> {
        self.slots
            .get(event)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_subscribed(&self, event: &str, subscriber: PanelId) -> bool {
        self.slots
            .get(event)
            .is_some_and(|s| s.contains(&subscriber))
    }

    /// Total number of subscription slots
    pub fn subscription_count(&self) -> usize {
        self.slots.values().map(BTreeSet::len).sum()
    }

    /// Take the events published since the last drain
    pub fn drain_published(&mut self) -> Vec<BusEvent> {
        self.published.drain(..).collect()
    }

    /// Number of published events waiting to be drained
    pub fn pending(&self) -> usize {
        self.published.len()
    }
}
