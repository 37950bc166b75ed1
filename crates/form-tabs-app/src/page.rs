//! Page engine - owns the shared collaborators and every mounted panel
//!
//! Messages are queued and processed strictly in order: each `update` runs
//! to completion, its actions are executed, and bus events it publishes are
//! appended to the queue for every subscribed panel.

use std::collections::{HashMap, VecDeque};

use form_tabs_core::prelude::*;
use form_tabs_core::FieldDescriptor;
use url::Url;

use crate::annotator::ValidationErrors;
use crate::bus::{BusEvent, EventBus};
use crate::config::PanelConfig;
use crate::handler::{self, UpdateAction};
use crate::message::Message;
use crate::navigation::{BrowserLocation, NavigationGuard};
use crate::registry::{Capability, CapabilityRegistry};
use crate::selection::TabSelected;
use crate::state::{next_panel_id, PanelContext, PanelId, PanelView, TabPanelState};

pub struct Page {
    bus: EventBus,
    location: BrowserLocation,
    registry: CapabilityRegistry,
    navigation: NavigationGuard,

    /// Panels in mount order
    panel_order: Vec<PanelId>,
    panels: HashMap<PanelId, TabPanelState>,

    /// Pending messages, processed FIFO
    queue: VecDeque<(PanelId, Message)>,
}

impl Page {
    pub fn new(location: BrowserLocation) -> Self {
        Self {
            bus: EventBus::new(),
            location,
            registry: CapabilityRegistry::new(),
            navigation: NavigationGuard::new(),
            panel_order: Vec::new(),
            panels: HashMap::new(),
            queue: VecDeque::new(),
        }
    }

    pub fn location(&self) -> &BrowserLocation {
        &self.location
    }

    /// Replace the location after the host finished a navigation
    pub fn set_location(&mut self, location: BrowserLocation) {
        self.location = location;
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn navigation(&self) -> &NavigationGuard {
        &self.navigation
    }

    pub fn panel(&self, id: PanelId) -> Option<&TabPanelState> {
        self.panels.get(&id)
    }

    pub fn panel_ids(&self) -> &[PanelId] {
        &self.panel_order
    }

    /// Assemble and mount a panel
    pub fn mount(
        &mut self,
        config: PanelConfig,
        context: PanelContext,
        fields: Vec<FieldDescriptor>,
    ) -> Result<PanelId> {
        let id = next_panel_id();
        let state = TabPanelState::new(id, config, context, fields)?;
        self.panels.insert(id, state);
        self.panel_order.push(id);

        let fragment = self.location.hash_state();
        self.dispatch(id, Message::Mount { fragment })?;
        Ok(id)
    }

    /// Deliver `message` to one panel and run everything it triggers
    pub fn dispatch(&mut self, id: PanelId, message: Message) -> Result<()> {
        if !self.panels.contains_key(&id) {
            return Err(Error::UnknownPanel { id });
        }
        self.queue.push_back((id, message));
        self.run_queue();
        Ok(())
    }

    /// Publish a host event (field change, theme switch) to subscribed panels
    pub fn emit(&mut self, event: BusEvent) {
        self.publish(event);
        self.run_queue();
    }

    pub fn click(&mut self, id: PanelId, slug: &str) -> Result<()> {
        self.dispatch(
            id,
            Message::TabClicked {
                slug: slug.to_string(),
            },
        )
    }

    /// Deliver a validation result to every panel
    pub fn set_validation_errors(&mut self, errors: Option<ValidationErrors>) {
        for id in self.panel_order.clone() {
            self.queue.push_back((
                id,
                Message::ValidationErrorsChanged {
                    errors: errors.clone(),
                },
            ));
        }
        self.run_queue();
    }

    /// Before-navigate signal; returns the target the host should visit
    pub fn before_navigate(&mut self, target: &str) -> Result<Url> {
        let mut url = self.location.resolve(target)?;
        self.navigation
            .before_navigate(&self.location, &mut url, &mut self.registry);
        Ok(url)
    }

    /// Navigate-start signal; returns whether the fragment was restored
    pub fn navigate_start(&mut self) -> bool {
        self.navigation.navigate_start(&mut self.location)
    }

    pub fn unmount(&mut self, id: PanelId) -> Result<()> {
        self.dispatch(id, Message::Unmount)?;
        self.panels.remove(&id);
        self.panel_order.retain(|p| *p != id);
        Ok(())
    }

    /// Whether `slug` is the active tab of panel `id`, healing first
    pub fn is_active(&mut self, id: PanelId, slug: &str) -> Result<bool> {
        let panel = self
            .panels
            .get_mut(&id)
            .ok_or(Error::UnknownPanel { id })?;
        let (active, healed) = panel.is_active(slug);
        if let Some(selected) = healed {
            self.apply_selection(id, selected);
        }
        Ok(active)
    }

    /// Render model of panel `id`, healing a stale selection first
    pub fn view(&mut self, id: PanelId) -> Result<PanelView> {
        let panel = self
            .panels
            .get_mut(&id)
            .ok_or(Error::UnknownPanel { id })?;
        let healed = panel.heal();
        let view = panel.view();
        if let Some(selected) = healed {
            self.apply_selection(id, selected);
        }
        Ok(view)
    }

    /// Unmount every panel and reset page-wide state
    pub fn teardown(&mut self) {
        for id in self.panel_order.clone() {
            if let Err(e) = self.unmount(id) {
                warn!("Failed to unmount panel {}: {}", id, e);
            }
        }
        self.registry.teardown();
        self.navigation.disarm();
        debug!("Page torn down");
    }

    /// Events published on the bus since the last call
    ///
    /// Hosts should drain regularly; only the newest
    /// [`MAX_PUBLISHED`](crate::bus::MAX_PUBLISHED) undrained events are kept.
    pub fn take_broadcasts(&mut self) -> Vec<BusEvent> {
        self.bus.drain_published()
    }

    fn apply_selection(&mut self, id: PanelId, selected: TabSelected) {
        for action in handler::update::selection_actions(selected) {
            self.execute(id, action);
        }
        self.run_queue();
    }

    fn run_queue(&mut self) {
        while let Some((id, message)) = self.queue.pop_front() {
            let Some(panel) = self.panels.get_mut(&id) else {
                debug!("Dropping message for unmounted panel {}", id);
                continue;
            };

            let result = handler::update(panel, message);
            for action in result.actions {
                self.execute(id, action);
            }
            if let Some(follow_up) = result.message {
                self.queue.push_back((id, follow_up));
            }
        }
    }

    fn execute(&mut self, id: PanelId, action: UpdateAction) {
        match action {
            UpdateAction::Broadcast(event) => self.publish(event),

            UpdateAction::PersistSelection { group, slug } => {
                self.location.persist(&group, &slug);
            }

            UpdateAction::Subscribe { event } => {
                self.bus.subscribe(&event, id);
            }

            UpdateAction::UnsubscribeAll => {
                let removed = self.bus.unsubscribe_all(id);
                trace!("Removed {} subscriptions of panel {}", removed, id);
            }

            UpdateAction::RegisterNavigationListener => {
                if self.registry.try_register(Capability::NavigationListener) {
                    debug!("Panel {} installed the navigation listeners", id);
                    self.navigation.arm();
                }
            }
        }
    }

    fn publish(&mut self, event: BusEvent) {
        let message = Message::from_bus(&event);
        let subscribers = self.bus.publish(event);
        if let Some(message) = message {
            for subscriber in subscribers {
                self.queue.push_back((subscriber, message.clone()));
            }
        }
    }
}
