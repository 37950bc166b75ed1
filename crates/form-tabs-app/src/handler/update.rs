//! Main update function - handles panel state transitions (TEA pattern)

use form_tabs_core::prelude::*;
use form_tabs_core::LocationHashState;

use crate::annotator::annotate;
use crate::bus::{change_event_name, BusEvent, THEME_SWITCHED_EVENT};
use crate::config::PanelMode;
use crate::message::Message;
use crate::selection::TabSelected;
use crate::state::TabPanelState;

use super::{UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and the actions to perform
pub fn update(state: &mut TabPanelState, message: Message) -> UpdateResult {
    match message {
        Message::Mount { fragment } => handle_mount(state, &fragment),

        Message::Unmount => {
            debug!("Unmounting panel {} ({:?})", state.id, state.group_reference());
            state.mounted = false;
            UpdateResult::action(UpdateAction::UnsubscribeAll)
        }

        Message::TabClicked { slug } => handle_tab_clicked(state, &slug),

        Message::AttributeChanged { attribute, value } => {
            if !state.mounted {
                trace!("Panel {} not mounted; ignoring {:?}", state.id, attribute);
                return UpdateResult::none();
            }
            state
                .visibility
                .on_attribute_changed(&mut state.tabs, &attribute, &value);
            UpdateResult::none()
        }

        Message::ThemeSwitched { theme } => {
            state.theme = theme;
            UpdateResult::none()
        }

        Message::ValidationErrorsChanged { errors } => {
            if state.config.mode == PanelMode::Form {
                annotate(&mut state.tabs, errors.as_ref());
            }
            state.errors = errors;
            UpdateResult::none()
        }
    }
}

fn handle_mount(state: &mut TabPanelState, fragment: &LocationHashState) -> UpdateResult {
    let mut actions = Vec::new();

    for attribute in state.visibility.initialize(&mut state.tabs) {
        actions.push(UpdateAction::Subscribe {
            event: change_event_name(&attribute),
        });
    }
    actions.push(UpdateAction::Subscribe {
        event: THEME_SWITCHED_EVENT.to_string(),
    });

    if let Some(selected) = state
        .selection
        .resolve_initial_tab(&mut state.tabs, fragment)
    {
        actions.extend(selection_actions(selected));
    }

    if state.config.retain_tab_position {
        actions.push(UpdateAction::RegisterNavigationListener);
    }

    state.mounted = true;
    info!(
        "Mounted panel {} ({:?}) with {} tabs, visible: {:?}",
        state.id,
        state.group_reference(),
        state.tabs.len(),
        state.visibility.visible()
    );
    UpdateResult::actions(actions)
}

fn handle_tab_clicked(state: &mut TabPanelState, slug: &str) -> UpdateResult {
    if !state.visibility.is_visible(slug) {
        debug!(
            "Ignoring click on hidden or unknown tab {:?} in {:?}",
            slug,
            state.group_reference()
        );
        return UpdateResult::none();
    }

    match state.selection.select_tab(&mut state.tabs, slug, true) {
        Some(selected) => UpdateResult::actions(selection_actions(selected)),
        None => UpdateResult::none(),
    }
}

/// Broadcast a selection and, if requested, write it to the fragment
pub(crate) fn selection_actions(selected: TabSelected) -> Vec<UpdateAction> {
    let mut actions = vec![UpdateAction::Broadcast(BusEvent::TabsChanged {
        group: selected.group.clone(),
        tab: selected.slug.clone(),
    })];
    if selected.persist {
        actions.push(UpdateAction::PersistSelection {
            group: selected.group,
            slug: selected.slug,
        });
    }
    actions
}
