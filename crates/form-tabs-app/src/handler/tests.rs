//! Tests for handler module

use super::*;
use crate::annotator::ValidationErrors;
use crate::bus::BusEvent;
use crate::config::{PanelConfig, PanelMode};
use crate::message::Message;
use crate::state::{PanelContext, TabPanelState};
use form_tabs_core::hash::decode;
use form_tabs_core::{FieldDescriptor, LocationHashState, TabInfo, Theme};
use serde_json::json;

/// Tabs A (always), B (type = x) and C (type = y); `type` lives in A
fn scenario_fields(type_value: &str) -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("type", "select-field")
            .in_tab("A", "a", 0)
            .with_value(type_value),
        FieldDescriptor::new("name", "text-field").in_tab("A", "a", 0),
        FieldDescriptor::new("b_field", "text-field")
            .in_tab("B", "b", 1)
            .with_tab_info(TabInfo::depends_on("type", &["x"])),
        FieldDescriptor::new("c_field", "text-field")
            .in_tab("C", "c", 2)
            .with_tab_info(TabInfo::depends_on("type", &["y"])),
    ]
}

fn panel(
    config: PanelConfig,
    context: PanelContext,
    fields: Vec<FieldDescriptor>,
) -> TabPanelState {
    TabPanelState::new(1, config, context, fields).unwrap()
}

fn mounted(fields: Vec<FieldDescriptor>) -> TabPanelState {
    let mut state = panel(
        PanelConfig::named("panel1"),
        PanelContext::for_resource("1"),
        fields,
    );
    update(
        &mut state,
        Message::Mount {
            fragment: LocationHashState::new(),
        },
    );
    state
}

fn tabs_changed(group: &str, tab: &str) -> UpdateAction {
    UpdateAction::Broadcast(BusEvent::TabsChanged {
        group: group.into(),
        tab: tab.into(),
    })
}

fn persist(group: &str, slug: &str) -> UpdateAction {
    UpdateAction::PersistSelection {
        group: group.into(),
        slug: slug.into(),
    }
}

// ─────────────────────────────────────────────────────────────────
// Mount
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_mount_subscribes_once_per_attribute() {
    let mut state = panel(
        PanelConfig::named("panel1"),
        PanelContext::for_resource("1"),
        scenario_fields("x"),
    );

    let result = update(
        &mut state,
        Message::Mount {
            fragment: LocationHashState::new(),
        },
    );

    let subscriptions: Vec<_> = result
        .actions
        .iter()
        .filter_map(|a| match a {
            UpdateAction::Subscribe { event } => Some(event.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(subscriptions, vec!["type-change", "nova-theme-switched"]);
    assert!(state.mounted);
}

#[test]
fn test_mount_without_fragment_selects_and_persists_first_tab() {
    let mut state = panel(
        PanelConfig::named("panel1"),
        PanelContext::for_resource("1"),
        scenario_fields("x"),
    );

    let result = update(
        &mut state,
        Message::Mount {
            fragment: LocationHashState::new(),
        },
    );

    assert!(result.actions.contains(&tabs_changed("panel1", "a")));
    assert!(result.actions.contains(&persist("panel1", "a")));
    assert_eq!(state.selection.active(), Some("a"));
}

#[test]
fn test_mount_restores_fragment_without_persisting() {
    let mut state = panel(
        PanelConfig::named("panel1"),
        PanelContext::for_resource("1"),
        scenario_fields("x"),
    );

    let result = update(
        &mut state,
        Message::Mount {
            fragment: decode("panel1=b&panel2=c").unwrap(),
        },
    );

    assert!(result.actions.contains(&tabs_changed("panel1", "b")));
    assert!(!result
        .actions
        .iter()
        .any(|a| matches!(a, UpdateAction::PersistSelection { .. })));
    assert_eq!(state.selection.active(), Some("b"));
}

#[test]
fn test_mount_registers_navigation_only_when_retaining_position() {
    let mut config = PanelConfig::named("panel1");
    let mut state = panel(
        config.clone(),
        PanelContext::for_resource("1"),
        scenario_fields("x"),
    );
    let result = update(
        &mut state,
        Message::Mount {
            fragment: LocationHashState::new(),
        },
    );
    assert!(!result
        .actions
        .contains(&UpdateAction::RegisterNavigationListener));

    config.retain_tab_position = true;
    let mut state = panel(config, PanelContext::for_resource("1"), scenario_fields("x"));
    let result = update(
        &mut state,
        Message::Mount {
            fragment: LocationHashState::new(),
        },
    );
    assert_eq!(
        result.actions.last(),
        Some(&UpdateAction::RegisterNavigationListener)
    );
}

#[test]
fn test_mount_on_create_form_hides_dependent_tabs() {
    let mut state = panel(
        PanelConfig::named("panel1"),
        PanelContext::default(),
        scenario_fields("x"),
    );
    update(
        &mut state,
        Message::Mount {
            fragment: LocationHashState::new(),
        },
    );
    assert_eq!(state.visibility.visible(), ["a"]);

    // Changing the value on a create form keeps them hidden
    update(
        &mut state,
        Message::AttributeChanged {
            attribute: "type".into(),
            value: json!("y"),
        },
    );
    assert_eq!(state.visibility.visible(), ["a"]);
}

#[test]
fn test_create_form_shows_dependent_tabs_when_configured() {
    let mut config = PanelConfig::named("panel1");
    config.hide_dependent_tabs_on_create = false;
    let mut state = panel(config, PanelContext::default(), scenario_fields("x"));
    update(
        &mut state,
        Message::Mount {
            fragment: LocationHashState::new(),
        },
    );
    assert_eq!(state.visibility.visible(), ["a", "b"]);
}

// ─────────────────────────────────────────────────────────────────
// Visibility and Selection
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_dependency_scenario_heals_active_tab() {
    let mut state = mounted(scenario_fields("x"));
    assert_eq!(state.visibility.visible(), ["a", "b"]);

    update(&mut state, Message::TabClicked { slug: "b".into() });
    assert_eq!(state.selection.active(), Some("b"));

    let result = update(
        &mut state,
        Message::AttributeChanged {
            attribute: "type".into(),
            value: json!("y"),
        },
    );
    assert!(result.actions.is_empty());
    assert_eq!(state.visibility.visible(), ["a", "c"]);

    let (active, healed) = state.is_active("b");
    assert!(!active);
    let healed = healed.unwrap();
    assert_eq!(healed.slug, "a");
    assert!(!healed.persist);

    let (active, healed) = state.is_active("a");
    assert!(active);
    assert!(healed.is_none());
}

#[test]
fn test_tabs_on_other_attributes_keep_their_flag() {
    let mut fields = scenario_fields("x");
    fields.push(
        FieldDescriptor::new("status", "select-field")
            .in_tab("A", "a", 0)
            .with_value("draft"),
    );
    fields.push(
        FieldDescriptor::new("d_field", "text-field")
            .in_tab("D", "d", 3)
            .with_tab_info(TabInfo::depends_on("status", &["published"])),
    );
    let mut state = mounted(fields);
    assert_eq!(state.visibility.visible(), ["a", "b"]);

    update(
        &mut state,
        Message::AttributeChanged {
            attribute: "status".into(),
            value: json!("published"),
        },
    );
    assert_eq!(state.visibility.visible(), ["a", "b", "d"]);

    update(
        &mut state,
        Message::AttributeChanged {
            attribute: "type".into(),
            value: json!("y"),
        },
    );
    assert_eq!(state.visibility.visible(), ["a", "c", "d"]);
}

#[test]
fn test_click_persists_selection() {
    let mut state = mounted(scenario_fields("x"));

    let result = update(&mut state, Message::TabClicked { slug: "b".into() });

    assert_eq!(
        result.actions,
        vec![tabs_changed("panel1", "b"), persist("panel1", "b")]
    );
    assert!(state.tabs.get("b").unwrap().is_active);
    assert!(!state.tabs.get("a").unwrap().is_active);
}

#[test]
fn test_click_on_hidden_tab_is_ignored() {
    let mut state = mounted(scenario_fields("x"));

    let result = update(&mut state, Message::TabClicked { slug: "c".into() });

    assert!(result.actions.is_empty());
    assert_eq!(state.selection.active(), Some("a"));
}

#[test]
fn test_click_on_unknown_tab_is_ignored() {
    let mut state = mounted(scenario_fields("x"));
    let result = update(&mut state, Message::TabClicked { slug: "zzz".into() });
    assert!(result.actions.is_empty());
}

#[test]
fn test_attribute_change_before_mount_is_ignored() {
    let mut state = panel(
        PanelConfig::named("panel1"),
        PanelContext::for_resource("1"),
        scenario_fields("x"),
    );
    update(
        &mut state,
        Message::AttributeChanged {
            attribute: "type".into(),
            value: json!("y"),
        },
    );
    assert!(state.visibility.visible().is_empty());
    assert_eq!(state.tabs.field_value("type"), Some(&json!("x")));
}

// ─────────────────────────────────────────────────────────────────
// Theme, Errors and Unmount
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_theme_switch_updates_state() {
    let mut state = mounted(scenario_fields("x"));
    update(&mut state, Message::ThemeSwitched { theme: Theme::Dark });
    assert_eq!(state.theme, Theme::Dark);
}

#[test]
fn test_validation_errors_mark_owning_tab_in_form_mode() {
    let mut state = mounted(scenario_fields("x"));

    update(
        &mut state,
        Message::ValidationErrorsChanged {
            errors: Some(ValidationErrors::new().with("b_field", "required")),
        },
    );

    assert!(state.tabs.get("b").unwrap().has_error);
    assert!(!state.tabs.get("a").unwrap().has_error);
    assert!(!state.tabs.get("c").unwrap().has_error);

    update(
        &mut state,
        Message::ValidationErrorsChanged { errors: None },
    );
    assert!(!state.tabs.get("b").unwrap().has_error);
    assert!(state.errors.is_none());
}

#[test]
fn test_validation_errors_ignored_in_detail_mode() {
    let mut config = PanelConfig::named("panel1");
    config.mode = PanelMode::Detail;
    let mut state = panel(config, PanelContext::for_resource("1"), scenario_fields("x"));

    update(
        &mut state,
        Message::ValidationErrorsChanged {
            errors: Some(ValidationErrors::new().with("b_field", "required")),
        },
    );

    assert!(state.tabs.iter().all(|t| !t.has_error));
}

#[test]
fn test_unmount_drops_subscriptions() {
    let mut state = mounted(scenario_fields("x"));
    let result = update(&mut state, Message::Unmount);
    assert_eq!(result.actions, vec![UpdateAction::UnsubscribeAll]);
    assert!(!state.mounted);
}
