//! Per-panel state (TEA model)

use std::sync::atomic::{AtomicU64, Ordering};

use form_tabs_core::prelude::*;
use form_tabs_core::{value_to_string, FieldDescriptor, Theme};
use serde::Serialize;

use crate::annotator::ValidationErrors;
use crate::config::PanelConfig;
use crate::selection::{SelectionController, TabSelected};
use crate::tabs::{assemble, sort_by_position, Tab, TabKind, TabMap};
use crate::visibility::{VisibilityEngine, VisibilityPolicy};

/// Unique identifier for a mounted tab panel
pub type PanelId = u64;

static PANEL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique panel ID
pub fn next_panel_id() -> PanelId {
    PANEL_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Relationship types whose fields address the related record directly
const HAS_ONE_RELATIONSHIPS: &[&str] = &["hasOne", "morphOne"];

/// What the host page knows about the resource being shown
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelContext {
    /// Id of the resource, `None` on create forms
    pub resource_id: Option<String>,
    pub theme: Theme,
}

impl PanelContext {
    pub fn for_resource(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: Some(resource_id.into()),
            ..Default::default()
        }
    }
}

/// Model of one tab panel
#[derive(Debug)]
pub struct TabPanelState {
    pub id: PanelId,
    pub config: PanelConfig,
    pub resource_id: Option<String>,
    pub theme: Theme,
    pub tabs: TabMap,
    pub visibility: VisibilityEngine,
    pub selection: SelectionController,
    /// Last validation result delivered to the panel
    pub errors: Option<ValidationErrors>,
    pub mounted: bool,
}

impl TabPanelState {
    /// Assemble the panel from its field list
    ///
    /// Fails with [`Error::InvalidInput`] if a descriptor has no tab slug or
    /// attribute.
    pub fn new(
        id: PanelId,
        config: PanelConfig,
        context: PanelContext,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self> {
        let tabs = assemble(fields)?;
        let policy = VisibilityPolicy {
            resource_exists: context.resource_id.is_some(),
            hide_dependent_tabs_on_create: config.hide_dependent_tabs_on_create,
        };
        let selection = SelectionController::new(config.group_reference());

        Ok(Self {
            id,
            config,
            resource_id: context.resource_id,
            theme: context.theme,
            tabs,
            visibility: VisibilityEngine::new(policy),
            selection,
            errors: None,
            mounted: false,
        })
    }

    pub fn group_reference(&self) -> &str {
        self.selection.group()
    }

    /// Move a stale active tab onto the first visible tab
    pub fn heal(&mut self) -> Option<TabSelected> {
        let visible = self.visibility.visible().to_vec();
        self.selection.heal(&mut self.tabs, &visible)
    }

    /// Whether `slug` is the active tab, healing a stale selection first
    ///
    /// The second element is the selection made while healing, if any; the
    /// caller broadcasts it.
    pub fn is_active(&mut self, slug: &str) -> (bool, Option<TabSelected>) {
        let healed = self.heal();
        (self.selection.is_active(&self.tabs, slug), healed)
    }

    /// Resource id a field's component should address
    pub fn resource_id_for(&self, field: &FieldDescriptor) -> Option<String> {
        let has_one = field
            .relationship_type
            .as_deref()
            .is_some_and(|r| HAS_ONE_RELATIONSHIPS.contains(&r));
        if has_one {
            return field.has_one_id.as_ref().and_then(value_to_string);
        }
        self.resource_id.clone()
    }

    /// Render model of the panel, tabs sorted by position
    pub fn view(&self) -> PanelView {
        let tabs = sort_by_position(self.tabs.iter())
            .into_iter()
            .map(|tab| self.tab_view(tab))
            .collect();

        PanelView {
            id: self.id,
            name: self.config.name.clone(),
            group: self.group_reference().to_string(),
            theme: self.theme,
            active: self.selection.active().map(str::to_string),
            visible: self.visibility.visible().to_vec(),
            tabs,
        }
    }

    fn tab_view(&self, tab: &Tab) -> TabView {
        let active = self.selection.is_active(&self.tabs, &tab.slug);
        let color = if tab.has_error {
            Some(self.config.error_color.clone())
        } else if active {
            Some(self.config.current_color.clone())
        } else {
            None
        };
        let mode = self.config.mode.as_prefix();

        TabView {
            slug: tab.slug.clone(),
            name: tab.name.clone(),
            position: tab.position,
            kind: tab.kind,
            class: tab.kind.class(),
            visible: self.visibility.is_visible(&tab.slug),
            active,
            has_error: tab.has_error,
            color,
            fields: tab
                .fields
                .iter()
                .map(|field| FieldView {
                    attribute: field.attribute.clone(),
                    component: field.component_name(mode),
                    resource_id: self.resource_id_for(field),
                })
                .collect(),
        }
    }
}

/// Snapshot handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub id: PanelId,
    pub name: String,
    pub group: String,
    pub theme: Theme,
    pub active: Option<String>,
    pub visible: Vec<String>,
    pub tabs: Vec<TabView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabView {
    pub slug: String,
    pub name: String,
    pub position: i64,
    pub kind: TabKind,
    pub class: &'static str,
    pub visible: bool,
    pub active: bool,
    pub has_error: bool,
    /// Indicator color, error color wins over the active color
    pub color: Option<String>,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub attribute: String,
    pub component: String,
    pub resource_id: Option<String>,
}
