//! Tab model and the insertion-ordered tab mapping
//!
//! - `assembler`: groups a flat field list into a [`TabMap`]
//! - `sort`: stable ordering by declared position

pub mod assembler;
pub mod sort;

use std::collections::{BTreeSet, HashMap};

use form_tabs_core::{FieldDescriptor, TabInfo};
use serde::Serialize;
use serde_json::Value;

pub use assembler::{assemble, FieldIndex, FieldLocation};
pub use sort::sort_by_position;

/// Style classification of a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TabKind {
    /// Regular field tab
    #[default]
    Fields,
    /// Tab opened by a relationship field (has-many, belongs-to-many, ...)
    Relationship,
}

impl TabKind {
    pub fn class(&self) -> &'static str {
        match self {
            TabKind::Fields => "fields-tab",
            TabKind::Relationship => "relationship-tab",
        }
    }
}

/// Tab-level properties, seeded from the first field's [`TabInfo`]
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TabProperties {
    /// Attribute controlling visibility, `None` for unconditional tabs
    pub changed_attribute: Option<String>,
    /// Values of `changed_attribute` that show this tab
    pub attribute_value: BTreeSet<String>,
    /// Current visibility flag
    pub should_show: bool,
    pub body_class: Vec<String>,
    pub tab_class: Vec<String>,
    pub title_as_html: bool,
    pub before_icon: Option<String>,
    pub after_icon: Option<String>,
}

impl TabProperties {
    /// Conditional tabs start hidden until first evaluated
    pub fn from_info(info: Option<&TabInfo>) -> Self {
        let Some(info) = info else {
            return Self {
                should_show: true,
                ..Default::default()
            };
        };

        let changed_attribute = info.dependency().map(str::to_string);
        Self {
            should_show: changed_attribute.is_none(),
            attribute_value: info.attribute_value.iter().cloned().collect(),
            changed_attribute,
            body_class: info.body_class.clone(),
            tab_class: info.tab_class.clone(),
            title_as_html: info.title_as_html,
            before_icon: info.before_icon.clone(),
            after_icon: info.after_icon.clone(),
        }
    }

}

/// A named, ordered group of fields
#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    pub slug: String,
    pub name: String,
    pub position: i64,
    pub listable: bool,
    pub fields: Vec<FieldDescriptor>,
    pub properties: TabProperties,
    pub kind: TabKind,
    /// Set by the error annotator
    pub has_error: bool,
    /// Set by the selection controller
    pub is_active: bool,
}

impl Tab {
    pub fn should_show(&self) -> bool {
        self.properties.should_show
    }
}

/// Insertion-ordered mapping of tab slug to [`Tab`]
#[derive(Debug, Clone, Default)]
pub struct TabMap {
    /// Tabs in first-appearance order
    tabs: Vec<Tab>,

    /// Slug to index in `tabs`
    by_slug: HashMap<String, usize>,

    /// Field identifier lookup built during assembly
    index: FieldIndex,
}

impl TabMap {
    pub(crate) fn from_parts(tabs: Vec<Tab>, index: FieldIndex) -> Self {
        let by_slug = tabs
            .iter()
            .enumerate()
            .map(|(i, tab)| (tab.slug.clone(), i))
            .collect();
        Self {
            tabs,
            by_slug,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.by_slug.contains_key(slug)
    }

    pub fn get(&self, slug: &str) -> Option<&Tab> {
        self.by_slug.get(slug).map(|&i| &self.tabs[i])
    }

    pub fn get_mut(&mut self, slug: &str) -> Option<&mut Tab> {
        let i = *self.by_slug.get(slug)?;
        self.tabs.get_mut(i)
    }

    /// First tab in insertion order
    pub fn first(&self) -> Option<&Tab> {
        self.tabs.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tab> {
        self.tabs.iter_mut()
    }

    /// Slugs in insertion order
    pub fn slugs(&self) -> Vec<String> {
        self.tabs.iter().map(|t| t.slug.clone()).collect()
    }

    /// Tab owning the first field with this identifier
    pub fn owning_tab(&self, attribute: &str) -> Option<&Tab> {
        let loc = self.index.locate(attribute)?;
        self.tabs.get(loc.tab)
    }

    /// Field descriptor for an identifier (first match)
    pub fn field(&self, attribute: &str) -> Option<&FieldDescriptor> {
        let loc = self.index.locate(attribute)?;
        self.tabs.get(loc.tab)?.fields.get(loc.field)
    }

    /// Current value of a field, `None` when the field is not in this map
    pub fn field_value(&self, attribute: &str) -> Option<&Value> {
        self.field(attribute).map(|f| &f.value)
    }

    /// Record a new value for a field; returns false if the field is unknown
    pub fn set_field_value(&mut self, attribute: &str, value: Value) -> bool {
        let Some(loc) = self.index.locate(attribute) else {
            return false;
        };
        match self
            .tabs
            .get_mut(loc.tab)
            .and_then(|t| t.fields.get_mut(loc.field))
        {
            Some(field) => {
                field.value = value;
                true
            }
            None => false,
        }
    }
}
