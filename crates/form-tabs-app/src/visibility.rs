//! Conditional tab visibility
//!
//! A tab with a dependency is shown only while its controlling attribute
//! holds one of the tab's allowed values. The visible set is rebuilt from the
//! tabs' flags after every evaluation, never patched.

use std::collections::BTreeSet;

use form_tabs_core::prelude::*;
use form_tabs_core::value_to_string;
use serde_json::Value;

use crate::tabs::TabMap;

/// Derived relation from a controlling attribute to a dependent tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyBinding {
    pub attribute: String,
    pub tab_slug: String,
    pub allowed_values: BTreeSet<String>,
}

/// All dependency bindings of a tab mapping, in tab order
pub fn bindings(tabs: &TabMap) -> Vec<DependencyBinding> {
    tabs.iter()
        .filter_map(|tab| {
            let attribute = tab.properties.changed_attribute.clone()?;
            Some(DependencyBinding {
                attribute,
                tab_slug: tab.slug.clone(),
                allowed_values: tab.properties.attribute_value.clone(),
            })
        })
        .collect()
}

/// Inputs to the membership test that do not come from the tab itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityPolicy {
    /// Whether the form edits an existing resource
    pub resource_exists: bool,
    /// Hide every dependent tab while no resource exists (create forms)
    pub hide_dependent_tabs_on_create: bool,
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self {
            resource_exists: false,
            hide_dependent_tabs_on_create: true,
        }
    }
}

impl VisibilityPolicy {
    /// Membership test for a dependent tab given the controlling value
    pub fn allows(&self, allowed: &BTreeSet<String>, value: Option<&Value>) -> bool {
        if !self.resource_exists && self.hide_dependent_tabs_on_create {
            return false;
        }
        match value.and_then(value_to_string) {
            Some(value) => allowed.contains(&value),
            None => false,
        }
    }
}

/// Owns the visible tab set of one panel
#[derive(Debug, Clone, Default)]
pub struct VisibilityEngine {
    policy: VisibilityPolicy,
    visible: Vec<String>,
}

impl VisibilityEngine {
    pub fn new(policy: VisibilityPolicy) -> Self {
        Self {
            policy,
            visible: Vec::new(),
        }
    }

    /// Evaluate every dependent tab against the current field values
    ///
    /// Returns the distinct controlling attributes in first-seen order; the
    /// caller subscribes to one change notification per attribute.
    pub fn initialize(&mut self, tabs: &mut TabMap) -> Vec<String> {
        let mut attributes: Vec<String> = Vec::new();

        for binding in bindings(tabs) {
            let value = tabs.field_value(&binding.attribute);
            if value.is_none() {
                debug!(
                    "Tab {:?} depends on {:?}, which is not in this form; hiding",
                    binding.tab_slug, binding.attribute
                );
            }
            let show = self.policy.allows(&binding.allowed_values, value);
            if let Some(tab) = tabs.get_mut(&binding.tab_slug) {
                tab.properties.should_show = show;
            }
            if !attributes.contains(&binding.attribute) {
                attributes.push(binding.attribute);
            }
        }

        self.rebuild(tabs);
        attributes
    }

    /// React to a new value of `attribute`
    ///
    /// Every tab bound to `attribute` is re-evaluated against `value`; other
    /// tabs keep their current flag. Returns whether the visible set changed.
    pub fn on_attribute_changed(
        &mut self,
        tabs: &mut TabMap,
        attribute: &str,
        value: &Value,
    ) -> bool {
        tabs.set_field_value(attribute, value.clone());

        let policy = self.policy;
        for tab in tabs.iter_mut() {
            if tab.properties.changed_attribute.as_deref() == Some(attribute) {
                tab.properties.should_show =
                    policy.allows(&tab.properties.attribute_value, Some(value));
            }
        }

        let before = std::mem::take(&mut self.visible);
        self.rebuild(tabs);
        let changed = before != self.visible;
        if changed {
            debug!(
                "Visible tabs after {:?} changed to {}: {:?}",
                attribute, value, self.visible
            );
        }
        changed
    }

    fn rebuild(&mut self, tabs: &TabMap) {
        self.visible = tabs
            .iter()
            .filter(|tab| tab.should_show())
            .map(|tab| tab.slug.clone())
            .collect();
    }

    /// Visible slugs in insertion order
    pub fn visible(&self) -> &[String] {
        &self.visible
    }

    pub fn is_visible(&self, slug: &str) -> bool {
        self.visible.iter().any(|s| s == slug)
    }
}
