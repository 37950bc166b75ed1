//! Marks tabs that own fields with validation errors

use std::collections::{BTreeMap, HashSet};

use form_tabs_core::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tabs::TabMap;

/// Validation errors keyed by field identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a message for a field
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Recompute every tab's `has_error` flag from `errors`
///
/// Markers of tabs whose errors are gone are cleared. Fields that are not in
/// this panel are skipped. Returns the marked slugs in tab order.
pub fn annotate(tabs: &mut TabMap, errors: Option<&ValidationErrors>) -> Vec<String> {
    let mut flagged: HashSet<String> = HashSet::new();

    if let Some(errors) = errors {
        for field in errors.fields() {
            match tabs.owning_tab(field) {
                Some(tab) => {
                    flagged.insert(tab.slug.clone());
                }
                None => trace!("Validation error for {:?} has no tab in this panel", field),
            }
        }
    }

    for tab in tabs.iter_mut() {
        tab.has_error = flagged.contains(&tab.slug);
    }

    let marked: Vec<String> = tabs
        .iter()
        .filter(|t| t.has_error)
        .map(|t| t.slug.clone())
        .collect();
    if !marked.is_empty() {
        debug!("Tabs with validation errors: {:?}", marked);
    }
    marked
}
