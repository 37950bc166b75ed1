//! Groups an ordered field list into a [`TabMap`]

use std::collections::HashMap;

use form_tabs_core::prelude::*;
use form_tabs_core::FieldDescriptor;

use super::{Tab, TabKind, TabMap, TabProperties};

/// Where a field lives inside a [`TabMap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLocation {
    /// Index of the owning tab
    pub tab: usize,
    /// Index of the field within the tab
    pub field: usize,
}

/// Field identifier to location lookup; the first descriptor for an
/// identifier wins.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    locations: HashMap<String, FieldLocation>,
}

impl FieldIndex {
    fn record(&mut self, attribute: &str, location: FieldLocation) {
        self.locations
            .entry(attribute.to_string())
            .or_insert(location);
    }

    pub fn locate(&self, attribute: &str) -> Option<FieldLocation> {
        self.locations.get(attribute).copied()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Build the tab mapping from descriptors in declared order
///
/// Tabs are ordered by the first appearance of their slug. The first
/// descriptor of a tab seeds its name, position, properties and kind;
/// every descriptor is appended to its tab's fields.
///
/// A descriptor without a tab slug or attribute fails with
/// [`Error::InvalidInput`].
pub fn assemble(fields: Vec<FieldDescriptor>) -> Result<TabMap> {
    let mut tabs: Vec<Tab> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut index = FieldIndex::default();

    for (i, field) in fields.into_iter().enumerate() {
        let slug = match field.tab_slug.as_deref() {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => {
                return Err(Error::invalid_input(
                    i,
                    format!("field {:?} has no tab slug", field.attribute),
                ))
            }
        };
        if field.attribute.is_empty() {
            return Err(Error::invalid_input(i, "field has no attribute"));
        }

        let tab_idx = *slots.entry(slug.clone()).or_insert_with(|| {
            tabs.push(Tab {
                slug: slug.clone(),
                name: field.tab.clone(),
                position: field.tab_position,
                listable: field.listable_tab,
                fields: Vec::new(),
                properties: TabProperties::from_info(field.tab_info.as_ref()),
                kind: if field.is_relationship() {
                    TabKind::Relationship
                } else {
                    TabKind::Fields
                },
                has_error: false,
                is_active: false,
            });
            tabs.len() - 1
        });

        let tab = &mut tabs[tab_idx];
        index.record(
            &field.attribute,
            FieldLocation {
                tab: tab_idx,
                field: tab.fields.len(),
            },
        );
        tab.fields.push(field);
    }

    debug!(
        "Assembled {} tabs from {} indexed fields",
        tabs.len(),
        index.len()
    );

    Ok(TabMap::from_parts(tabs, index))
}
