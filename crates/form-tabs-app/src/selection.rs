//! Active tab selection for one tab panel
//!
//! The controller owns which tab is active. It never talks to the bus or the
//! browser location itself: every selection yields a [`TabSelected`] record
//! that the handler turns into a broadcast and, when `persist` is set, a
//! fragment write.

use form_tabs_core::prelude::*;
use form_tabs_core::LocationHashState;

use crate::tabs::TabMap;

/// Outcome of a selection, to be broadcast (and maybe persisted)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSelected {
    /// Tab-group reference of the panel
    pub group: String,
    /// Newly active tab slug
    pub slug: String,
    /// Whether the selection should be written to the URL fragment
    pub persist: bool,
}

#[derive(Debug, Clone)]
pub struct SelectionController {
    group: String,
    active: Option<String>,
}

impl SelectionController {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            active: None,
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Active slug, `None` before the first selection
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Make `slug` the active tab
    ///
    /// Returns `None` if the slug is not part of `tabs`.
    pub fn select_tab(
        &mut self,
        tabs: &mut TabMap,
        slug: &str,
        persist: bool,
    ) -> Option<TabSelected> {
        if !tabs.contains(slug) {
            warn!(
                "Ignoring selection of unknown tab {:?} in {:?}",
                slug, self.group
            );
            return None;
        }

        for tab in tabs.iter_mut() {
            tab.is_active = tab.slug == slug;
        }
        self.active = Some(slug.to_string());

        Some(TabSelected {
            group: self.group.clone(),
            slug: slug.to_string(),
            persist,
        })
    }

    /// Pick the initial tab from the decoded fragment
    ///
    /// A fragment entry naming a tab of this panel is already canonical and is
    /// not written back; otherwise the first tab is selected and persisted.
    pub fn resolve_initial_tab(
        &mut self,
        tabs: &mut TabMap,
        fragment: &LocationHashState,
    ) -> Option<TabSelected> {
        if let Some(slug) = fragment.get(&self.group).filter(|s| tabs.contains(s)) {
            let slug = slug.to_string();
            debug!("Restoring tab {:?} for {:?} from fragment", slug, self.group);
            return self.select_tab(tabs, &slug, false);
        }

        let first = tabs.first()?.slug.clone();
        self.select_tab(tabs, &first, true)
    }

    /// Reassign a stale active tab to the first visible tab
    ///
    /// Does nothing while the active tab is visible, before the first
    /// selection, or when no tab is visible. Healing is not persisted.
    pub fn heal(&mut self, tabs: &mut TabMap, visible: &[String]) -> Option<TabSelected> {
        let active = self.active.as_deref()?;
        if visible.iter().any(|s| s == active) {
            return None;
        }
        let first = visible.first()?.clone();
        debug!(
            "Active tab {:?} of {:?} is hidden; switching to {:?}",
            active, self.group, first
        );
        self.select_tab(tabs, &first, false)
    }

    /// Whether `slug` is the active tab
    ///
    /// Before any selection the first tab in insertion order counts as active.
    pub fn is_active(&self, tabs: &TabMap, slug: &str) -> bool {
        match self.active.as_deref() {
            Some(active) => active == slug,
            None => tabs.first().is_some_and(|t| t.slug == slug),
        }
    }
}
