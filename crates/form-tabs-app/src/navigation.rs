//! Browser location and tab-position retention across navigation
//!
//! [`BrowserLocation`] stands in for the address bar: tab selections are
//! merged into its fragment. [`NavigationGuard`] carries the fragment over
//! when the user moves between the detail and edit page of one resource.

use form_tabs_core::hash::{decode_lossy, encode};
use form_tabs_core::prelude::*;
use form_tabs_core::LocationHashState;
use url::Url;

use crate::registry::{Capability, CapabilityRegistry};

/// Current page URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserLocation {
    url: Url,
}

impl BrowserLocation {
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input).map_err(|e| {
            debug!("Rejected location {:?}: {}", input, e);
            Error::navigation_target(input)
        })?;
        Ok(Self { url })
    }

    pub fn from_url(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Raw fragment without the leading `#`
    pub fn fragment(&self) -> &str {
        self.url.fragment().unwrap_or("")
    }

    /// Decoded fragment; malformed pairs are dropped, the rest kept
    pub fn hash_state(&self) -> LocationHashState {
        decode_lossy(self.fragment())
    }

    pub fn set_hash_state(&mut self, state: &LocationHashState) {
        if state.is_empty() {
            self.url.set_fragment(None);
        } else {
            self.url.set_fragment(Some(&encode(state)));
        }
    }

    /// Record `slug` as the selection of `group`, keeping every other group
    pub fn persist(&mut self, group: &str, slug: &str) {
        let mut state = self.hash_state();
        state.set(group, slug);
        self.set_hash_state(&state);
        trace!("Location fragment is now {:?}", self.fragment());
    }

    /// Resolve a possibly relative navigation target against this location
    pub fn resolve(&self, target: &str) -> Result<Url> {
        self.url.join(target).map_err(|e| {
            debug!("Cannot resolve navigation target {:?}: {}", target, e);
            Error::navigation_target(target)
        })
    }
}

/// `path` without a trailing `/edit` segment
pub fn strip_edit_suffix(path: &str) -> &str {
    path.strip_suffix("/edit").unwrap_or(path)
}

/// Whether two paths address the same resource, ignoring the edit page suffix
pub fn same_resource(a: &str, b: &str) -> bool {
    strip_edit_suffix(a) == strip_edit_suffix(b)
}

/// One-shot listeners for the before-navigate and navigate-start signals
#[derive(Debug, Default)]
pub struct NavigationGuard {
    before_armed: bool,
    start_armed: bool,
    captured: Option<LocationHashState>,
}

impl NavigationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install both listeners; each fires at most once
    pub fn arm(&mut self) {
        self.before_armed = true;
        self.start_armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.before_armed || self.start_armed
    }

    pub fn captured(&self) -> Option<&LocationHashState> {
        self.captured.as_ref()
    }

    /// Handle the before-navigate signal
    ///
    /// When `target` is the same resource as `current`, the current selection
    /// is captured and its fragment copied onto `target`. The registry flag is
    /// cleared either way so the next page can install its own listeners.
    pub fn before_navigate(
        &mut self,
        current: &BrowserLocation,
        target: &mut Url,
        registry: &mut CapabilityRegistry,
    ) {
        if !self.before_armed {
            return;
        }
        self.before_armed = false;

        if same_resource(current.path(), target.path()) {
            debug!(
                "Carrying fragment {:?} from {} to {}",
                current.fragment(),
                current.path(),
                target.path()
            );
            self.captured = Some(current.hash_state());
            target.set_fragment(current.url().fragment());
        }

        registry.clear(Capability::NavigationListener);
    }

    /// Handle the navigate-start signal: write a captured selection back once
    ///
    /// Returns `true` if the location was rewritten.
    pub fn navigate_start(&mut self, location: &mut BrowserLocation) -> bool {
        if !self.start_armed {
            return false;
        }
        self.start_armed = false;

        match self.captured.take() {
            Some(state) => {
                location.set_hash_state(&state);
                true
            }
            None => false,
        }
    }

    /// Drop listeners and any captured state
    pub fn disarm(&mut self) {
        *self = Self::default();
    }
}
