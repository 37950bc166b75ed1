//! URL fragment codec for persisted tab selection
//!
//! The fragment is a flat `group=slug&group=slug` list using
//! `application/x-www-form-urlencoded` escaping, one pair per tab panel on
//! the page. Entry order is kept so that rewriting one panel's pair leaves
//! the rest of the fragment untouched.

use percent_encoding::percent_decode_str;
use tracing::warn;
use url::form_urlencoded;

use crate::error::{Error, Result};

/// Insertion-ordered mapping of tab-group reference to selected tab slug
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationHashState {
    entries: Vec<(String, String)>,
}

impl LocationHashState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected slug for a tab group
    pub fn get(&self, group: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == group)
            .map(|(_, slug)| slug.as_str())
    }

    /// Set a group's slug, keeping its position if already present
    pub fn set(&mut self, group: impl Into<String>, slug: impl Into<String>) {
        let group = group.into();
        let slug = slug.into();
        match self.entries.iter_mut().find(|(key, _)| *key == group) {
            Some(entry) => entry.1 = slug,
            None => self.entries.push((group, slug)),
        }
    }

    /// Remove a group's entry
    pub fn remove(&mut self, group: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(key, _)| key == group)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocationHashState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = Self::new();
        for (k, v) in iter {
            state.set(k, v);
        }
        state
    }
}

/// Decode a URL fragment into a [`LocationHashState`]
///
/// A leading `#` is ignored and empty segments are skipped. A segment
/// without `=` decodes to an empty slug. Repeated keys keep the first
/// position and the last value.
pub fn decode(fragment: &str) -> Result<LocationHashState> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let mut state = LocationHashState::new();

    for segment in fragment.split('&').filter(|s| !s.is_empty()) {
        let (key, value) = decode_pair(segment)?;
        state.set(key, value);
    }

    Ok(state)
}

/// Decode a URL fragment, skipping pairs that fail to decode
///
/// Each skipped pair is logged with `warn!`. The remaining pairs keep their
/// order, so a later [`encode`] only loses the malformed ones.
pub fn decode_lossy(fragment: &str) -> LocationHashState {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let mut state = LocationHashState::new();

    for segment in fragment.split('&').filter(|s| !s.is_empty()) {
        match decode_pair(segment) {
            Ok((key, value)) => state.set(key, value),
            Err(e) => warn!("Skipping fragment pair: {}", e),
        }
    }

    state
}

/// Encode a [`LocationHashState`] as a fragment (without leading `#`)
pub fn encode(state: &LocationHashState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in state.iter() {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

fn decode_pair(segment: &str) -> Result<(String, String)> {
    let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
    Ok((decode_component(key)?, decode_component(value)?))
}

fn decode_component(raw: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| Error::fragment_decode(format!("{:?}: {}", raw, e)))
}
