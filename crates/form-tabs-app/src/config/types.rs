//! Configuration types for form-tabs
//!
//! Defines:
//! - `PanelConfig` - Options of one tab panel
//! - `Settings` - Contents of `.form-tabs/config.toml`

use form_tabs_core::logging::DEFAULT_FILTER;
use serde::{Deserialize, Serialize};

/// Whether the panel renders an edit form or a read-only detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelMode {
    #[default]
    Form,
    Detail,
}

impl PanelMode {
    /// Prefix used for field component names (`form-text-field`)
    pub fn as_prefix(&self) -> &'static str {
        match self {
            PanelMode::Form => "form",
            PanelMode::Detail => "detail",
        }
    }
}

impl std::fmt::Display for PanelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_prefix())
    }
}

/// Options of one tab panel
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PanelConfig {
    /// Display name, also the group reference when no slug is set
    #[serde(default = "default_name")]
    pub name: String,

    /// Explicit group reference used in the URL fragment
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub mode: PanelMode,

    /// Keep the selected tab when navigating between view and edit pages
    #[serde(default)]
    pub retain_tab_position: bool,

    /// Color of the active tab indicator
    #[serde(default = "default_current_color")]
    pub current_color: String,

    /// Color of tabs with validation errors
    #[serde(default = "default_error_color")]
    pub error_color: String,

    /// Hide tabs with a dependency while creating a new resource
    #[serde(default = "default_true")]
    pub hide_dependent_tabs_on_create: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            slug: None,
            mode: PanelMode::default(),
            retain_tab_position: false,
            current_color: default_current_color(),
            error_color: default_error_color(),
            hide_dependent_tabs_on_create: true,
        }
    }
}

impl PanelConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Key of this panel in the URL fragment
    pub fn group_reference(&self) -> &str {
        self.slug
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }
}

fn default_name() -> String {
    "Panel".to_string()
}

fn default_current_color() -> String {
    "primary".to_string()
}

fn default_error_color() -> String {
    "red".to_string()
}

fn default_true() -> bool {
    true
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogSettings {
    /// Default filter directive when `FTABS_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    DEFAULT_FILTER.to_string()
}

/// Application settings (.form-tabs/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub panel: PanelConfig,

    #[serde(default)]
    pub log: LogSettings,
}
