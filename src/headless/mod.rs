//! Headless mode - NDJSON in, NDJSON out
//!
//! `ftabs` mounts one tab panel, reads commands from an events file or stdin
//! and reports what changed on stdout.
//!
//! # Command Format
//!
//! ```json
//! {"event":"attribute_changed","attribute":"type","value":"person"}
//! {"event":"tab_clicked","slug":"company"}
//! {"event":"theme_switched","theme":"dark"}
//! {"event":"validation_errors","errors":{"vat_number":["Invalid"]}}
//! {"event":"before_navigate","url":"/resources/users/1/edit"}
//! {"event":"navigate_start"}
//! ```
//!
//! # Example Output
//!
//! ```json
//! {"event":"panel_mounted","group":"User","visible":["general","company"],"active":"general","timestamp":1704700001000}
//! {"event":"tabs_changed","group":"User","tab":"company","timestamp":1704700002000}
//! {"event":"fragment_changed","fragment":"User=company","timestamp":1704700002000}
//! ```

pub mod runner;

use chrono::Utc;
use form_tabs_app::ValidationErrors;
use form_tabs_core::Theme;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, Write};
use tracing::error;

/// Commands accepted on the input stream
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessCommand {
    AttributeChanged { attribute: String, value: Value },
    TabClicked { slug: String },
    ThemeSwitched { theme: Theme },
    ValidationErrors {
        #[serde(default)]
        errors: Option<ValidationErrors>,
    },
    BeforeNavigate { url: String },
    NavigateStart,
}

impl HeadlessCommand {
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

/// Events emitted in headless mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Panel assembled and initial tab resolved
    PanelMounted {
        group: String,
        tabs: Vec<String>,
        visible: Vec<String>,
        active: Option<String>,
        timestamp: i64,
    },

    /// `nova-tabs-changed` was broadcast
    TabsChanged {
        group: String,
        tab: String,
        timestamp: i64,
    },

    /// The visible tab set was rebuilt with a different result
    VisibilityChanged {
        visible: Vec<String>,
        timestamp: i64,
    },

    /// The active tab moved (click or healing)
    ActiveTabChanged {
        active: Option<String>,
        timestamp: i64,
    },

    /// Tabs currently carrying an error marker
    ErrorsMarked { tabs: Vec<String>, timestamp: i64 },

    /// Location fragment was rewritten
    FragmentChanged { fragment: String, timestamp: i64 },

    /// Theme of the panel switched
    ThemeChanged { theme: Theme, timestamp: i64 },

    /// Where the host should navigate
    NavigationTarget { url: String, timestamp: i64 },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        // Write to stdout with newline (NDJSON format)
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn panel_mounted(
        group: &str,
        tabs: Vec<String>,
        visible: Vec<String>,
        active: Option<String>,
    ) -> Self {
        Self::PanelMounted {
            group: group.to_string(),
            tabs,
            visible,
            active,
            timestamp: Self::now(),
        }
    }

    pub fn tabs_changed(group: &str, tab: &str) -> Self {
        Self::TabsChanged {
            group: group.to_string(),
            tab: tab.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn visibility_changed(visible: Vec<String>) -> Self {
        Self::VisibilityChanged {
            visible,
            timestamp: Self::now(),
        }
    }

    pub fn active_tab_changed(active: Option<String>) -> Self {
        Self::ActiveTabChanged {
            active,
            timestamp: Self::now(),
        }
    }

    pub fn errors_marked(tabs: Vec<String>) -> Self {
        Self::ErrorsMarked {
            tabs,
            timestamp: Self::now(),
        }
    }

    pub fn fragment_changed(fragment: &str) -> Self {
        Self::FragmentChanged {
            fragment: fragment.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn theme_changed(theme: Theme) -> Self {
        Self::ThemeChanged {
            theme,
            timestamp: Self::now(),
        }
    }

    pub fn navigation_target(url: &str) -> Self {
        Self::NavigationTarget {
            url: url.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }

    /// Event name as written in the `event` field
    pub fn name(&self) -> &'static str {
        match self {
            Self::PanelMounted { .. } => "panel_mounted",
            Self::TabsChanged { .. } => "tabs_changed",
            Self::VisibilityChanged { .. } => "visibility_changed",
            Self::ActiveTabChanged { .. } => "active_tab_changed",
            Self::ErrorsMarked { .. } => "errors_marked",
            Self::FragmentChanged { .. } => "fragment_changed",
            Self::ThemeChanged { .. } => "theme_changed",
            Self::NavigationTarget { .. } => "navigation_target",
            Self::Error { .. } => "error",
        }
    }
}
