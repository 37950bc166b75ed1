//! Settings parser for .form-tabs/config.toml

use super::types::Settings;
use form_tabs_core::prelude::*;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.toml";
const CONFIG_DIR: &str = ".form-tabs";

/// Path of the settings file below `project_path`
pub fn config_path(project_path: &Path) -> PathBuf {
    project_path.join(CONFIG_DIR).join(CONFIG_FILENAME)
}

/// Load settings from `.form-tabs/config.toml`
///
/// A missing or unreadable file yields the defaults.
pub fn load_settings(project_path: &Path) -> Settings {
    let config_path = config_path(project_path);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create a default config file in the .form-tabs/ directory
pub fn init_config_dir(project_path: &Path) -> Result<()> {
    let dir = project_path.join(CONFIG_DIR);

    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::config(format!("Failed to create .form-tabs dir: {}", e)))?;
    }

    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# form-tabs configuration

[panel]
name = "Panel"
# slug = "panel"                  # Fragment key, defaults to the name
mode = "form"                     # form | detail
retain_tab_position = false       # Keep the tab between view and edit pages
current_color = "primary"
error_color = "red"
hide_dependent_tabs_on_create = true

[log]
filter = "form_tabs=info,warn"    # Overridden by FTABS_LOG
"#;
        std::fs::write(&config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}
