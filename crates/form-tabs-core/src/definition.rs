//! Server-side tab definitions
//!
//! A [`TabGroup`] collects [`TabDefinition`]s and flattens them into the
//! ordered [`FieldDescriptor`] list that tab assembly consumes. Every field
//! is stamped with its tab's name, slug, position and [`TabInfo`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{FieldDescriptor, TabInfo};

static NON_ALNUM_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("Invalid slug pattern regex"));

/// Turn a display name into a URL-safe slug
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single `-` and trims leading/trailing dashes.
pub fn slugify(name: &str) -> String {
    NON_ALNUM_RUN
        .replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// A single tab and the fields it owns
///
/// Deserializes from the same camelCase shape it serializes to, plus
/// `fields`, `showIf` and `showUnless`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabDefinition {
    title: String,
    #[serde(default, skip_serializing)]
    fields: Vec<FieldDescriptor>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    changed_attribute: Option<String>,
    #[serde(default)]
    attribute_value: Vec<String>,
    #[serde(default, skip_serializing)]
    show_if: Option<bool>,
    #[serde(default, skip_serializing)]
    show_unless: Option<bool>,
    #[serde(default)]
    title_as_html: bool,
    #[serde(default)]
    before_icon: Option<String>,
    #[serde(default)]
    after_icon: Option<String>,
    #[serde(default)]
    tab_class: Vec<String>,
    #[serde(default)]
    body_class: Vec<String>,
}

impl TabDefinition {
    pub fn new(title: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            title: title.into(),
            fields,
            name: None,
            changed_attribute: None,
            attribute_value: Vec::new(),
            show_if: None,
            show_unless: None,
            title_as_html: false,
            before_icon: None,
            after_icon: None,
            tab_class: Vec::new(),
            body_class: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Override the name the slug is derived from
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The explicit name, or the title
    pub fn get_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.title)
    }

    pub fn slug(&self) -> String {
        slugify(self.get_name())
    }

    pub fn show_if(mut self, condition: bool) -> Self {
        self.show_if = Some(condition);
        self
    }

    pub fn show_unless(mut self, condition: bool) -> Self {
        self.show_unless = Some(condition);
        self
    }

    /// Server-side visibility: `show_if` wins over `show_unless`
    pub fn should_show(&self) -> bool {
        if let Some(condition) = self.show_if {
            return condition;
        }
        if let Some(condition) = self.show_unless {
            return !condition;
        }
        true
    }

    pub fn title_as_html(mut self, as_html: bool) -> Self {
        self.title_as_html = as_html;
        self
    }

    pub fn before_icon(mut self, icon_html: impl Into<String>) -> Self {
        self.before_icon = Some(icon_html.into());
        self
    }

    pub fn after_icon(mut self, icon_html: impl Into<String>) -> Self {
        self.after_icon = Some(icon_html.into());
        self
    }

    /// Replace the header classes
    pub fn tab_class<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tab_class = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_tab_class(mut self, class: impl Into<String>) -> Self {
        self.tab_class.push(class.into());
        self
    }

    /// Replace the body classes
    pub fn body_class<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body_class = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_body_class(mut self, class: impl Into<String>) -> Self {
        self.body_class.push(class.into());
        self
    }

    /// Show this tab only while `attribute` holds one of `values`
    pub fn depends_on_in<I, S>(mut self, attribute: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.changed_attribute = Some(attribute.into());
        self.attribute_value = values.into_iter().map(Into::into).collect();
        self
    }

    /// Properties shipped alongside each field of this tab
    pub fn to_tab_info(&self) -> TabInfo {
        TabInfo {
            changed_attribute: self.changed_attribute.clone(),
            attribute_value: self.attribute_value.clone(),
            title: Some(self.title.clone()),
            title_as_html: self.title_as_html,
            before_icon: self.before_icon.clone(),
            after_icon: self.after_icon.clone(),
            tab_class: self.tab_class.clone(),
            body_class: self.body_class.clone(),
        }
    }
}

/// An ordered set of tabs rendered by one tab panel
#[derive(Debug, Clone, Deserialize)]
pub struct TabGroup {
    name: String,
    #[serde(default)]
    tabs: Vec<TabDefinition>,
}

impl TabGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tabs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tab(mut self, tab: TabDefinition) -> Self {
        self.tabs.push(tab);
        self
    }

    /// Flatten into field descriptors, dropping tabs that should not show
    ///
    /// Positions are the tab's index among all declared tabs, so hiding a tab
    /// server-side does not renumber its siblings.
    pub fn into_descriptors(self) -> Vec<FieldDescriptor> {
        let mut out = Vec::new();
        for (position, tab) in self.tabs.into_iter().enumerate() {
            if !tab.should_show() {
                continue;
            }
            let slug = tab.slug();
            let info = tab.to_tab_info();
            let name = tab.get_name().to_string();
            for field in tab.fields {
                let mut field = field.in_tab(name.clone(), slug.clone(), position as i64);
                field.tab_info = Some(info.clone());
                out.push(field);
            }
        }
        out
    }
}
