//! Field descriptor types supplied by the field collaborator
//!
//! These are the read-only inputs to tab assembly. They deserialize from the
//! camelCase JSON the server side emits for each field of a tabbed panel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Component tags whose tab is rendered as a relationship tab
pub const RELATIONSHIP_COMPONENTS: &[&str] = &[
    "belongs-to-many-field",
    "has-many-field",
    "has-many-through-field",
    "has-one-through-field",
    "morph-to-many-field",
];

/// A single field as delivered by the field collaborator
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Field identifier (form input name)
    #[serde(default)]
    pub attribute: String,

    /// Display name of the owning tab
    #[serde(default)]
    pub tab: String,

    /// Slug of the owning tab. `None` is a precondition violation.
    #[serde(default)]
    pub tab_slug: Option<String>,

    /// Declared position of the owning tab
    #[serde(default)]
    pub tab_position: i64,

    /// Rendering component tag, e.g. `text-field` or `has-many-field`
    #[serde(default)]
    pub component: String,

    /// Tab-level properties; carries the visibility dependency if any
    #[serde(default)]
    pub tab_info: Option<TabInfo>,

    /// Relationship kind (`hasOne`, `morphOne`, ...), styling and id routing only
    #[serde(default)]
    pub relationship_type: Option<String>,

    /// Related record id for `hasOne` / `morphOne` fields
    #[serde(default)]
    pub has_one_id: Option<Value>,

    /// Current field value
    #[serde(default)]
    pub value: Value,

    /// Whether the owning tab is listable
    #[serde(default)]
    pub listable_tab: bool,

    /// Whether the rendering component name gets the panel mode as prefix
    #[serde(default)]
    pub prefix_component: bool,
}

impl FieldDescriptor {
    /// Create a minimal descriptor, mostly useful for builders and tests
    pub fn new(attribute: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            component: component.into(),
            ..Default::default()
        }
    }

    /// Builder: place this field into a tab
    pub fn in_tab(
        mut self,
        name: impl Into<String>,
        slug: impl Into<String>,
        position: i64,
    ) -> Self {
        self.tab = name.into();
        self.tab_slug = Some(slug.into());
        self.tab_position = position;
        self
    }

    /// Builder: set the current value
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    /// Builder: attach tab-level properties
    pub fn with_tab_info(mut self, info: TabInfo) -> Self {
        self.tab_info = Some(info);
        self
    }

    /// Builder: mark as a relationship field pointing at `related_id`
    pub fn with_relationship(
        mut self,
        relationship_type: impl Into<String>,
        related_id: impl Into<Value>,
    ) -> Self {
        self.relationship_type = Some(relationship_type.into());
        self.has_one_id = Some(related_id.into());
        self
    }

    /// Whether this field's component is one of the relationship kinds
    pub fn is_relationship(&self) -> bool {
        RELATIONSHIP_COMPONENTS.contains(&self.component.as_str())
    }

    /// Component name the renderer should resolve for this field
    pub fn component_name(&self, mode: &str) -> String {
        if self.prefix_component {
            format!("{}-{}", mode, self.component)
        } else {
            self.component.clone()
        }
    }
}

/// Tab-level properties shipped with every field of a tab
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    /// Attribute whose value controls this tab's visibility
    #[serde(default)]
    pub changed_attribute: Option<String>,

    /// Values of `changed_attribute` for which this tab is shown
    #[serde(default)]
    pub attribute_value: Vec<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub title_as_html: bool,

    #[serde(default)]
    pub before_icon: Option<String>,

    #[serde(default)]
    pub after_icon: Option<String>,

    #[serde(default)]
    pub tab_class: Vec<String>,

    #[serde(default)]
    pub body_class: Vec<String>,
}

impl TabInfo {
    /// Tab info declaring a visibility dependency
    pub fn depends_on(attribute: impl Into<String>, values: &[&str]) -> Self {
        Self {
            changed_attribute: Some(attribute.into()),
            attribute_value: values.iter().map(|v| v.to_string()).collect(),
            ..Default::default()
        }
    }

    /// The dependency attribute, if the tab declares a usable one
    ///
    /// Both the attribute and at least one allowed value must be present;
    /// an incomplete declaration leaves the tab unconditional.
    pub fn dependency(&self) -> Option<&str> {
        match self.changed_attribute.as_deref() {
            Some(attr) if !attr.is_empty() && !self.attribute_value.is_empty() => Some(attr),
            _ => None,
        }
    }
}

/// String form of a field value used for allowed-value comparison
///
/// `null` has no string form. Arrays join their elements with commas and
/// objects have no comparable form.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(number_to_string(n)),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|v| value_to_string(v).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => None,
    }
}

/// Integral floats print without a fractional part, so `2.0` reads as `2`
fn number_to_string(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Color theme broadcast by the host application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_deserializes_camel_case() {
        let field: FieldDescriptor = serde_json::from_value(json!({
            "attribute": "type",
            "tab": "General",
            "tabSlug": "general",
            "tabPosition": 2,
            "component": "select-field",
            "value": "x",
            "tabInfo": {
                "changedAttribute": "kind",
                "attributeValue": ["a", "b"],
                "bodyClass": ["p-4"]
            }
        }))
        .unwrap();

        assert_eq!(field.attribute, "type");
        assert_eq!(field.tab_slug.as_deref(), Some("general"));
        assert_eq!(field.tab_position, 2);
        let info = field.tab_info.unwrap();
        assert_eq!(info.dependency(), Some("kind"));
        assert_eq!(info.body_class, vec!["p-4".to_string()]);
    }

    #[test]
    fn test_missing_tab_slug_deserializes_to_none() {
        let field: FieldDescriptor =
            serde_json::from_value(json!({"attribute": "name", "component": "text-field"}))
                .unwrap();
        assert!(field.tab_slug.is_none());
    }

    #[test]
    fn test_relationship_classification() {
        assert!(FieldDescriptor::new("posts", "has-many-field").is_relationship());
        assert!(FieldDescriptor::new("tags", "morph-to-many-field").is_relationship());
        assert!(!FieldDescriptor::new("author", "belongs-to-field").is_relationship());
    }

    #[test]
    fn test_component_name_prefix() {
        let mut field = FieldDescriptor::new("name", "text-field");
        assert_eq!(field.component_name("form"), "text-field");
        field.prefix_component = true;
        assert_eq!(field.component_name("form"), "form-text-field");
    }

    #[test]
    fn test_dependency_requires_values() {
        let info = TabInfo {
            changed_attribute: Some("type".into()),
            ..Default::default()
        };
        assert_eq!(info.dependency(), None);

        let info = TabInfo::depends_on("", &["x"]);
        assert_eq!(info.dependency(), None);
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!(null)), None);
        assert_eq!(value_to_string(&json!("x")), Some("x".into()));
        assert_eq!(value_to_string(&json!(3)), Some("3".into()));
        assert_eq!(value_to_string(&json!(2.0)), Some("2".into()));
        assert_eq!(value_to_string(&json!(-4.0)), Some("-4".into()));
        assert_eq!(value_to_string(&json!(2.5)), Some("2.5".into()));
        assert_eq!(value_to_string(&json!(true)), Some("true".into()));
        assert_eq!(value_to_string(&json!([1, "a"])), Some("1,a".into()));
        assert_eq!(value_to_string(&json!({"a": 1})), None);
    }
}
