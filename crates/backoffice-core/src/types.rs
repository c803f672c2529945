//! Core data types for the backoffice console

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Opaque resource identifier assigned by the remote backend
pub type ResourceId = String;

/// A single field value as it appears on the wire
///
/// Backend records are flat JSON objects whose members are scalars, lists
/// (follow-up comments, gallery URLs) or nested objects (blog sections).
/// The untagged representation round-trips all of them without a schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// JSON null
    #[default]
    Null,
    /// Boolean flag
    Flag(bool),
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
    /// Ordered list of values (sub-record lists)
    Items(Vec<FieldValue>),
    /// Nested object (one sub-record entry)
    Record(IndexMap<String, FieldValue>),
}

impl FieldValue {
    /// Text content, if this value is textual
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric content, parsing numeric text as the HTML form inputs produce it
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// List content, if this value is a list
    #[must_use]
    pub fn as_items(&self) -> Option<&[FieldValue]> {
        match self {
            Self::Items(items) => Some(items),
            _ => None,
        }
    }

    /// The value rendered the way a table cell or filter comparison sees it
    #[must_use]
    pub fn display_value(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Flag(flag) => flag.to_string(),
            Self::Number(n) => format_number(*n),
            Self::Text(text) => text.clone(),
            Self::Items(_) | Self::Record(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
        }
    }

    /// Whether this value is `Null`
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        Self::Items(value)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(flag) => Self::Flag(flag),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(text) => Self::Text(text),
            serde_json::Value::Array(items) => {
                Self::Items(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(members) => Self::Record(
                members
                    .into_iter()
                    .map(|(name, member)| (name, Self::from(member)))
                    .collect(),
            ),
        }
    }
}

impl From<&FieldValue> for serde_json::Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Null => Self::Null,
            FieldValue::Flag(flag) => Self::Bool(*flag),
            FieldValue::Number(n) => {
                serde_json::Number::from_f64(*n).map_or(Self::Null, Self::Number)
            }
            FieldValue::Text(text) => Self::String(text.clone()),
            FieldValue::Items(items) => Self::Array(items.iter().map(Self::from).collect()),
            FieldValue::Record(members) => Self::Object(
                members
                    .iter()
                    .map(|(name, member)| (name.clone(), Self::from(member)))
                    .collect(),
            ),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract().abs() < f64::EPSILON {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// One record of a business entity (order, lead, blog post, ...)
///
/// The identifier is assigned by the backend and immutable; everything else
/// is an ordered map of named fields in the order the wire object carried
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique identifier within the collection
    pub id: ResourceId,

    /// When the record was created, when the backend reports it
    pub created_at: Option<DateTime<Utc>>,

    /// Named fields, wire order preserved
    pub fields: IndexMap<String, FieldValue>,
}

impl Resource {
    /// Create a resource with an identifier and no fields
    #[must_use]
    pub fn new(id: impl Into<ResourceId>) -> Self {
        Self {
            id: id.into(),
            created_at: None,
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field assignment, mostly for tests and mocks
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builder-style creation timestamp
    #[must_use]
    pub const fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Look up a field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// A field rendered as display text
    #[must_use]
    pub fn display_value(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(FieldValue::display_value)
    }

    /// A field as text
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }

    /// A field as a number, accepting numeric text
    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(FieldValue::as_number)
    }

    /// Merge only the given fields into this record, leaving all others alone
    pub fn merge_fields(&mut self, updates: &IndexMap<String, FieldValue>) {
        for (name, value) in updates {
            self.fields.insert(name.clone(), value.clone());
        }
    }

    /// Append one entry to a list field, creating the list if absent
    pub fn append_item(&mut self, name: &str, value: FieldValue) {
        match self.fields.get_mut(name) {
            Some(FieldValue::Items(items)) => items.push(value),
            _ => {
                self.fields
                    .insert(name.to_string(), FieldValue::Items(vec![value]));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::float_cmp)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_field_value_untagged_roundtrip() {
        let values = vec![
            FieldValue::Null,
            FieldValue::Flag(true),
            FieldValue::Number(42.0),
            FieldValue::Text("Pending".to_string()),
            FieldValue::Items(vec![FieldValue::Text("called client".to_string())]),
        ];

        for value in values {
            let serialized = serde_json::to_string(&value).unwrap();
            let deserialized: FieldValue = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, value);
        }
    }

    #[test]
    fn test_field_value_from_json() {
        let value = json!({
            "title": "Intro",
            "content": "Hello",
            "order": 1,
            "published": false,
            "tags": ["a", "b"]
        });

        let field = FieldValue::from(value);
        let FieldValue::Record(members) = field else {
            panic!("Expected Record variant");
        };
        assert_eq!(
            members.get("title"),
            Some(&FieldValue::Text("Intro".to_string()))
        );
        assert_eq!(members.get("order"), Some(&FieldValue::Number(1.0)));
        assert_eq!(members.get("published"), Some(&FieldValue::Flag(false)));
        assert_eq!(
            members.get("tags"),
            Some(&FieldValue::Items(vec![
                FieldValue::Text("a".to_string()),
                FieldValue::Text("b".to_string()),
            ]))
        );
    }

    #[test]
    fn test_display_value_formats() {
        assert_eq!(FieldValue::Text("Completed".into()).display_value(), "Completed");
        assert_eq!(FieldValue::Number(600.0).display_value(), "600");
        assert_eq!(FieldValue::Number(12.5).display_value(), "12.5");
        assert_eq!(FieldValue::Flag(true).display_value(), "true");
        assert_eq!(FieldValue::Null.display_value(), "");
    }

    #[test]
    fn test_as_number_accepts_numeric_text() {
        assert_eq!(FieldValue::Text("1000".into()).as_number(), Some(1000.0));
        assert_eq!(FieldValue::Text(" 42.5 ".into()).as_number(), Some(42.5));
        assert_eq!(FieldValue::Text("not a number".into()).as_number(), None);
        assert_eq!(FieldValue::Number(7.0).as_number(), Some(7.0));
        assert_eq!(FieldValue::Flag(true).as_number(), None);
    }

    #[test]
    fn test_resource_builder() {
        let created = Utc.with_ymd_and_hms(2024, 3, 15, 14, 25, 30).unwrap();
        let resource = Resource::new("abc123")
            .with_created_at(created)
            .with_field("customerName", "Asha")
            .with_field("amountPaid", 400.0);

        assert_eq!(resource.id, "abc123");
        assert_eq!(resource.created_at, Some(created));
        assert_eq!(resource.text("customerName"), Some("Asha"));
        assert_eq!(resource.number("amountPaid"), Some(400.0));
        assert!(resource.field("missing").is_none());
    }

    #[test]
    fn test_merge_fields_only_touches_named_fields() {
        let mut resource = Resource::new("1")
            .with_field("status", "New")
            .with_field("name", "Lead A")
            .with_field("phone", "12345");

        let mut updates = IndexMap::new();
        updates.insert("status".to_string(), FieldValue::Text("Converted".into()));
        resource.merge_fields(&updates);

        assert_eq!(resource.text("status"), Some("Converted"));
        assert_eq!(resource.text("name"), Some("Lead A"));
        assert_eq!(resource.text("phone"), Some("12345"));
    }

    #[test]
    fn test_append_item_creates_and_extends() {
        let mut resource = Resource::new("1");
        resource.append_item("followUp", FieldValue::Text("first call".into()));
        resource.append_item("followUp", FieldValue::Text("second call".into()));

        assert_eq!(
            resource.field("followUp"),
            Some(&FieldValue::Items(vec![
                FieldValue::Text("first call".into()),
                FieldValue::Text("second call".into()),
            ]))
        );
    }

    #[test]
    fn test_append_item_replaces_non_list_value() {
        let mut resource = Resource::new("1").with_field("followUp", FieldValue::Null);
        resource.append_item("followUp", FieldValue::Text("call".into()));

        assert_eq!(
            resource.field("followUp"),
            Some(&FieldValue::Items(vec![FieldValue::Text("call".into())]))
        );
    }

    #[test]
    fn test_resource_serialization_roundtrip() {
        let resource = Resource::new("65fd")
            .with_created_at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
            .with_field("mainTitle", "Post")
            .with_field(
                "sections",
                FieldValue::Items(vec![FieldValue::Record(
                    [
                        ("title".to_string(), FieldValue::Text("s1".into())),
                        ("content".to_string(), FieldValue::Text("c1".into())),
                    ]
                    .into_iter()
                    .collect(),
                )]),
            );

        let serialized = serde_json::to_string(&resource).unwrap();
        let deserialized: Resource = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, resource);
    }

    proptest! {
        #[test]
        fn test_text_display_roundtrip(text in "\\PC{0,40}") {
            let value = FieldValue::Text(text.clone());
            prop_assert_eq!(value.display_value(), text);
        }

        #[test]
        fn test_whole_numbers_render_without_fraction(n in 0i64..=1_000_000i64) {
            #[allow(clippy::cast_precision_loss)]
            let value = FieldValue::Number(n as f64);
            prop_assert_eq!(value.display_value(), n.to_string());
        }

        #[test]
        fn test_json_conversion_roundtrip(text in "\\PC{0,20}", n in -1000.0f64..1000.0) {
            let original = json!({"note": text, "amount": n});
            let field = FieldValue::from(original.clone());
            let back = serde_json::Value::from(&field);
            prop_assert_eq!(back, original);
        }
    }
}
