use std::{collections::BTreeMap, fmt};

use schemars::JsonSchema;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};
use serde_json::Value;

/// Closed set of field kinds a schema may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Single-line text input.
    Text,
    /// Numeric input, stored as integer or float.
    Number,
    /// Drop-down with one selected option.
    Select,
    /// Group of checkboxes, stored as a sequence of option keys.
    Checkboxes,
    /// Group of radio buttons with one selected option.
    Radio,
    /// Color picker.
    Color,
}

const KINDS: &[(&str, FieldKind)] = &[
    ("text", FieldKind::Text),
    ("number", FieldKind::Number),
    ("select", FieldKind::Select),
    ("checkboxes", FieldKind::Checkboxes),
    ("radio", FieldKind::Radio),
    ("color", FieldKind::Color),
];

impl FieldKind {
    /// Look up a kind by its schema name (`"text"`, `"number"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        KINDS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, kind)| *kind)
    }

    /// Schema name of this kind.
    pub fn name(self) -> &'static str {
        KINDS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(n, _)| *n)
            .unwrap_or("text")
    }

    /// Whether the kind picks its value from `options`.
    pub fn has_choices(self) -> bool {
        matches!(
            self,
            FieldKind::Select | FieldKind::Checkboxes | FieldKind::Radio
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered `value => label` pairs of a choice field.
///
/// Source order is preserved when deserializing, so options render in the
/// order they were written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Choices(Vec<(String, String)>);

impl Choices {
    /// Add or replace an option.
    pub fn insert(&mut self, value: impl Into<String>, label: impl Into<String>) {
        let value = value.into();
        let label = label.into();
        match self.0.iter_mut().find(|(v, _)| *v == value) {
            Some(entry) => entry.1 = label,
            None => self.0.push((value, label)),
        }
    }

    /// Whether `value` is one of the option keys.
    pub fn contains_key(&self, value: &str) -> bool {
        self.0.iter().any(|(v, _)| v == value)
    }

    /// Label of an option key.
    pub fn get(&self, value: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, l)| l.as_str())
    }

    /// Iterate over `(value, label)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(v, l)| (v.as_str(), l.as_str()))
    }

    /// Iterate over option keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(v, _)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, L: Into<String>> FromIterator<(K, L)> for Choices {
    fn from_iter<T: IntoIterator<Item = (K, L)>>(iter: T) -> Self {
        let mut choices = Choices::default();
        for (value, label) in iter {
            choices.insert(value, label);
        }
        choices
    }
}

impl Serialize for Choices {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (value, label) in &self.0 {
            map.serialize_entry(value, label)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Choices {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ChoicesVisitor;

        impl<'de> Visitor<'de> for ChoicesVisitor {
            type Value = Choices;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of option values to labels")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Choices, A::Error> {
                let mut choices = Choices::default();
                while let Some((value, label)) = access.next_entry::<String, String>()? {
                    choices.insert(value, label);
                }
                Ok(choices)
            }
        }

        deserializer.deserialize_map(ChoicesVisitor)
    }
}

/// Declarative description of one configurable setting.
///
/// `kind` is kept as the raw schema string so that a schema naming an
/// unsupported type still loads; such fields are skipped when the page is
/// assembled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSchema {
    /// Identifier, unique within the enclosing component.
    #[serde(default)]
    pub id: String,
    /// Label shown next to the input.
    #[serde(default)]
    pub label: String,
    /// Field kind name, see [`FieldKind`].
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Help text rendered below the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Value used while nothing has been saved for this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Allowed values of select, checkboxes and radio fields.
    #[serde(default, skip_serializing_if = "Choices::is_empty")]
    #[schemars(with = "BTreeMap<String, String>")]
    pub options: Choices,
    /// Marks the input as required in the browser.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Extra class name for the input element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl FieldSchema {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: kind.name().to_string(),
            ..Default::default()
        }
    }

    /// Resolve the declared kind, `None` for unsupported type names.
    pub fn field_kind(&self) -> Option<FieldKind> {
        FieldKind::from_name(&self.kind)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn choice(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.insert(value, label);
        self
    }

    pub fn choices(mut self, choices: Choices) -> Self {
        self.options = choices;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

/// Render a scalar JSON value the way it appears in a form.
///
/// Strings pass through, numbers use their JSON text, `true` becomes `"1"`.
/// Null, `false`, arrays and objects have no scalar form.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
