//! Default-value resolution.
//!
//! Defaults are derived from the schema every time they are needed; they are
//! never written back on their own. A stored blob shadows them field by field.

use serde_json::Value;

use crate::data::{field::FieldSchema, schema::SectionSchema, store::Options};

/// Collect `field.id => default` for every field that declares a default.
///
/// Walks sections then fields in schema order. A later field reusing an id
/// overwrites the earlier default. Fields without an id are skipped.
pub fn default_values<'a>(sections: impl IntoIterator<Item = &'a SectionSchema>) -> Options {
    let mut defaults = Options::new();
    for section in sections {
        for field in &section.fields {
            if field.id.is_empty() {
                continue;
            }
            if let Some(default) = &field.default {
                defaults.insert(field.id.clone(), default.clone());
            }
        }
    }
    defaults
}

/// Effective value of a field: stored value, else declared default, else `""`.
pub fn resolve_value(field: &FieldSchema, stored: &Options) -> Value {
    stored
        .get(&field.id)
        .or(field.default.as_ref())
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()))
}

/// Overlay a stored blob on the defaults of `sections`.
///
/// Stale keys in `stored` that no longer match a field are kept, since
/// consumers read by field id and ignore the rest.
pub fn merge_with_defaults<'a>(
    sections: impl IntoIterator<Item = &'a SectionSchema>,
    stored: &Options,
) -> Options {
    let mut merged = default_values(sections);
    for (key, value) in stored {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
