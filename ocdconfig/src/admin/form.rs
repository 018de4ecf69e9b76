//! Decoding of a submitted settings form.
//!
//! Inputs are named `slug[field]`, checkbox groups `slug[field][]`. Two
//! plain keys travel alongside: `option_page` (the slug being saved) and
//! `action`.

use std::collections::HashMap;

use serde_json::Value;

use crate::data::store::Options;

/// A settings form submission, grouped by component slug.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmittedForm {
    pub option_page: Option<String>,
    pub action: Option<String>,
    values: HashMap<String, Options>,
}

/// Split `slug[field]` / `slug[field][]` into its parts.
fn parse_name(name: &str) -> Option<(&str, &str, bool)> {
    let (slug, rest) = name.split_once('[')?;
    let (field, tail) = rest.split_once(']')?;
    if slug.is_empty() || field.is_empty() {
        return None;
    }
    match tail {
        "" => Some((slug, field, false)),
        "[]" => Some((slug, field, true)),
        _ => None,
    }
}

impl SubmittedForm {
    /// Build from decoded `name=value` pairs in submission order.
    ///
    /// A repeated scalar key keeps its last value; `[]` keys accumulate.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = SubmittedForm::default();
        for (name, value) in pairs {
            let name = name.as_ref();
            let value = value.into();
            match name {
                "option_page" => form.option_page = Some(value),
                "action" => form.action = Some(value),
                _ => match parse_name(name) {
                    Some((slug, field, is_list)) => {
                        let blob = form.values.entry(slug.to_string()).or_default();
                        if is_list {
                            let entry = blob
                                .entry(field.to_string())
                                .or_insert_with(|| Value::Array(Vec::new()));
                            match entry {
                                Value::Array(items) => items.push(Value::String(value)),
                                other => *other = Value::Array(vec![Value::String(value)]),
                            }
                        } else {
                            blob.insert(field.to_string(), Value::String(value));
                        }
                    }
                    None => trace!("ignoring form input '{name}'"),
                },
            }
        }
        form
    }

    /// Submitted blob of `slug`; empty when none of its inputs were sent.
    pub fn values(&self, slug: &str) -> Options {
        self.values.get(slug).cloned().unwrap_or_default()
    }
}
