use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{defaults::default_values, field::FieldSchema, store::Options};

/// Problems found in a schema document.
///
/// Loading errors abort; the remaining variants are diagnostics reported by
/// [`ComponentDescriptor::diagnostics`] and never stop a page from rendering.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid TOML schema: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("component has no slug")]
    MissingSlug,

    #[error("{component}: field '{field}' has unsupported type '{kind}'")]
    UnknownFieldType {
        component: String,
        field: String,
        kind: String,
    },

    #[error("{component}: field '{field}' of type '{kind}' declares no options")]
    MissingOptions {
        component: String,
        field: String,
        kind: String,
    },

    #[error("{component}: field id '{field}' is declared more than once")]
    DuplicateField { component: String, field: String },
}

/// Named group of fields and/or descriptive text within a tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SectionSchema {
    #[serde(default)]
    pub id: String,
    /// Section heading. Defaults to "Component Settings" when rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Trusted HTML shown under the heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSchema>,
}

impl SectionSchema {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }
}

/// A component's settings: one admin tab and one persisted option blob.
///
/// `slug` doubles as the option key and the tab identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComponentDescriptor {
    #[serde(default)]
    pub slug: String,
    /// Tab label.
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub sections: Vec<SectionSchema>,
}

impl ComponentDescriptor {
    pub fn new(slug: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn section(mut self, section: SectionSchema) -> Self {
        self.sections.push(section);
        self
    }

    /// Parse a component from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, SchemaError> {
        let component: Self = toml::from_str(s)?;
        component.check_slug()
    }

    /// Parse a component from a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, SchemaError> {
        let component: Self = serde_json::from_str(s)?;
        component.check_slug()
    }

    fn check_slug(self) -> Result<Self, SchemaError> {
        if self.slug.trim().is_empty() {
            return Err(SchemaError::MissingSlug);
        }
        Ok(self)
    }

    /// Every field with an id, in schema order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .filter(|f| !f.id.is_empty())
    }

    /// First field declared with `id`.
    pub fn find_field(&self, id: &str) -> Option<&FieldSchema> {
        self.fields().find(|f| f.id == id)
    }

    /// Whether any section declares at least one field.
    pub fn has_field(&self) -> bool {
        self.fields().next().is_some()
    }

    /// Defaults of every field that declares one.
    pub fn default_values(&self) -> Options {
        default_values(&self.sections)
    }

    /// Report schema misuse that is tolerated at render time.
    pub fn diagnostics(&self) -> Vec<SchemaError> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();
        for field in self.fields() {
            if !seen.insert(field.id.as_str()) {
                problems.push(SchemaError::DuplicateField {
                    component: self.slug.clone(),
                    field: field.id.clone(),
                });
            }
            match field.field_kind() {
                None => problems.push(SchemaError::UnknownFieldType {
                    component: self.slug.clone(),
                    field: field.id.clone(),
                    kind: field.kind.clone(),
                }),
                Some(kind) if kind.has_choices() && field.options.is_empty() => {
                    problems.push(SchemaError::MissingOptions {
                        component: self.slug.clone(),
                        field: field.id.clone(),
                        kind: kind.to_string(),
                    })
                }
                Some(_) => {}
            }
        }
        problems
    }
}

/// Aggregate of every active component for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SettingsConfig {
    /// Value of the `page` query parameter that selects this settings page.
    pub page_slug: String,
    /// Capability required to see and submit the page.
    pub capability: String,
    pub page_title: String,
    pub menu_title: String,
    pub components: Vec<ComponentDescriptor>,
}

impl SettingsConfig {
    /// First component registered under `slug`.
    pub fn component(&self, slug: &str) -> Option<&ComponentDescriptor> {
        self.components.iter().find(|c| c.slug == slug)
    }

    /// Select the tab to show: the requested slug, else the first component.
    pub fn select(&self, tab: Option<&str>) -> Option<&ComponentDescriptor> {
        match tab.map(str::trim).filter(|t| !t.is_empty()) {
            Some(tab) => self.component(tab).or_else(|| {
                debug!("unknown settings tab '{tab}', showing the first component");
                self.components.first()
            }),
            None => self.components.first(),
        }
    }
}
