//! Assembly of the OCD Utils settings page.
//!
//! The first tab, "General", lists every known component in its
//! `active_components` field. Each component checked there adds its own tab
//! on the next request.

use std::sync::Arc;

use ocdconfig::{
    AssembledSettings, ComponentDescriptor, FieldKind, FieldSchema, OptionStore, Options,
    SectionSchema, SettingsBuilder, SettingsSource, StoreError, Value,
};

use crate::{components::ComponentRegistry, config::AppConfig};

/// Option key of the General tab.
pub const GENERAL_SLUG: &str = "ocd_utils_settings";

/// Field of the General tab holding the active component slugs.
pub const ACTIVE_COMPONENTS: &str = "active_components";

/// Schema of the General tab.
pub fn general_descriptor(registry: &ComponentRegistry) -> ComponentDescriptor {
    ComponentDescriptor::new(GENERAL_SLUG, "General").section(
        SectionSchema::new(ACTIVE_COMPONENTS, "Active Components").field(
            FieldSchema::new(ACTIVE_COMPONENTS, "Components", FieldKind::Checkboxes)
                .description("Choose the ones you want to use.")
                .choices(registry.choices()),
        ),
    )
}

/// Active component slugs stored in the General blob, without repeats.
pub fn active_components(general: &Options) -> Vec<String> {
    let mut slugs: Vec<String> = Vec::new();
    let Some(Value::Array(items)) = general.get(ACTIVE_COMPONENTS) else {
        return slugs;
    };
    for slug in items.iter().filter_map(Value::as_str) {
        if !slug.is_empty() && !slugs.iter().any(|s| s == slug) {
            slugs.push(slug.to_string());
        }
    }
    slugs
}

/// Settings page of the tool, assembled from the stored General blob.
#[derive(Clone)]
pub struct OcdSettings {
    app: AppConfig,
    registry: Arc<ComponentRegistry>,
}

impl OcdSettings {
    pub fn new(app: AppConfig, registry: Arc<ComponentRegistry>) -> Self {
        Self { app, registry }
    }

    fn builder(&self) -> SettingsBuilder {
        SettingsBuilder::new(&self.app.page_slug)
            .capability(&self.app.capability)
            .page_title(&self.app.page_title)
            .menu_title(&self.app.menu_title)
    }

    /// Store defaults for every tab that has nothing saved yet.
    ///
    /// Returns the slugs that were seeded.
    pub fn seed_defaults(&self, store: &dyn OptionStore) -> Result<Vec<String>, StoreError> {
        let mut descriptors = vec![general_descriptor(&self.registry)];
        descriptors.extend(self.registry.iter().map(|c| c.descriptor(&self.app.site)));

        let mut seeded = Vec::new();
        for descriptor in descriptors {
            if store.load(&descriptor.slug)?.is_some() {
                continue;
            }
            store.save(&descriptor.slug, &descriptor.default_values())?;
            debug!("seeded defaults for '{}'", descriptor.slug);
            seeded.push(descriptor.slug);
        }
        if !seeded.is_empty() {
            info!("seeded defaults for {} components", seeded.len());
        }
        Ok(seeded)
    }
}

impl SettingsSource for OcdSettings {
    fn assemble(&self, store: &dyn OptionStore) -> Result<AssembledSettings, StoreError> {
        let mut builder = self.builder();
        builder.register(general_descriptor(&self.registry));

        let general = store.load(GENERAL_SLUG)?.unwrap_or_default();
        let mut notices = Vec::new();
        for slug in active_components(&general) {
            match self.registry.get(&slug) {
                Some(component) => {
                    builder.register(component.descriptor(&self.app.site));
                }
                None => {
                    warn!("active component '{slug}' is not available");
                    notices.push(format!(
                        "The component file for '{slug}' is missing or not readable."
                    ));
                }
            }
        }

        Ok(AssembledSettings {
            config: builder.build(),
            notices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocdconfig::MemoryStore;
    use serde_json::json;

    fn opts(v: Value) -> Options {
        serde_json::from_value(v).unwrap()
    }

    fn settings() -> OcdSettings {
        OcdSettings::new(AppConfig::default(), Arc::new(ComponentRegistry::builtin()))
    }

    #[test]
    fn test_general_tab_only() {
        let store = MemoryStore::default();
        let assembled = settings().assemble(&store).unwrap();
        let config = assembled.config;
        assert_eq!(config.page_slug, "ocdutils");
        assert_eq!(config.page_title, "OCD Utils Settings");
        assert_eq!(config.menu_title, "OCD Utils");
        assert_eq!(config.components.len(), 1);

        let general = &config.components[0];
        assert_eq!(general.slug, GENERAL_SLUG);
        let field = general.find_field(ACTIVE_COMPONENTS).unwrap();
        assert_eq!(field.field_kind(), Some(FieldKind::Checkboxes));
        assert_eq!(field.options.len(), 4);
        assert!(assembled.notices.is_empty());
    }

    #[test]
    fn test_active_components() {
        let store = MemoryStore::default().with_blob(
            GENERAL_SLUG,
            opts(json!({
                "active_components": [
                    "upcoming_events_carousel",
                    "example_component",
                    "divi_projects_portfolio",
                    "example_component"
                ]
            })),
        );
        let assembled = settings().assemble(&store).unwrap();
        let slugs = assembled
            .config
            .components
            .iter()
            .map(|c| c.slug.as_str())
            .collect::<Vec<_>>();
        assert_eq!(slugs, [GENERAL_SLUG, "upcoming_events_carousel", "example_component"]);
        assert_eq!(
            assembled.notices,
            ["The component file for 'divi_projects_portfolio' is missing or not readable."]
        );
    }

    #[test]
    fn test_active_components_ignores_malformed() {
        assert!(active_components(&opts(json!({"active_components": "example"}))).is_empty());
        assert_eq!(
            active_components(&opts(json!({"active_components": ["a", 3, "", "b", "a"]}))),
            ["a", "b"]
        );
    }

    #[test]
    fn test_seed_defaults() {
        let store = MemoryStore::default()
            .with_blob("example_component", opts(json!({"color": "teal"})));
        let settings = settings();

        let seeded = settings.seed_defaults(&store).unwrap();
        assert_eq!(
            seeded,
            [GENERAL_SLUG, "simple_search_form", "filter_portfolio", "upcoming_events_carousel"]
        );
        assert_eq!(
            store.load("example_component").unwrap(),
            Some(opts(json!({"color": "teal"})))
        );
        assert_eq!(
            store.load("simple_search_form").unwrap().unwrap()["color_text"],
            "#222222"
        );
        assert_eq!(store.load(GENERAL_SLUG).unwrap(), Some(Options::new()));

        assert!(settings.seed_defaults(&store).unwrap().is_empty());
    }
}
