//! Collector that assembles the settings config.
//!
//! Components append their schema during setup; the finished
//! [`SettingsConfig`] is then handed, read-only, to the page controller.

use crate::data::{
    schema::{ComponentDescriptor, SettingsConfig},
    store::{OptionStore, StoreError},
};

pub const DEFAULT_CAPABILITY: &str = "manage_options";

/// A settings config together with the admin notices raised while it was
/// assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledSettings {
    pub config: SettingsConfig,
    pub notices: Vec<String>,
}

/// Produces the settings config for one request.
///
/// Hosts whose set of components depends on stored options (for example a
/// list of active components) assemble the config anew on every request.
pub trait SettingsSource: Send + Sync {
    fn assemble(&self, store: &dyn OptionStore) -> Result<AssembledSettings, StoreError>;
}

impl SettingsSource for SettingsConfig {
    fn assemble(&self, _store: &dyn OptionStore) -> Result<AssembledSettings, StoreError> {
        Ok(AssembledSettings {
            config: self.clone(),
            notices: Vec::new(),
        })
    }
}

/// Append-only builder of a [`SettingsConfig`].
#[derive(Debug, Clone)]
pub struct SettingsBuilder {
    config: SettingsConfig,
}

impl SettingsBuilder {
    pub fn new(page_slug: impl Into<String>) -> Self {
        let page_slug = page_slug.into();
        Self {
            config: SettingsConfig {
                page_title: format!("{page_slug} Settings"),
                menu_title: page_slug.clone(),
                page_slug,
                capability: DEFAULT_CAPABILITY.to_string(),
                components: Vec::new(),
            },
        }
    }

    pub fn capability(mut self, capability: impl Into<String>) -> Self {
        self.config.capability = capability.into();
        self
    }

    pub fn page_title(mut self, title: impl Into<String>) -> Self {
        self.config.page_title = title.into();
        self
    }

    pub fn menu_title(mut self, title: impl Into<String>) -> Self {
        self.config.menu_title = title.into();
        self
    }

    /// Append a component's schema, keeping registration order.
    ///
    /// Slugs are not deduplicated: a second registration adds a second tab
    /// sharing the same option key.
    pub fn register(&mut self, component: ComponentDescriptor) -> &mut Self {
        if self.config.component(&component.slug).is_some() {
            warn!(
                "component '{}' is registered more than once; the first registration owns the tab",
                component.slug
            );
        }
        for problem in component.diagnostics() {
            warn!("{problem}");
        }
        debug!("registered settings for '{}'", component.slug);
        self.config.components.push(component);
        self
    }

    /// Slugs registered so far.
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.config.components.iter().map(|c| c.slug.as_str())
    }

    pub fn build(self) -> SettingsConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_keeps_order_and_duplicates() {
        let mut builder = SettingsBuilder::new("ocdutils")
            .page_title("OCD Utils Settings")
            .menu_title("OCD Utils");
        builder
            .register(ComponentDescriptor::new("general", "General"))
            .register(ComponentDescriptor::new("example", "Example"))
            .register(ComponentDescriptor::new("example", "Example again"));
        assert_eq!(builder.slugs().collect::<Vec<_>>(), ["general", "example", "example"]);

        let config = builder.build();
        assert_eq!(config.capability, DEFAULT_CAPABILITY);
        assert_eq!(config.page_title, "OCD Utils Settings");
        assert_eq!(config.components.len(), 3);
        assert_eq!(config.component("example").unwrap().label, "Example");
    }

    #[test]
    fn test_static_source() {
        let mut builder = SettingsBuilder::new("ocdutils");
        builder.register(ComponentDescriptor::new("general", "General"));
        let config = builder.build();
        let store = crate::data::store::MemoryStore::default();
        let assembled = config.assemble(&store).unwrap();
        assert_eq!(assembled.config, config);
        assert!(assembled.notices.is_empty());
    }

    #[test]
    fn test_defaults() {
        let config = SettingsBuilder::new("tools").capability("edit_pages").build();
        assert_eq!(config.page_title, "tools Settings");
        assert_eq!(config.menu_title, "tools");
        assert_eq!(config.capability, "edit_pages");
        assert!(config.components.is_empty());
    }
}
