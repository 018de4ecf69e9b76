//! Components that can be activated from the General tab.
//!
//! Each component contributes one settings tab. The built-in components
//! live in this module; extra ones are read from schema files
//! (`*.toml` or `*.json`, one component per file) in the configured
//! components directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use ocdconfig::{Choices, ComponentDescriptor};

use crate::config::SiteConfig;

pub mod events_carousel;
pub mod example;
pub mod filter_portfolio;
pub mod search_form;

/// Component interface.
///
/// A component is identified by its slug, which is also the key of its
/// persisted option blob.
pub trait Component: Send + Sync {
    /// Returns the slug of the component.
    fn slug(&self) -> &str;

    /// Returns the name shown in the active components list.
    fn label(&self) -> &str;

    /// Builds the settings schema of the component.
    ///
    /// # Arguments
    ///
    /// * `site` - Site content offered as choices by select fields
    fn descriptor(&self, site: &SiteConfig) -> ComponentDescriptor;
}

/// A component whose schema was read from a file.
#[derive(Debug, Clone)]
pub struct SchemaFile {
    path: PathBuf,
    descriptor: ComponentDescriptor,
}

impl SchemaFile {
    /// Reads a component schema from a `.toml` or `.json` file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let descriptor = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => ComponentDescriptor::from_toml_str(&content),
            Some("json") => ComponentDescriptor::from_json_str(&content),
            other => bail!("unsupported schema file extension: {other:?}"),
        }
        .with_context(|| format!("Invalid component schema {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            descriptor,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Component for SchemaFile {
    fn slug(&self) -> &str {
        &self.descriptor.slug
    }

    fn label(&self) -> &str {
        &self.descriptor.label
    }

    fn descriptor(&self, _site: &SiteConfig) -> ComponentDescriptor {
        self.descriptor.clone()
    }
}

/// Every component known to the tool, in listing order.
#[derive(Default)]
pub struct ComponentRegistry {
    components: Vec<Box<dyn Component>>,
}

impl ComponentRegistry {
    /// Registry holding the built-in components.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        registry.add(Box::new(example::ExampleComponent));
        registry.add(Box::new(search_form::SimpleSearchForm));
        registry.add(Box::new(filter_portfolio::FilterPortfolio));
        registry.add(Box::new(events_carousel::EventsCarousel));
        registry
    }

    /// Adds a component, replacing a known one with the same slug.
    pub fn add(&mut self, component: Box<dyn Component>) {
        match self
            .components
            .iter_mut()
            .find(|c| c.slug() == component.slug())
        {
            Some(existing) => {
                info!("component '{}' replaced", component.slug());
                *existing = component;
            }
            None => self.components.push(component),
        }
    }

    /// Loads every schema file in `dir`, in file name order.
    ///
    /// Unreadable or invalid files are skipped with a warning. Returns the
    /// number of components loaded.
    pub fn load_dir(&mut self, dir: &Path) -> anyhow::Result<usize> {
        let mut paths = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read components dir {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && matches!(
                        p.extension().and_then(|s| s.to_str()),
                        Some("toml" | "json")
                    )
            })
            .collect::<Vec<_>>();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match SchemaFile::load(&path) {
                Ok(file) => {
                    debug!("loaded component '{}' from {}", file.slug(), path.display());
                    self.add(Box::new(file));
                    loaded += 1;
                }
                Err(e) => warn!("{e:#}"),
            }
        }
        Ok(loaded)
    }

    pub fn get(&self, slug: &str) -> Option<&dyn Component> {
        self.components
            .iter()
            .find(|c| c.slug() == slug)
            .map(|c| c.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Component> {
        self.components.iter().map(|c| c.as_ref())
    }

    /// Slug to label of every component, for the active components field.
    pub fn choices(&self) -> Choices {
        self.iter().map(|c| (c.slug(), c.label())).collect()
    }
}
