//! Application context and state management.
//!
//! This module provides the [`AppContext`] type which holds the loaded
//! configuration, the option store and the known components.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use ocdconfig::{FileStore, OptionStore, User, web::WebState};

use crate::{components::ComponentRegistry, config::AppConfig, settings::OcdSettings};

/// The main application context holding all state.
#[derive(Clone)]
pub struct AppContext {
    /// Loaded tool configuration.
    pub config: AppConfig,
    /// Path the configuration was loaded from.
    pub config_path: PathBuf,
    /// Persisted component options.
    pub store: Arc<dyn OptionStore>,
    /// Built-in components plus the ones read from `components_dir`.
    pub registry: Arc<ComponentRegistry>,
}

impl AppContext {
    /// Loads the configuration at `config_path` and opens the option store.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be parsed, the store
    /// extension is not supported or the components directory is unreadable.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let config = AppConfig::load(config_path)?;

        let store_path = config.resolve(config_path, &config.store);
        let store = FileStore::open(&store_path)
            .with_context(|| format!("Failed to open option store {}", store_path.display()))?
            .with_backup(config.backup);
        debug!("option store: {}", store_path.display());

        let mut registry = ComponentRegistry::builtin();
        if let Some(dir) = &config.components_dir {
            let dir = config.resolve(config_path, dir);
            let loaded = registry.load_dir(&dir)?;
            info!("loaded {loaded} component schemas from {}", dir.display());
        }

        Ok(Self::new(config, config_path.to_path_buf(), Arc::new(store), registry))
    }

    pub fn new(
        config: AppConfig,
        config_path: PathBuf,
        store: Arc<dyn OptionStore>,
        registry: ComponentRegistry,
    ) -> Self {
        Self {
            config,
            config_path,
            store,
            registry: Arc::new(registry),
        }
    }

    /// Settings page of the tool.
    pub fn settings(&self) -> OcdSettings {
        OcdSettings::new(self.config.clone(), self.registry.clone())
    }

    /// User holding `token`, anonymous when no configured user matches.
    pub fn user(&self, token: Option<&str>) -> User {
        token
            .and_then(|token| self.config.users.iter().find(|u| u.token == token))
            .map(|u| u.to_user())
            .unwrap_or_else(User::anonymous)
    }

    /// User named `name`; unknown names are anonymous.
    pub fn user_by_name(&self, name: &str) -> User {
        self.config
            .users
            .iter()
            .find(|u| u.name == name)
            .map(|u| u.to_user())
            .unwrap_or_else(User::anonymous)
    }

    /// State of the settings server.
    pub fn web_state(&self) -> WebState {
        let mut state = WebState::new(self.settings(), self.store.clone());
        for user in &self.config.users {
            state = state.with_user(&user.token, user.to_user());
        }
        state
    }
}
