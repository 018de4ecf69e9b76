//! Tool configuration.
//!
//! Configuration is stored in `.ocdutils.toml` (or a JSON file with the same
//! shape). Every key is optional.
//!
//! # Configuration File Format
//!
//! ```toml
//! listen = "127.0.0.1:8080"
//! store = ".ocdutils-options.json"
//! components_dir = "components"
//!
//! [[users]]
//! name = "admin"
//! token = "change-me"
//! capabilities = ["manage_options"]
//!
//! [site.post_types]
//! project = "Projects"
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use ocdconfig::{Choices, User, registrar::DEFAULT_CAPABILITY};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default configuration file name.
pub const DEFAULT_CONFIG_PATH: &str = ".ocdutils.toml";

/// Root configuration of the tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Address the settings server binds to.
    pub listen: String,
    /// Option store file; `.json` or `.toml`.
    pub store: PathBuf,
    /// Keep a timestamped copy of the option store before each save.
    pub backup: bool,
    /// Value of the `page` query parameter of the settings page.
    pub page_slug: String,
    /// Capability required to manage the settings.
    pub capability: String,
    pub page_title: String,
    pub menu_title: String,
    /// Directory of extra component schema files (`*.toml`, `*.json`).
    pub components_dir: Option<PathBuf>,
    /// Accounts allowed to use the settings server.
    pub users: Vec<UserConfig>,
    /// Site content offered as choices by component schemas.
    pub site: SiteConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
            store: PathBuf::from(".ocdutils-options.json"),
            backup: false,
            page_slug: "ocdutils".to_string(),
            capability: DEFAULT_CAPABILITY.to_string(),
            page_title: "OCD Utils Settings".to_string(),
            menu_title: "OCD Utils".to_string(),
            components_dir: None,
            users: Vec::new(),
            site: SiteConfig::default(),
        }
    }
}

/// One account of the settings server.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct UserConfig {
    pub name: String,
    /// Bearer token presented in the `Authorization` header.
    pub token: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl UserConfig {
    pub fn to_user(&self) -> User {
        User::new(&self.name, &self.capabilities)
    }
}

/// Site content the components offer as choices.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Post types available for portfolio projects (`slug = "Label"`).
    #[schemars(with = "BTreeMap<String, String>")]
    pub post_types: Choices,
    /// Pages that may host the full portfolio (`id = "Title"`).
    #[schemars(with = "BTreeMap<String, String>")]
    pub pages: Choices,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            post_types: [("project", "Projects"), ("post", "Posts"), ("page", "Pages")]
                .into_iter()
                .collect(),
            pages: Choices::default(),
        }
    }
}

impl AppConfig {
    /// Load the configuration, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        let config = match ext {
            "toml" => toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            "json" => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            _ => bail!("unsupported config file extension: {ext:?}"),
        };
        Ok(config)
    }

    /// Resolve a path relative to the directory of the config file.
    pub fn resolve(&self, config_path: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match config_path.parent() {
            Some(parent) => parent.join(path),
            None => path.to_path_buf(),
        }
    }
}
