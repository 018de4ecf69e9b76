//! Handlers of the `ocdutils` subcommands.
//!
//! Each handler works on a loaded [`AppContext`]:
//!
//! - `serve` runs the settings pages over HTTP
//! - `render` prints one settings tab as HTML
//! - `defaults` prints the effective options of every component
//! - `schema` prints the JSON Schema of the config or component files
//! - `components` lists the known components

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use ocdconfig::{
    AdminSettings, ComponentDescriptor, OptionStore, Options, SettingsSource,
    data::defaults::merge_with_defaults,
};

use crate::{
    config::AppConfig,
    ctx::AppContext,
    settings::{GENERAL_SLUG, active_components, general_descriptor},
};

/// Document whose JSON Schema `schema` prints.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SchemaTarget {
    /// The `.ocdutils.toml` tool configuration.
    #[default]
    Config,
    /// A component schema file of `components_dir`.
    Component,
}

/// Handler for the subcommands.
pub struct SettingsHandler;

impl SettingsHandler {
    /// Seeds missing defaults and serves the settings pages until stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if the listen address cannot be bound or the option
    /// store cannot be written.
    pub async fn handle_serve(ctx: &AppContext, listen: Option<String>) -> Result<()> {
        let seeded = ctx.settings().seed_defaults(ctx.store.as_ref())?;
        for slug in &seeded {
            println!("{} {}", "seeded".green(), slug);
        }
        if ctx.config.users.is_empty() {
            warn!("no users configured, the settings pages are not reachable by anyone");
        }

        let listen = listen.unwrap_or_else(|| ctx.config.listen.clone());
        let listener = tokio::net::TcpListener::bind(&listen)
            .await
            .map_err(|e| anyhow!("Failed to bind {listen}: {e}"))?;
        ocdconfig::web::serve(listener, ctx.web_state()).await?;
        Ok(())
    }

    /// Renders the settings page as seen by the configured user `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the user may not manage the settings.
    pub fn handle_render(ctx: &AppContext, user: &str, tab: Option<&str>) -> Result<String> {
        let assembled = ctx.settings().assemble(ctx.store.as_ref())?;
        let user = ctx.user_by_name(user);
        let mut page = AdminSettings::new(&assembled.config, ctx.store.as_ref(), tab);
        for notice in &assembled.notices {
            page.add_notice(notice.clone());
        }
        match page.render_settings_page(&user)? {
            Some(html) => Ok(html),
            None => bail!(
                "user '{}' lacks the '{}' capability",
                user.name,
                assembled.config.capability
            ),
        }
    }

    /// Effective options (stored values over defaults) keyed by slug.
    ///
    /// Lists the General tab and every active component, or only
    /// `component` when given.
    pub fn handle_defaults(ctx: &AppContext, component: Option<&str>) -> Result<Options> {
        let store = ctx.store.as_ref();
        let mut descriptors = vec![general_descriptor(&ctx.registry)];
        let general = store.load(GENERAL_SLUG)?.unwrap_or_default();
        for slug in active_components(&general) {
            if let Some(c) = ctx.registry.get(&slug) {
                descriptors.push(c.descriptor(&ctx.config.site));
            }
        }
        if let Some(slug) = component {
            descriptors.retain(|d| d.slug == slug);
            if descriptors.is_empty() {
                let c = ctx
                    .registry
                    .get(slug)
                    .ok_or_else(|| anyhow!("unknown component '{slug}'"))?;
                descriptors.push(c.descriptor(&ctx.config.site));
            }
        }

        let mut out = Options::new();
        for descriptor in descriptors {
            let stored = store.load(&descriptor.slug)?.unwrap_or_default();
            out.insert(
                descriptor.slug.clone(),
                merge_with_defaults(&descriptor.sections, &stored).into(),
            );
        }
        Ok(out)
    }

    /// JSON Schema of `target`, pretty printed.
    pub fn handle_schema(target: SchemaTarget) -> Result<String> {
        let schema = match target {
            SchemaTarget::Config => schemars::schema_for!(AppConfig),
            SchemaTarget::Component => schemars::schema_for!(ComponentDescriptor),
        };
        Ok(serde_json::to_string_pretty(&schema)?)
    }

    /// Prints every known component, marking the active ones.
    pub fn handle_components(ctx: &AppContext) -> Result<()> {
        let general = ctx.store.load(GENERAL_SLUG)?.unwrap_or_default();
        let active = active_components(&general);
        for component in ctx.registry.iter() {
            let mark = if active.iter().any(|s| s == component.slug()) {
                "active".green().bold()
            } else {
                "inactive".dimmed()
            };
            println!("{:<28} {:<28} {}", component.slug().cyan(), component.label(), mark);
        }
        for slug in active.iter().filter(|s| ctx.registry.get(s).is_none()) {
            println!("{:<28} {:<28} {}", slug.as_str().red(), "", "missing".red().bold());
        }
        Ok(())
    }
}
