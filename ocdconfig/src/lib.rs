//! # ocdconfig
//!
//! Schema-driven tabbed settings pages for optional components.
//!
//! Every component describes its settings declaratively (component, sections,
//! fields). From that description `ocdconfig` derives the persisted option
//! blobs, the rendered admin form, the sanitization applied to submissions
//! and the defaults used when nothing has been saved yet.
//!
//! ## Features
//!
//! - Declarative schema loaded from TOML/JSON or built in code
//! - Field kinds: text, number, select, checkboxes, radio, color
//! - Default-value resolution with per-request memoized option loading
//! - Pluggable option stores (in-memory, JSON/TOML file)
//! - Capability-gated admin page with tabs and submit handling
//! - Optional axum web surface (`web` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use ocdconfig::{
//!     AdminSettings, ComponentDescriptor, FieldKind, FieldSchema, MemoryStore,
//!     SectionSchema, SettingsBuilder, User,
//! };
//!
//! let mut builder = SettingsBuilder::new("ocdutils");
//! builder.register(
//!     ComponentDescriptor::new("example", "Example").section(
//!         SectionSchema::new("global", "Global").field(
//!             FieldSchema::new("color", "Box color", FieldKind::Select)
//!                 .choice("teal", "Teal")
//!                 .choice("orchid", "Orchid")
//!                 .default_value("orchid"),
//!         ),
//!     ),
//! );
//! let config = builder.build();
//! let store = MemoryStore::default();
//!
//! let admin = User::new("admin", ["manage_options"]);
//! let mut page = AdminSettings::new(&config, &store, None);
//! let html = page.render_settings_page(&admin).unwrap().unwrap();
//! assert!(html.contains(r#"<option value="orchid" selected="selected">"#));
//! ```
//!
//! ## Modules
//!
//! - [`data`] - Schema types, defaults and option stores
//! - [`registrar`] - Collector assembling the settings config
//! - [`admin`] - Settings page controller, rendering and sanitization
//! - [`capability`] - Users and capability checks
//! - [`html`] - Escaping and tag stripping helpers
//! - [`web`] - HTTP surface (requires `web` feature)

#[macro_use]
extern crate log;

/// Schema types, default values and option stores.
pub mod data;

/// Collector that assembles every component schema into one settings config.
pub mod registrar;

/// Admin settings page controller.
pub mod admin;

/// Users and capability checks.
pub mod capability;

/// HTML escaping and tag stripping.
pub mod html;

/// HTTP surface for the settings pages.
///
/// This module is only available when the `web` feature is enabled.
#[cfg(feature = "web")]
pub mod web;

pub use admin::{AdminSettings, SaveOutcome, form::SubmittedForm};
pub use capability::User;
pub use data::{
    defaults::{default_values, resolve_value},
    field::{Choices, FieldKind, FieldSchema},
    schema::{ComponentDescriptor, SchemaError, SectionSchema, SettingsConfig},
    store::{FileStore, MemoryStore, OptionCache, OptionStore, Options, StoreError},
};
pub use registrar::{AssembledSettings, SettingsBuilder, SettingsSource};
pub use serde_json::Value;
