//! # ocdutils
//!
//! Site utilities with a tabbed settings page.
//!
//! `ocdutils` hosts a set of optional components. The "General" tab picks the
//! active ones; every active component gets a tab of its own, built from its
//! settings schema by [`ocdconfig`].
//!
//! ## Modules
//!
//! - [`config`] - Tool configuration (`.ocdutils.toml`)
//! - [`components`] - Built-in and file-defined components
//! - [`settings`] - Assembly of the settings page
//! - [`ctx`] - Application context and state management
//! - [`commands`] - Subcommand handlers
//! - [`utilities`] - Page content filters
//!
//! ## Example
//!
//! ```rust,no_run
//! // ocdutils is primarily used as a CLI tool
//! // See the binary target for usage examples
//! ```

/// Tool configuration.
pub mod config;

/// Components that can be activated from the General tab.
pub mod components;

/// Assembly of the settings page from the active components.
pub mod settings;

/// Application context and state management.
pub mod ctx;

/// Handlers of the `ocdutils` subcommands.
pub mod commands;

/// Content filters for the site's pages.
pub mod utilities;

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;
