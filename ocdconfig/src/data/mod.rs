//! Schema types, default values and option stores.
//!
//! - [`field`] - Field schema and the closed set of field kinds
//! - [`schema`] - Sections, components and the aggregate settings config
//! - [`defaults`] - Default-value resolution
//! - [`store`] - Persisted option blobs and the per-request cache

/// Field schema and field kinds.
pub mod field;

/// Section, component and settings config schema.
pub mod schema;

/// Default-value resolution.
pub mod defaults;

/// Option stores and the memoizing accessor.
pub mod store;
