//! Admin settings page controller.
//!
//! One [`AdminSettings`] serves one request. It selects the tab from the
//! query string, registers the sections and fields of the selected
//! component, renders the page and sanitizes submissions against the same
//! schema.
//!
//! Every entry point is gated by the configured capability. A user lacking
//! it gets nothing back: no menu entry, no page, no write.

use std::fmt::Write;

use serde_json::Value;

use crate::{
    capability::User,
    data::{
        defaults::resolve_value,
        field::{FieldKind, FieldSchema},
        schema::{ComponentDescriptor, SectionSchema, SettingsConfig},
        store::{OptionCache, OptionStore, Options, StoreError},
    },
    html::{esc_attr, esc_html},
};

/// Field markup by kind.
pub mod render;

/// Per-kind sanitization.
pub mod sanitize;

/// Decoding of form submissions.
pub mod form;

/// Fallback heading of a section without a label.
pub const DEFAULT_SECTION_LABEL: &str = "Component Settings";

/// Endpoint the settings form posts to.
pub const OPTIONS_ENDPOINT: &str = "options.php";

/// Page that hosts the settings screens.
pub const SETTINGS_PAGE: &str = "options-general.php";

/// Entry in the admin menu pointing at the settings page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub page_title: String,
    pub menu_title: String,
    pub page_slug: String,
}

impl MenuEntry {
    pub fn href(&self) -> String {
        format!("{SETTINGS_PAGE}?page={}", urlencoding::encode(&self.page_slug))
    }
}

/// A component blob registered as a writable setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredSetting {
    pub slug: String,
    pub label: String,
}

/// A field bound to its render/sanitize strategy.
#[derive(Debug, Clone)]
pub struct RegisteredField<'a> {
    pub field: &'a FieldSchema,
    pub kind: FieldKind,
    /// Id of the element the row label points at.
    pub label_for: String,
}

/// A section of the selected component with its renderable fields.
#[derive(Debug, Clone)]
pub struct RegisteredSection<'a> {
    pub id: String,
    pub title: String,
    pub section: &'a SectionSchema,
    pub fields: Vec<RegisteredField<'a>>,
}

/// Result of handling a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The blob was sanitized and written.
    Saved { slug: String, options: Options },
    /// The user lacks the capability; nothing was written.
    Forbidden,
    /// `option_page` names no registered component; nothing was written.
    UnknownPage,
}

/// Controller of the tabbed settings page for one request.
pub struct AdminSettings<'a> {
    config: &'a SettingsConfig,
    component: Option<&'a ComponentDescriptor>,
    options: OptionCache<'a>,
    settings: Vec<RegisteredSetting>,
    sections: Vec<RegisteredSection<'a>>,
    notices: Vec<String>,
    initialized: bool,
    updated: bool,
}

impl<'a> AdminSettings<'a> {
    /// Select the component for `tab`, falling back to the first one.
    pub fn new(config: &'a SettingsConfig, store: &'a dyn OptionStore, tab: Option<&str>) -> Self {
        Self {
            config,
            component: config.select(tab),
            options: OptionCache::new(store),
            settings: Vec::new(),
            sections: Vec::new(),
            notices: Vec::new(),
            initialized: false,
            updated: false,
        }
    }

    pub fn config(&self) -> &'a SettingsConfig {
        self.config
    }

    /// Component of the active tab, `None` when nothing is registered.
    pub fn component(&self) -> Option<&'a ComponentDescriptor> {
        self.component
    }

    /// Show an error notice above the form.
    pub fn add_notice(&mut self, message: impl Into<String>) {
        self.notices.push(message.into());
    }

    /// Show the "Settings saved." notice.
    pub fn mark_updated(&mut self) {
        self.updated = true;
    }

    /// Menu entry for the page, if `user` may see it.
    pub fn admin_menu(&self, user: &User) -> Option<MenuEntry> {
        if !user.can(&self.config.capability) {
            return None;
        }
        Some(MenuEntry {
            page_title: self.config.page_title.clone(),
            menu_title: self.config.menu_title.clone(),
            page_slug: self.config.page_slug.clone(),
        })
    }

    /// Register the settings of every component and the sections and fields
    /// of the selected one. Returns `false` when `user` lacks the capability.
    pub fn admin_init(&mut self, user: &User) -> bool {
        if !user.can(&self.config.capability) {
            return false;
        }
        if self.initialized {
            return true;
        }
        self.initialized = true;
        let config = self.config;

        for component in &config.components {
            if component.slug.is_empty() {
                continue;
            }
            self.settings.push(RegisteredSetting {
                slug: component.slug.clone(),
                label: component.label.clone(),
            });
        }

        let Some(component) = self.component else {
            return true;
        };
        for section in &component.sections {
            if section.id.is_empty() {
                debug!("{}: skipping section without id", component.slug);
                continue;
            }
            let title = section
                .label
                .clone()
                .unwrap_or_else(|| DEFAULT_SECTION_LABEL.to_string());

            let mut fields = Vec::new();
            for field in &section.fields {
                if field.id.is_empty() {
                    debug!("{}: skipping field without id", component.slug);
                    continue;
                }
                let Some(kind) = field.field_kind() else {
                    warn!(
                        "{}: field '{}' has unsupported type '{}', not rendering it",
                        component.slug, field.id, field.kind
                    );
                    continue;
                };
                fields.push(RegisteredField {
                    field,
                    kind,
                    label_for: field.id.clone(),
                });
            }

            self.sections.push(RegisteredSection {
                id: section.id.clone(),
                title,
                section,
                fields,
            });
        }
        true
    }

    /// Settings registered by [`admin_init`](Self::admin_init).
    pub fn registered_settings(&self) -> &[RegisteredSetting] {
        &self.settings
    }

    /// Sections registered by [`admin_init`](Self::admin_init).
    pub fn registered_sections(&self) -> &[RegisteredSection<'a>] {
        &self.sections
    }

    /// Render the settings page, `None` when `user` may not see it.
    pub fn render_settings_page(&mut self, user: &User) -> Result<Option<String>, StoreError> {
        if !self.admin_init(user) {
            return Ok(None);
        }
        let config = self.config;

        let mut html = String::from(r#"<div class="wrap">"#);
        let _ = write!(html, "<h1>{}</h1>", esc_html(&config.page_title));

        if self.updated {
            html.push_str(
                r#"<div class="notice notice-success is-dismissible"><p>Settings saved.</p></div>"#,
            );
        }
        for notice in &self.notices {
            let _ = write!(
                html,
                r#"<div class="notice notice-error"><p>{}</p></div>"#,
                esc_html(notice)
            );
        }

        let Some(component) = self.component else {
            html.push_str("<p>No settings are available.</p></div>");
            return Ok(Some(html));
        };

        if config.components.len() > 1 {
            html.push_str(&self.render_tabs(component));
        }

        let _ = write!(
            html,
            r#"<form method="post" action="{OPTIONS_ENDPOINT}">"#
        );
        let _ = write!(
            html,
            r#"<input type="hidden" name="option_page" value="{}" /><input type="hidden" name="action" value="update" />"#,
            esc_attr(&component.slug)
        );

        let stored = self.options.get(&component.slug)?.clone();
        for section in &self.sections {
            html.push_str(&render_section(&component.slug, section, &stored));
        }

        if component.has_field() {
            html.push_str(
                r#"<p class="submit"><input type="submit" name="submit" id="submit" class="button button-primary" value="Save Changes" /></p>"#,
            );
        }
        html.push_str("</form></div>");
        Ok(Some(html))
    }

    fn render_tabs(&self, active: &ComponentDescriptor) -> String {
        let mut html = String::from(r#"<h2 class="nav-tab-wrapper">"#);
        for tab in &self.config.components {
            if tab.slug.is_empty() {
                continue;
            }
            let class = if tab.slug == active.slug {
                "nav-tab nav-tab-active"
            } else {
                "nav-tab"
            };
            let _ = write!(
                html,
                r#"<a href="?page={}&amp;tab={}" class="{class}">{}</a>"#,
                esc_attr(&urlencoding::encode(&self.config.page_slug)),
                esc_attr(&urlencoding::encode(&tab.slug)),
                esc_html(&tab.label)
            );
        }
        html.push_str("</h2>");
        html
    }

    /// Sanitize a submitted blob against the schema of `option_page`.
    ///
    /// Fields the schema does not declare are dropped. When a field id is
    /// declared twice, the first declaration decides. Browsers omit checkbox
    /// groups with nothing checked, so a missing group is stored empty.
    pub fn sanitize(&self, option_page: &str, submitted: &Options) -> Option<Options> {
        let component = self.config.component(option_page)?;
        let mut clean = Options::new();
        for (key, raw) in submitted {
            let Some(field) = component.find_field(key) else {
                debug!("{option_page}: dropping undeclared field '{key}'");
                continue;
            };
            let Some(kind) = field.field_kind() else {
                debug!("{option_page}: dropping field '{key}' of unsupported type");
                continue;
            };
            clean.insert(key.clone(), kind.sanitize(field, raw));
        }
        for field in component.fields() {
            if clean.contains_key(&field.id) {
                continue;
            }
            let first = component.find_field(&field.id).unwrap_or(field);
            if first.field_kind() == Some(FieldKind::Checkboxes) {
                clean.insert(field.id.clone(), Value::Array(Vec::new()));
            }
        }
        Some(clean)
    }

    /// Sanitize and store a submission, replacing the component's whole blob.
    pub fn save(
        &mut self,
        user: &User,
        option_page: &str,
        submitted: &Options,
    ) -> Result<SaveOutcome, StoreError> {
        if !user.can(&self.config.capability) {
            info!("rejected settings update for '{option_page}' by '{}'", user.name);
            return Ok(SaveOutcome::Forbidden);
        }
        let Some(options) = self.sanitize(option_page, submitted) else {
            warn!("settings update for unknown option page '{option_page}'");
            return Ok(SaveOutcome::UnknownPage);
        };
        self.options.save(option_page, options.clone())?;
        info!("saved settings for '{option_page}'");
        Ok(SaveOutcome::Saved {
            slug: option_page.to_string(),
            options,
        })
    }
}

fn render_section(slug: &str, section: &RegisteredSection<'_>, stored: &Options) -> String {
    let mut html = format!("<h2>{}</h2>", esc_html(&section.title));
    if let Some(description) = &section.section.description {
        // Section descriptions are trusted markup from the component itself.
        html.push_str(description);
    }
    if section.fields.is_empty() {
        return html;
    }
    html.push_str(r#"<table class="form-table" role="presentation">"#);
    for registered in &section.fields {
        let value: Value = resolve_value(registered.field, stored);
        let _ = write!(
            html,
            r#"<tr><th scope="row"><label for="{}">{}</label></th><td>{}</td></tr>"#,
            esc_attr(&registered.label_for),
            esc_html(&registered.field.label),
            registered.kind.render(slug, registered.field, &value)
        );
    }
    html.push_str("</table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{schema::SectionSchema, store::MemoryStore};
    use serde_json::json;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn admin() -> User {
        User::new("admin", ["manage_options"])
    }

    fn opts(v: Value) -> Options {
        serde_json::from_value(v).unwrap()
    }

    fn example() -> ComponentDescriptor {
        ComponentDescriptor::new("example", "Example")
            .section(
                SectionSchema::new("global", "Global")
                    .field(
                        FieldSchema::new("color", "Box color", FieldKind::Select)
                            .choice("", "None")
                            .choice("teal", "Teal")
                            .choice("orchid", "Orchid")
                            .default_value("orchid"),
                    )
                    .field(FieldSchema::new("class", "Class name", FieldKind::Text)),
            )
            .section(SectionSchema::new("usage", "Usage").description("<p>Use it.</p>"))
            .section(
                SectionSchema::new("dummy", "Other")
                    .field(FieldSchema::new("count", "Count", FieldKind::Number))
                    .field(
                        FieldSchema::new("colors", "Colors", FieldKind::Checkboxes)
                            .choice("red", "Red")
                            .choice("green", "Green"),
                    ),
            )
    }

    fn docs() -> ComponentDescriptor {
        ComponentDescriptor::new("carousel", "Carousel")
            .section(SectionSchema::new("usage", "Instructions").description("<p>Docs.</p>"))
    }

    fn config() -> SettingsConfig {
        SettingsConfig {
            page_slug: "ocdutils".into(),
            capability: "manage_options".into(),
            page_title: "OCD Utils Settings".into(),
            menu_title: "OCD Utils".into(),
            components: vec![example(), docs()],
        }
    }

    #[test]
    fn test_default_tab_and_unknown_tab() {
        let config = config();
        let store = MemoryStore::default();
        assert_eq!(AdminSettings::new(&config, &store, None).component().unwrap().slug, "example");
        assert_eq!(
            AdminSettings::new(&config, &store, Some("bogus")).component().unwrap().slug,
            "example"
        );
        assert_eq!(
            AdminSettings::new(&config, &store, Some("carousel")).component().unwrap().slug,
            "carousel"
        );
    }

    #[test]
    fn test_registration() {
        init_logger();
        let mut config = config();
        let mut odd = FieldSchema::new("odd", "Odd", FieldKind::Text);
        odd.kind = "textarea".into();
        config.components[0].sections[0].fields.push(odd);
        config.components[0].sections.push(SectionSchema::default());

        let store = MemoryStore::default();
        let mut page = AdminSettings::new(&config, &store, None);
        assert!(page.admin_init(&admin()));
        assert_eq!(page.registered_settings().len(), 2);
        let sections = page.registered_sections();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].fields.len(), 2);
        assert_eq!(sections[0].fields[0].kind, FieldKind::Select);
        assert!(sections[1].fields.is_empty());
    }

    #[test]
    fn test_section_label_fallback() {
        let mut config = config();
        config.components[0].sections[0].label = None;
        let store = MemoryStore::default();
        let mut page = AdminSettings::new(&config, &store, None);
        page.admin_init(&admin());
        assert_eq!(page.registered_sections()[0].title, DEFAULT_SECTION_LABEL);
    }

    #[test]
    fn test_render_page() {
        let config = config();
        let store = MemoryStore::default()
            .with_blob("example", opts(json!({"class": "fancy", "colors": ["green"]})));
        let mut page = AdminSettings::new(&config, &store, None);
        let html = page.render_settings_page(&admin()).unwrap().unwrap();

        assert!(html.starts_with(r#"<div class="wrap"><h1>OCD Utils Settings</h1>"#));
        assert!(html.contains(
            r#"<a href="?page=ocdutils&amp;tab=example" class="nav-tab nav-tab-active">Example</a>"#
        ));
        assert!(html.contains(r#"<a href="?page=ocdutils&amp;tab=carousel" class="nav-tab">Carousel</a>"#));
        assert!(html.contains(r#"<form method="post" action="options.php">"#));
        assert!(html.contains(r#"name="option_page" value="example""#));
        assert!(html.contains(r#"<option value="orchid" selected="selected">"#));
        assert!(html.contains(r#"value="fancy""#));
        assert!(html.contains(r#"value="green" checked="checked""#));
        assert!(html.contains("<h2>Usage</h2><p>Use it.</p>"));
        assert!(html.contains(r#"<label for="count">Count</label>"#));
        assert!(html.contains(r#"type="submit""#));
    }

    #[test]
    fn test_docs_only_component_has_no_submit() {
        let config = config();
        let store = MemoryStore::default();
        let mut page = AdminSettings::new(&config, &store, Some("carousel"));
        let html = page.render_settings_page(&admin()).unwrap().unwrap();
        assert!(html.contains("<h2>Instructions</h2><p>Docs.</p>"));
        assert!(!html.contains(r#"type="submit""#));
        assert!(!html.contains("form-table"));
    }

    #[test]
    fn test_single_component_has_no_tabs() {
        let mut config = config();
        config.components.truncate(1);
        let store = MemoryStore::default();
        let mut page = AdminSettings::new(&config, &store, None);
        let html = page.render_settings_page(&admin()).unwrap().unwrap();
        assert!(!html.contains("nav-tab-wrapper"));
    }

    #[test]
    fn test_no_components() {
        let mut config = config();
        config.components.clear();
        let store = MemoryStore::default();
        let mut page = AdminSettings::new(&config, &store, Some("example"));
        page.add_notice("The component file for 'gone' is missing or not readable.");
        let html = page.render_settings_page(&admin()).unwrap().unwrap();
        assert!(html.contains("No settings are available."));
        assert!(html.contains("notice-error"));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn test_capability_gate() {
        let config = config();
        let store = MemoryStore::default();
        let visitor = User::new("editor", ["edit_pages"]);
        let mut page = AdminSettings::new(&config, &store, None);

        assert!(page.admin_menu(&visitor).is_none());
        assert!(!page.admin_init(&visitor));
        assert!(page.registered_sections().is_empty());
        assert_eq!(page.render_settings_page(&visitor).unwrap(), None);

        let outcome = page
            .save(&visitor, "example", &opts(json!({"class": "x"})))
            .unwrap();
        assert_eq!(outcome, SaveOutcome::Forbidden);
        assert_eq!(store.load("example").unwrap(), None);

        let entry = page.admin_menu(&admin()).unwrap();
        assert_eq!(entry.href(), "options-general.php?page=ocdutils");
    }

    #[test]
    fn test_tab_links_are_encoded() {
        let mut config = config();
        config.page_slug = "ocd utils".into();
        config.components[1].slug = "a b&c#d".into();
        let store = MemoryStore::default();
        let mut page = AdminSettings::new(&config, &store, None);
        let html = page.render_settings_page(&admin()).unwrap().unwrap();
        assert!(html.contains(r#"<a href="?page=ocd%20utils&amp;tab=a%20b%26c%23d" class="nav-tab">"#));
        assert_eq!(
            page.admin_menu(&admin()).unwrap().href(),
            "options-general.php?page=ocd%20utils"
        );
    }

    #[test]
    fn test_unchecked_group_is_stored_empty() {
        let mut config = config();
        config.components[0].sections[2].fields[1].default = Some(json!(["red"]));
        let store = MemoryStore::default();
        let mut page = AdminSettings::new(&config, &store, None);

        let outcome = page
            .save(&admin(), "example", &opts(json!({"class": "x"})))
            .unwrap();
        let expected = opts(json!({"class": "x", "colors": []}));
        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                slug: "example".into(),
                options: expected.clone()
            }
        );
        assert_eq!(store.load("example").unwrap(), Some(expected));

        let html = page.render_settings_page(&admin()).unwrap().unwrap();
        assert!(html.contains(r#"value="red" />"#));
        assert!(!html.contains("checked=\"checked\""));
    }

    #[test]
    fn test_duplicate_field_sanitized_by_first_declaration() {
        init_logger();
        let component = ComponentDescriptor::new("dup", "Dup")
            .section(
                SectionSchema::new("a", "A").field(FieldSchema::new("x", "X", FieldKind::Number)),
            )
            .section(
                SectionSchema::new("b", "B")
                    .field(FieldSchema::new("x", "X again", FieldKind::Text))
                    .field(FieldSchema::new("y", "Y", FieldKind::Text)),
            );
        assert_eq!(component.diagnostics().len(), 1);
        let mut config = config();
        config.components = vec![component];
        let store = MemoryStore::default();
        let page = AdminSettings::new(&config, &store, None);

        let clean = page.sanitize("dup", &opts(json!({"x": "12"}))).unwrap();
        assert_eq!(clean, opts(json!({"x": 12})));

        let clean = page.sanitize("dup", &opts(json!({"x": "<b>hi</b>"}))).unwrap();
        assert_eq!(clean, opts(json!({"x": 0})));
    }

    #[test]
    fn test_save_sanitizes_and_replaces() {
        let config = config();
        let store = MemoryStore::default()
            .with_blob("example", opts(json!({"class": "old", "count": 3})));
        let mut page = AdminSettings::new(&config, &store, None);

        let submitted = opts(json!({
            "color": "mauve",
            "count": "12.5",
            "colors": ["red", "nonexistent"],
            "class": "<b>new</b>",
            "injected": "value",
        }));
        let outcome = page.save(&admin(), "example", &submitted).unwrap();
        let expected = opts(json!({
            "color": "",
            "count": 12.5,
            "colors": ["red"],
            "class": "new",
        }));
        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                slug: "example".into(),
                options: expected.clone()
            }
        );
        assert_eq!(store.load("example").unwrap(), Some(expected));

        let html = page.render_settings_page(&admin()).unwrap().unwrap();
        assert!(html.contains(r#"value="new""#));
    }

    #[test]
    fn test_save_unknown_page() {
        let config = config();
        let store = MemoryStore::default();
        let mut page = AdminSettings::new(&config, &store, None);
        let outcome = page.save(&admin(), "nope", &Options::new()).unwrap();
        assert_eq!(outcome, SaveOutcome::UnknownPage);
        assert_eq!(store.load("nope").unwrap(), None);
    }

    #[test]
    fn test_updated_notice() {
        let config = config();
        let store = MemoryStore::default();
        let mut page = AdminSettings::new(&config, &store, None);
        page.mark_updated();
        let html = page.render_settings_page(&admin()).unwrap().unwrap();
        assert!(html.contains("Settings saved."));
    }
}
