//! Field markup by kind.

use std::fmt::Write;

use serde_json::Value;

use crate::{
    data::field::{FieldKind, FieldSchema, scalar_text},
    html::{esc_attr, esc_html},
};

/// Form name of a field: `slug[id]`.
pub fn field_name(slug: &str, field: &FieldSchema) -> String {
    format!("{slug}[{}]", field.id)
}

fn format_limit(v: f64) -> String {
    format!("{v}")
}

/// Shared attributes of single-element inputs.
fn field_atts(slug: &str, field: &FieldSchema, class: Option<&str>) -> String {
    let mut atts = String::new();
    let _ = write!(atts, r#" id="{}""#, esc_attr(&field.id));
    let _ = write!(atts, r#" name="{}""#, esc_attr(&field_name(slug, field)));
    if let Some(class) = class.filter(|c| !c.is_empty()) {
        let _ = write!(atts, r#" class="{}""#, esc_attr(class));
    }
    if field.required {
        atts.push_str(r#" required="required""#);
    }
    for (name, limit) in [("min", field.min), ("max", field.max), ("step", field.step)] {
        if let Some(limit) = limit {
            let _ = write!(atts, r#" {name}="{}""#, esc_attr(&format_limit(limit)));
        }
    }
    atts
}

fn value_att(value: &Value) -> String {
    match scalar_text(value).filter(|s| !s.is_empty()) {
        Some(s) => format!(r#" value="{}""#, esc_attr(&s)),
        None => String::new(),
    }
}

fn description(field: &FieldSchema) -> String {
    match field.description.as_deref().filter(|d| !d.is_empty()) {
        Some(d) => format!(r#"<p class="description">{}</p>"#, esc_html(d)),
        None => String::new(),
    }
}

fn legend(field: &FieldSchema) -> String {
    format!(
        r#"<fieldset><legend class="screen-reader-text"><span>{}</span></legend>"#,
        esc_html(&field.label)
    )
}

impl FieldKind {
    /// Markup of `field` holding `value` inside the form of component `slug`.
    pub fn render(self, slug: &str, field: &FieldSchema, value: &Value) -> String {
        match self {
            FieldKind::Text => render_text(slug, field, value),
            FieldKind::Number => render_number(slug, field, value),
            FieldKind::Select => render_select(slug, field, value),
            FieldKind::Checkboxes => render_checkboxes(slug, field, value),
            FieldKind::Radio => render_radio(slug, field, value),
            FieldKind::Color => render_color(slug, field, value),
        }
    }
}

fn render_text(slug: &str, field: &FieldSchema, value: &Value) -> String {
    let class = field
        .class
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or("regular-text");
    format!(
        r#"<input type="text"{}{} />{}"#,
        field_atts(slug, field, Some(class)),
        value_att(value),
        description(field)
    )
}

fn render_number(slug: &str, field: &FieldSchema, value: &Value) -> String {
    let class = format!("small-text {}", field.class.as_deref().unwrap_or(""));
    format!(
        r#"<input type="number"{}{} />{}"#,
        field_atts(slug, field, Some(class.trim())),
        value_att(value),
        description(field)
    )
}

fn render_color(slug: &str, field: &FieldSchema, value: &Value) -> String {
    let mut atts = field_atts(slug, field, field.class.as_deref());
    if let Some(default) = field.default.as_ref().and_then(scalar_text) {
        let _ = write!(atts, r#" data-default-color="{}""#, esc_attr(&default));
    }
    format!(
        r#"<input type="color"{}{} />{}"#,
        atts,
        value_att(value),
        description(field)
    )
}

fn render_select(slug: &str, field: &FieldSchema, value: &Value) -> String {
    let selected = scalar_text(value);
    let mut html = format!("<select{}>", field_atts(slug, field, field.class.as_deref()));
    for (key, label) in field.options.iter() {
        let mark = if selected.as_deref() == Some(key) {
            r#" selected="selected""#
        } else {
            ""
        };
        let _ = write!(
            html,
            r#"<option value="{}"{mark}>{}</option>"#,
            esc_attr(key),
            esc_html(label)
        );
    }
    html.push_str("</select>");
    html.push_str(&description(field));
    html
}

fn render_checkboxes(slug: &str, field: &FieldSchema, value: &Value) -> String {
    let checked: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    };
    let name = field_name(slug, field);
    let mut html = legend(field);
    for (key, label) in field.options.iter() {
        let id = format!("{name}{key}");
        let mark = if checked.iter().any(|c| c == key) {
            r#" checked="checked""#
        } else {
            ""
        };
        let _ = write!(
            html,
            r#"<label for="{id}"><input type="checkbox" name="{name}[]" id="{id}" value="{value}"{mark} />{label}</label><br />"#,
            id = esc_attr(&id),
            name = esc_attr(&name),
            value = esc_attr(key),
            label = esc_html(label),
        );
    }
    html.push_str(&description(field));
    html.push_str("</fieldset>");
    html
}

fn render_radio(slug: &str, field: &FieldSchema, value: &Value) -> String {
    let selected = scalar_text(value);
    let name = esc_attr(&field_name(slug, field));
    let required = if field.required {
        r#" required="required""#
    } else {
        ""
    };
    let mut html = legend(field);
    html.push_str("<p>");
    for (key, label) in field.options.iter() {
        let mark = if selected.as_deref() == Some(key) {
            r#" checked="checked""#
        } else {
            ""
        };
        let _ = write!(
            html,
            r#"<label><input type="radio" name="{name}" value="{}"{mark}{required} />{}</label><br />"#,
            esc_attr(key),
            esc_html(label)
        );
    }
    html.push_str("</p>");
    html.push_str(&description(field));
    html.push_str("</fieldset>");
    html
}
