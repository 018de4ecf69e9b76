//! Search form styled from the settings tab.

use ocdconfig::{ComponentDescriptor, FieldKind, FieldSchema, SectionSchema};

use super::Component;
use crate::config::SiteConfig;

const USAGE: &str = r##"<div>
<h4>Shortcode</h4>
<p>This shortcode has 6 options: <code>[ocd_simple_search_form color_background="#ffffff" color_text="black" color_border="gray" color_button="#cccccc" color_icon="white" class="my-special-class"]</code><br />The color attributes can be a hex color or a css named color.</p>
<p>The shortcode attributes can be used to configure the output on a per-instance basis.</p>
<p>Omit all attributes to output the default configuration specified in the global settings above: <code>[ocd_simple_search_form]</code></p>
</div>"##;

pub struct SimpleSearchForm;

impl Component for SimpleSearchForm {
    fn slug(&self) -> &str {
        "simple_search_form"
    }

    fn label(&self) -> &str {
        "Simple Search Form"
    }

    fn descriptor(&self, _site: &SiteConfig) -> ComponentDescriptor {
        let color = |id: &str, label: &str, default: &str| {
            FieldSchema::new(id, label, FieldKind::Color).default_value(default)
        };
        ComponentDescriptor::new(self.slug(), self.label())
            .section(
                SectionSchema::new("global", r#"Global Settings for "Simple Search Form""#)
                    .field(color("color_background", "Background Color", "#ffffff"))
                    .field(color("color_text", "Text Color", "#222222"))
                    .field(color("color_border", "Border Color", "#cccccc"))
                    .field(color("color_button", "Button Background Color", "#dddddd"))
                    .field(color("color_icon", "Button Icon Color", "#222222"))
                    .field(FieldSchema::new("font_size", "Font Size", FieldKind::Number).min(1.0))
                    .field(FieldSchema::new("class", "Class name", FieldKind::Text)),
            )
            .section(SectionSchema::new("usage", "Usage Instructions").description(USAGE))
    }
}
