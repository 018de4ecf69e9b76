//! Demonstration component showing every field kind.

use ocdconfig::{ComponentDescriptor, FieldKind, FieldSchema, SectionSchema};

use super::Component;
use crate::config::SiteConfig;

const USAGE: &str = r#"<div>
<h4>Options</h4>
<p>The above settings are global; they apply uniformly across all instances of this component output.</p>
<h4>Shortcode</h4>
<p>This example provides a shortcode with 2 options: <code>[ocd_example_component color="red" class="my-special-class"]</code></p>
<p>The shortcode attributes can be used to configure the output on a per-instance basis.</p>
<p>Omit all attributes to output the default configuration specified in the global settings above: <code>[ocd_example_component]</code></p>
</div>"#;

const BOX_COLORS: [(&str, &str); 10] = [
    ("", "None"),
    ("teal", "Teal"),
    ("purple", "Purple"),
    ("cyan", "Cyan"),
    ("magenta", "Magenta"),
    ("salmon", "Salmon"),
    ("orchid", "Orchid"),
    ("violet", "Violet"),
    ("turquoise", "Turquoise"),
    ("crimson", "Crimson"),
];

pub struct ExampleComponent;

impl Component for ExampleComponent {
    fn slug(&self) -> &str {
        "example_component"
    }

    fn label(&self) -> &str {
        "Example Component"
    }

    fn descriptor(&self, _site: &SiteConfig) -> ComponentDescriptor {
        ComponentDescriptor::new(self.slug(), "Example")
            .section(
                SectionSchema::new("global", r#"Global Settings for "Example Component""#)
                    .field(
                        FieldSchema::new("color", "Box color", FieldKind::Select)
                            .description(
                                "Default color of the box. This is used if no color is specified in the shortcode.",
                            )
                            .default_value("orchid")
                            .choices(BOX_COLORS.into_iter().collect()),
                    )
                    .field(
                        FieldSchema::new("class", "Class name", FieldKind::Text).description(
                            "Adds an extra class name to the output div. It is added in addition to the class name given in the shortcode, if any.",
                        ),
                    ),
            )
            .section(SectionSchema::new("usage", "Component Usage Instructions").description(USAGE))
            .section(
                SectionSchema::new("dummy", r#"Other Settings for "Example Component""#)
                    .description(
                        "These do nothing in this example. This is just to show the field types available.",
                    )
                    .field(
                        FieldSchema::new("number_field_a", "Number of Items", FieldKind::Number)
                            .description("Set the number of items you want to show.")
                            .required()
                            .class("class-for-field-input-element")
                            .min(1.0)
                            .max(100.0)
                            .step(4.0),
                    )
                    .field(
                        FieldSchema::new("radio_a", "Favorite Food", FieldKind::Radio)
                            .description("Choose your favorite food.")
                            .default_value("soup")
                            .choice("hot_dog", "Hot Dog")
                            .choice("hamburger", "Hamburger")
                            .choice("taco", "Taco")
                            .choice("soup", "Soup")
                            .choice("spaghetti", "Spaghetti"),
                    )
                    .field(
                        FieldSchema::new("checkboxes_a", "Pretty Colors", FieldKind::Checkboxes)
                            .description("Choose the colors you like.")
                            .choice("red", "Red")
                            .choice("green", "Green")
                            .choice("blue", "Blue"),
                    )
                    .field(
                        FieldSchema::new("select_a", "Direction", FieldKind::Select)
                            .description("Which way did he go, George?")
                            .choice("", "Choose a Direction")
                            .choice("up", "Up")
                            .choice("down", "Down")
                            .choice("left", "Left")
                            .choice("right", "Right")
                            .choice("dont_know", "I Have No Idea"),
                    )
                    .field(FieldSchema::new("text_a", "A Required String", FieldKind::Text).required()),
            )
    }
}
