//! Filterable project portfolio.
//!
//! The page and post type choices come from the site section of the
//! configuration.

use ocdconfig::{Choices, ComponentDescriptor, FieldKind, FieldSchema, SectionSchema};

use super::Component;
use crate::config::SiteConfig;

const USAGE: &str = r#"<div>
<h4>Attributes</h4>
<ul>
<li><strong>limit</strong>: Number of items to show in the grid. Default is <code>-1</code> (Show all)</li>
<li><strong>show_filters</strong>: Add buttons at the top for filtering by category. Default is <code>true</code></li>
<li><strong>category_slugs</strong>: A comma-separated list of category slugs from which to show items. Default is <code>""</code> (Show all)</li>
</ul>
<h4>Examples</h4>
<p><code>[ocd_filter_portfolio]</code> All default settings.</p>
<p><code>[ocd_filter_portfolio limit="6" show_filters="false" category_slugs="category-abc, category-qrs, category-xyz"]</code></p>
<p><code>[ocd_filter_portfolio limit="21" show_filters="true"]</code></p>
</div>"#;

pub struct FilterPortfolio;

/// `choices` preceded by an empty placeholder entry.
fn with_placeholder(placeholder: &str, choices: &Choices) -> Choices {
    std::iter::once(("", placeholder))
        .chain(choices.iter().filter(|(value, _)| !value.is_empty()))
        .collect()
}

impl Component for FilterPortfolio {
    fn slug(&self) -> &str {
        "filter_portfolio"
    }

    fn label(&self) -> &str {
        "Filter Portfolio"
    }

    fn descriptor(&self, site: &SiteConfig) -> ComponentDescriptor {
        ComponentDescriptor::new(self.slug(), self.label())
            .section(
                SectionSchema::new("portfolio", "Portfolio Settings")
                    .field(
                        FieldSchema::new("portfolio_page_id", "Portfolio Page", FieldKind::Select)
                            .description(
                                "Choose the page that contains your full portfolio with filters. Other small portfolio shortcodes will link to this main one.",
                            )
                            .choices(with_placeholder("--Select a Page--", &site.pages)),
                    )
                    .field(
                        FieldSchema::new("projects_post_type", "Projects Post Type", FieldKind::Select)
                            .description(
                                r#"Choose the post type that is used for your projects in your portfolio. You should use a post type that supports "title", "editor", and "thumbnail". Default is "Projects"."#,
                            )
                            .default_value("project")
                            .choices(with_placeholder("--Select a Post Type--", &site.post_types)),
                    ),
            )
            .section(SectionSchema::new("usage", "Shortcode Instructions").description(USAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_choices() {
        let mut site = SiteConfig::default();
        site.pages.insert("12", "Portfolio");
        let descriptor = FilterPortfolio.descriptor(&site);

        let page = descriptor.find_field("portfolio_page_id").unwrap();
        assert_eq!(
            page.options.iter().collect::<Vec<_>>(),
            [("", "--Select a Page--"), ("12", "Portfolio")]
        );
        let post_type = descriptor.find_field("projects_post_type").unwrap();
        assert_eq!(post_type.options.keys().next(), Some(""));
        assert!(post_type.options.contains_key("project"));
        assert_eq!(descriptor.default_values()["projects_post_type"], "project");
    }
}
