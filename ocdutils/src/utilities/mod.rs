//! Content filters that work on the site's pages.
//!
//! - [`subpages`] - list child pages in place of an empty page body
//! - [`frontend_link`] - shortened view link and builder link in page rows

pub mod frontend_link;
pub mod subpages;

/// A page of the site, as far as the filters need it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub id: u64,
    /// Id of the parent page, `0` for top-level pages.
    pub parent: u64,
    /// URL slug of the page itself.
    pub slug: String,
    pub title: String,
    pub permalink: String,
    /// `page`, `post` or a custom post type.
    pub post_type: String,
    /// Publication date, `YYYY-MM-DD HH:MM:SS`.
    pub date: String,
    pub content: String,
    /// Whether the page is edited with the Divi builder.
    pub uses_builder: bool,
}

impl Page {
    pub fn new(id: u64, slug: impl Into<String>, title: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            id,
            permalink: format!("/{slug}/"),
            slug,
            title: title.into(),
            post_type: "page".to_string(),
            ..Default::default()
        }
    }

    pub fn is_page(&self) -> bool {
        self.post_type == "page"
    }

    /// Slash-separated slugs of the ancestors and the page itself.
    pub fn uri(&self, pages: &[Page]) -> String {
        let mut slugs = vec![self.slug.as_str()];
        let mut parent = self.parent;
        // A broken parent chain must not loop forever.
        while parent != 0 && slugs.len() <= pages.len() {
            let Some(p) = pages.iter().find(|p| p.id == parent) else {
                break;
            };
            slugs.push(p.slug.as_str());
            parent = p.parent;
        }
        slugs.reverse();
        slugs.join("/")
    }
}

/// Active theme, with the theme it inherits from if it is a child theme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub parent: Option<String>,
}

impl Theme {
    /// Name of the parent theme, or of the theme itself.
    pub fn base_name(&self) -> &str {
        self.parent.as_deref().unwrap_or(&self.name).trim()
    }
}
