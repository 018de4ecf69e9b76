//! Child page list for empty pages.

use std::fmt::Write;

use ocdconfig::html::{esc_attr, esc_html};

use super::Page;

/// Body of `page` on the front end.
///
/// An empty page body is replaced by a list of the page's descendants,
/// oldest first. Non-empty bodies, admin screens and other post types are
/// left alone, as are pages without children.
pub fn subpages_list(content: &str, page: &Page, pages: &[Page], is_admin: bool) -> String {
    if !page.is_page() || is_admin || !content.is_empty() {
        return content.to_string();
    }
    let items = list_children(page.id, pages, 0);
    if items.is_empty() {
        return String::new();
    }
    format!("<ul>{items}</ul>")
}

fn children_of(parent: u64, pages: &[Page]) -> Vec<&Page> {
    let mut children = pages
        .iter()
        .filter(|p| p.is_page() && p.parent == parent && p.id != parent)
        .collect::<Vec<_>>();
    children.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    children
}

fn list_children(parent: u64, pages: &[Page], depth: usize) -> String {
    let mut html = String::new();
    if depth > pages.len() {
        return html;
    }
    for child in children_of(parent, pages) {
        let nested = list_children(child.id, pages, depth + 1);
        let class = if nested.is_empty() {
            format!("page_item page-item-{}", child.id)
        } else {
            format!("page_item page-item-{} page_item_has_children", child.id)
        };
        let _ = write!(
            html,
            r#"<li class="{class}"><a href="{}">{}</a>"#,
            esc_attr(&child.permalink),
            esc_html(&child.title)
        );
        if !nested.is_empty() {
            let _ = write!(html, r#"<ul class="children">{nested}</ul>"#);
        }
        html.push_str("</li>");
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(id: u64, parent: u64, slug: &str, title: &str, date: &str) -> Page {
        let mut page = Page::new(id, slug, title);
        page.parent = parent;
        page.date = date.to_string();
        page
    }

    fn site() -> Vec<Page> {
        vec![
            Page::new(1, "services", "Services"),
            child(2, 1, "design", "Design", "2024-03-01 10:00:00"),
            child(3, 1, "hosting", "Hosting & Care", "2024-01-15 09:00:00"),
            child(4, 2, "logos", "Logos", "2024-04-01 00:00:00"),
            Page::new(5, "contact", "Contact"),
        ]
    }

    #[test]
    fn test_empty_page_lists_children() {
        let pages = site();
        let html = subpages_list("", &pages[0], &pages, false);
        assert_eq!(
            html,
            concat!(
                r#"<ul><li class="page_item page-item-3"><a href="/hosting/">Hosting &amp; Care</a></li>"#,
                r#"<li class="page_item page-item-2 page_item_has_children"><a href="/design/">Design</a>"#,
                r#"<ul class="children"><li class="page_item page-item-4"><a href="/logos/">Logos</a></li></ul>"#,
                r#"</li></ul>"#
            )
        );
    }

    #[test]
    fn test_left_alone() {
        let pages = site();
        assert_eq!(subpages_list("<p>Hi</p>", &pages[0], &pages, false), "<p>Hi</p>");
        assert_eq!(subpages_list("", &pages[0], &pages, true), "");
        assert_eq!(subpages_list("", &pages[4], &pages, false), "");

        let mut post = pages[0].clone();
        post.post_type = "post".into();
        assert_eq!(subpages_list("", &post, &pages, false), "");
    }
}
