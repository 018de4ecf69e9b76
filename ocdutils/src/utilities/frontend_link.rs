//! Row actions of the page list.

use super::{Page, Theme};

/// Longest URI segment shown in full.
const SEGMENT_LEN: usize = 12;

/// Ordered `name => markup` actions of one row in the page list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowActions(Vec<(String, String)>);

impl RowActions {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, markup)| markup.as_str())
    }

    /// Set an action, keeping its position if it already exists.
    pub fn set(&mut self, name: impl Into<String>, markup: impl Into<String>) {
        let name = name.into();
        let markup = markup.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = markup,
            None => self.0.push((name, markup)),
        }
    }

    /// Append markup to an action, creating it when missing.
    pub fn append(&mut self, name: &str, markup: &str) {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1.push_str(markup),
            None => self.0.push((name.to_string(), markup.to_string())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, m)| (n.as_str(), m.as_str()))
    }
}

impl<N: Into<String>, M: Into<String>> FromIterator<(N, M)> for RowActions {
    fn from_iter<T: IntoIterator<Item = (N, M)>>(iter: T) -> Self {
        let mut actions = RowActions::default();
        for (name, markup) in iter {
            actions.set(name, markup);
        }
        actions
    }
}

/// `uri` with every segment longer than 12 characters cut to 12 plus `...`.
fn shorten_uri(uri: &str) -> String {
    uri.trim_matches(|c: char| c.is_whitespace() || c == '/' || c == '\0')
        .split('/')
        .map(|segment| {
            if segment.chars().count() > SEGMENT_LEN {
                let mut short = segment.chars().take(SEGMENT_LEN).collect::<String>();
                short.push_str("...");
                short
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Row actions of `page` in the page list.
///
/// The view action shows the page's shortened URI. Builder pages get a
/// "Frontend" link after the edit action while the Divi theme is active.
pub fn frontend_link(mut actions: RowActions, page: &Page, pages: &[Page], theme: &Theme) -> RowActions {
    let uri = page.uri(pages);
    if uri.len() < 3 {
        return actions;
    }

    actions.set(
        "view",
        format!(
            r#"<a href="{}" target="_blank">/{}/</a>"#,
            page.permalink,
            shorten_uri(&uri)
        ),
    );

    if !page.uses_builder || theme.base_name() != "Divi" {
        return actions;
    }
    let separator = if page.permalink.contains('?') { '&' } else { '?' };
    actions.append(
        "edit",
        &format!(
            r#" <a href="{}{separator}et_fb=1&PageSpeed=off" target="_blank" style="font-weight: bold;">Frontend</a>"#,
            page.permalink
        ),
    );
    actions
}
