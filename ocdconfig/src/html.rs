//! HTML escaping and tag stripping.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*?>.*?</script\s*>").unwrap());
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*?>.*?</style\s*>").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*(>|$)").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n\t ]+").unwrap());
static PERCENT_OCTET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)%[a-f0-9]{2}").unwrap());

/// Escape text for use between tags.
pub fn esc_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape text for use inside a double-quoted attribute.
pub fn esc_attr(s: &str) -> String {
    esc_html(s)
}

/// Encode every `<` that does not open a tag, so it survives tag stripping.
fn encode_lone_less_than(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let closes = after.find('>');
        let reopens = after.find('<');
        let is_tag = match (closes, reopens) {
            (Some(c), Some(r)) => c < r,
            (Some(_), None) => true,
            (None, _) => false,
        };
        out.push_str(if is_tag { "<" } else { "&lt;" });
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Remove every tag, including the contents of `script` and `style` blocks.
pub fn strip_all_tags(s: &str) -> String {
    let s = SCRIPT_BLOCK.replace_all(s, "");
    let s = STYLE_BLOCK.replace_all(&s, "");
    TAG.replace_all(&s, "").into_owned()
}

/// Sanitize a single-line text value.
///
/// Strips tags, collapses line breaks, tabs and runs of spaces, trims, and
/// removes percent-encoded octets.
pub fn sanitize_text_field(s: &str) -> String {
    let mut filtered = s.to_string();
    if filtered.contains('<') {
        filtered = encode_lone_less_than(&filtered);
        filtered = strip_all_tags(&filtered);
    }
    filtered = WHITESPACE_RUN.replace_all(&filtered, " ").into_owned();
    filtered = filtered.trim().to_string();

    let mut found = false;
    while PERCENT_OCTET.is_match(&filtered) {
        filtered = PERCENT_OCTET.replace_all(&filtered, "").into_owned();
        found = true;
    }
    if found {
        filtered = WHITESPACE_RUN
            .replace_all(filtered.trim(), " ")
            .into_owned();
    }
    filtered
}
