pub mod cards;
pub mod coin;
pub mod controls;
pub mod page;

pub use cards::{card_template, failure_placeholder, render_grid, CardTemplate};
pub use controls::{controls, render_controls, PageControl};
pub use page::{HostPage, Slot};

/// Minimal five-character escaping, applied to every interpolated field
/// (text and attribute values alike).
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped `href` value for a record link. Relative links, fragments and
/// `http`/`https` URLs pass; any other scheme collapses to `#`.
pub fn safe_href(link: &str) -> String {
    let link = link.trim();
    // browsers drop tabs and newlines inside a URL before reading the scheme
    let compact: String = link
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();
    let scheme = compact
        .split_once(':')
        .map(|(head, _)| head)
        .filter(|head| {
            head.starts_with(|c: char| c.is_ascii_alphabetic())
                && head
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        });
    match scheme {
        Some(s) if !s.eq_ignore_ascii_case("http") && !s.eq_ignore_ascii_case("https") => {
            "#".to_string()
        }
        _ => escape_html(link),
    }
}

/// Class-name fragment for a tag: lower-cased with whitespace removed and
/// anything outside `[a-z0-9_-]` dropped.
pub fn css_class(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}
