use regex::Regex;
use std::sync::LazyLock;

use super::id::ProjectId;

// `<head>` or `<head attr=...>`, but not `<header>`.
static HEAD_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<head(?:\s[^>]*)?>").unwrap());

/// `<base>` tag that makes relative links resolve inside the served project.
pub fn base_tag(id: &ProjectId) -> String {
    format!(r#"<base href="/generated_projects/{id}/">"#)
}

/// Insert the project's `<base>` tag right after the first `<head>` tag.
///
/// Documents without a head get a minimal `<head>` prefix holding the tag.
pub fn inject_base_href(html: &str, id: &ProjectId) -> String {
    let tag = base_tag(id);

    match HEAD_TAG.find(html) {
        Some(head) => {
            let mut out = String::with_capacity(html.len() + tag.len());
            out.push_str(&html[..head.end()]);
            out.push_str(&tag);
            out.push_str(&html[head.end()..]);
            out
        }
        None => format!("<head>{tag}</head>{html}"),
    }
}
