use regex::Regex;
use std::sync::LazyLock;

use super::types::FileEntry;

// Not anchored to lines: models put sentinels inline with the page markup.
static PAGE_SENTINEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=+[ \t]*PAGE:[ \t]*([^=\r\n]+?)[ \t]*=+").unwrap());

static SECTION_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!--\s*(?:PAGE|Section)\s*:\s*(.*?)\s*-->").unwrap());

/// Decode pages from a marker-delimited model response.
///
/// Tries, in order:
///
/// 1. `===PAGE: <filename>===` sentinels, wherever they appear. Every sentinel
///    starts a page that runs from its closing `=` until the next sentinel or
///    the end of the text.
/// 2. `<!-- PAGE: name -->` / `<!-- Section: name -->` comments. The file name is
///    derived from the captured name.
/// 3. The whole text as a single `index.html`.
///
/// This strategy never fails. Anything before the first marker is discarded.
pub fn extract_marker(response: &str) -> Vec<FileEntry> {
    let text = strip_commentary(response);

    let pages = split_on_sentinels(&text);
    if !pages.is_empty() {
        return pages;
    }

    let sections = split_on_section_comments(&text);
    if !sections.is_empty() {
        return sections;
    }

    vec![FileEntry::new("index.html", text)]
}

/// Remove markdown fences and trailing `###` commentary.
fn strip_commentary(response: &str) -> String {
    let text = response.replace("```html", "").replace("```", "");
    let text = text.split("###").next().unwrap_or_default();
    text.trim().to_string()
}

fn split_on_sentinels(text: &str) -> Vec<FileEntry> {
    let markers: Vec<_> = PAGE_SENTINEL
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(0)?, caps.get(1)?.as_str().trim().to_string())))
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, (whole, name))| {
            let end = markers
                .get(i + 1)
                .map(|(next, _)| next.start())
                .unwrap_or(text.len());
            FileEntry::new(
                with_default_extension(name),
                text[whole.end()..end].trim(),
            )
        })
        .collect()
}

fn split_on_section_comments(text: &str) -> Vec<FileEntry> {
    let markers: Vec<_> = SECTION_COMMENT
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(0)?, caps.get(1)?.as_str().to_string())))
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, (whole, name))| {
            let end = markers
                .get(i + 1)
                .map(|(next, _)| next.start())
                .unwrap_or(text.len());
            FileEntry::new(section_file_name(name), text[whole.end()..end].trim())
        })
        .collect()
}

/// "Sign Up" -> "sign_up.html"
pub fn section_file_name(name: &str) -> String {
    let normalized = name.trim().to_lowercase().replace(' ', "_");
    if normalized.is_empty() {
        return "index.html".to_string();
    }
    with_default_extension(&normalized)
}

/// Append `.html` when the last path segment has no extension.
fn with_default_extension(name: &str) -> String {
    let last = name.rsplit('/').next().unwrap_or(name);
    if last.contains('.') {
        name.to_string()
    } else {
        format!("{name}.html")
    }
}
