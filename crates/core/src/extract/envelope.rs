use serde_json::Value;

use super::types::{ExtractError, FileEntry};

/// Decode files from a `{"files": [{"path": ..., "content": ...}]}` response.
///
/// The whole text is parsed first. If that fails, the span between the first
/// `{` and the last `}` is parsed, trimming trailing characters until some
/// prefix of it is valid JSON. Elements missing `path` or `content` are
/// dropped.
pub fn extract_envelope(response: &str) -> Result<Vec<FileEntry>, ExtractError> {
    let value = parse_json_object(response).ok_or(ExtractError::Unparseable)?;

    let files = value
        .get("files")
        .and_then(Value::as_array)
        .ok_or(ExtractError::MissingFiles)?;

    Ok(files.iter().filter_map(file_entry).collect())
}

/// Parse `text` as JSON, falling back to brace trimming.
pub fn parse_json_object(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text.trim()) {
        if value.is_object() {
            return Some(value);
        }
    }

    let start = text.find('{')?;
    let mut end = text.rfind('}')?;
    if end < start {
        return None;
    }

    // Only candidates ending in '}' can be objects, so each step jumps back to
    // the previous closing brace.
    loop {
        let candidate = &text[start..=end];
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            if value.is_object() {
                return Some(value);
            }
        }
        end = candidate[..candidate.len() - 1].rfind('}').map(|i| start + i)?;
    }
}

fn file_entry(value: &Value) -> Option<FileEntry> {
    let path = value.get("path")?.as_str()?;
    let content = value.get("content")?.as_str()?;
    Some(FileEntry::new(path, content))
}
