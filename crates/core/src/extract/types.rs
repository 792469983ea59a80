use serde::{Deserialize, Serialize};

/// A single file decoded from a model response.
///
/// The path is exactly what the model produced. It has not been validated yet;
/// see [`crate::project::ProjectPath`] for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub content: String,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// How multi-file output is encoded inside a single completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// `===PAGE: name.html===` sentinel lines, then HTML comment markers,
    /// then the whole text as `index.html`.
    #[default]
    Marker,
    /// A `{"files": [{"path", "content"}]}` JSON object.
    Envelope,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Marker => write!(f, "marker"),
            Strategy::Envelope => write!(f, "envelope"),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "marker" => Ok(Strategy::Marker),
            "envelope" | "json" => Ok(Strategy::Envelope),
            other => Err(format!(
                "Unknown extraction strategy '{other}' (expected 'marker' or 'envelope')"
            )),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no JSON object could be recovered from the model output")]
    Unparseable,

    #[error("JSON output has no \"files\" array")]
    MissingFiles,
}
