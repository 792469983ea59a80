use serde::Serialize;

use super::error::PathError;

/// Opaque short token naming one generated project.
///
/// The same token names the project directory and its archive, so it is
/// restricted to characters that are safe as a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Longest id accepted by [`ProjectId::parse`].
    pub const MAX_LEN: usize = 64;

    /// Build a 10 character id from random bytes.
    pub fn from_entropy(bytes: [u8; 5]) -> Self {
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Validate an id received from a client.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let valid = !raw.is_empty()
            && raw.len() <= Self::MAX_LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(PathError::InvalidProjectId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the archive stored next to the project directory.
    pub fn archive_name(&self) -> String {
        format!("{}.zip", self.0)
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
