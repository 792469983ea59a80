use std::path::PathBuf;

use super::error::PathError;

/// A relative path that is guaranteed to stay inside a project directory.
///
/// Always stored as `/`-separated normal segments: no empty, `.` or `..`
/// segments, no leading slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectPath(String);

impl ProjectPath {
    /// Normalize `raw` segment by segment.
    ///
    /// Leading slashes are stripped, `.` and empty segments are dropped and `..`
    /// removes the previous segment. A `..` that would climb above the root is
    /// an error rather than being silently clamped.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.contains('\\') || raw.contains('\0') {
            return Err(PathError::ForbiddenCharacter(raw.to_string()));
        }

        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.trim().split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(PathError::EscapesRoot(raw.to_string()));
                    }
                }
                s => {
                    if s.contains(':') {
                        return Err(PathError::DrivePrefix(raw.to_string()));
                    }
                    segments.push(s);
                }
            }
        }

        if segments.is_empty() {
            return Err(PathError::Empty);
        }

        Ok(Self(segments.join("/")))
    }

    /// A single plain file name such as `index.html`.
    pub(crate) fn file_name(name: &'static str) -> Self {
        debug_assert!(!name.is_empty() && !name.contains('/') && name != "." && name != "..");
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_html(&self) -> bool {
        self.0.to_ascii_lowercase().ends_with(".html")
    }

    /// Platform path relative to the project directory.
    pub fn to_relative_path(&self) -> PathBuf {
        self.0.split('/').collect()
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Component, Path};

    fn parse(raw: &str) -> Result<String, PathError> {
        ProjectPath::parse(raw).map(|p| p.as_str().to_string())
    }

    #[test]
    fn test_plain_paths() {
        assert_eq!(parse("index.html").unwrap(), "index.html");
        assert_eq!(parse("css/site.css").unwrap(), "css/site.css");
    }

    #[test]
    fn test_leading_slash_and_dot_segments() {
        assert_eq!(parse("/index.html").unwrap(), "index.html");
        assert_eq!(parse("./js//app.js").unwrap(), "js/app.js");
        assert_eq!(parse("pages/../about.html").unwrap(), "about.html");
    }

    #[test]
    fn test_traversal_never_leaves_root() {
        assert_eq!(
            parse("../../etc/passwd"),
            Err(PathError::EscapesRoot("../../etc/passwd".to_string()))
        );
        assert!(parse("a/../../b").is_err());
        assert!(parse("/../secret").is_err());
    }

    #[test]
    fn test_crafted_dots_are_plain_names() {
        // Substring stripping would turn these into traversals; as segments they
        // are just odd file names.
        assert_eq!(parse("....//x.html").unwrap(), "..../x.html");
        assert_eq!(parse("..../..../x").unwrap(), "..../..../x");
    }

    #[test]
    fn test_forbidden_inputs() {
        assert!(matches!(
            parse("..\\..\\boot.ini"),
            Err(PathError::ForbiddenCharacter(_))
        ));
        assert!(matches!(
            parse("a\0b"),
            Err(PathError::ForbiddenCharacter(_))
        ));
        assert!(matches!(
            parse("C:/Windows/win.ini"),
            Err(PathError::DrivePrefix(_))
        ));
        assert_eq!(parse(""), Err(PathError::Empty));
        assert_eq!(parse("/./"), Err(PathError::Empty));
        assert_eq!(parse("a/.."), Err(PathError::Empty));
    }

    #[test]
    fn test_relative_path_only_has_normal_components() {
        let path = ProjectPath::parse("/a/./b/../c/d.html").unwrap();
        let relative = path.to_relative_path();
        assert_eq!(relative, Path::new("a").join("c").join("d.html"));
        assert!(relative
            .components()
            .all(|c| matches!(c, Component::Normal(_))));
    }

    #[test]
    fn test_is_html() {
        assert!(ProjectPath::parse("INDEX.HTML").unwrap().is_html());
        assert!(!ProjectPath::parse("site.css").unwrap().is_html());
    }
}
