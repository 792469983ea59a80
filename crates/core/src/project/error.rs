#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("path escapes the project root: {0}")]
    EscapesRoot(String),

    #[error("path contains a forbidden character: {0}")]
    ForbiddenCharacter(String),

    #[error("path has a drive prefix: {0}")]
    DrivePrefix(String),

    #[error("invalid project id: {0}")]
    InvalidProjectId(String),
}
