pub mod envelope;
pub mod marker;
pub mod types;

pub use envelope::{extract_envelope, parse_json_object};
pub use marker::extract_marker;
pub use types::{ExtractError, FileEntry, Strategy};

/// Decode the files contained in a completion using the given strategy.
///
/// Only the envelope strategy can fail; the marker strategy always falls back
/// to treating the whole text as `index.html`.
pub fn extract_files(response: &str, strategy: Strategy) -> Result<Vec<FileEntry>, ExtractError> {
    match strategy {
        Strategy::Marker => Ok(extract_marker(response)),
        Strategy::Envelope => extract_envelope(response),
    }
}
