//! Error types for reference extraction.
//!
//! Uses a single `ExtractError` enum for library consumers with detailed
//! error context, plus a `Result` alias.

use thiserror::Error;

/// Main error type for the extraction library.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No law book codes available to build the book pattern.
    #[error("Cannot build book pattern: law book code list is empty")]
    EmptyBookCodes,

    /// No court names available to build the court pattern.
    #[error("Cannot build court pattern: court name list is empty")]
    EmptyCourtNames,

    /// A range delimiter ("bis") was found without a preceding section.
    #[error("Range delimiter 'bis' without preceding section in: '{span}'")]
    OpenRange { span: String },

    /// A marker span is empty, exceeds the content, or splits a
    /// character.
    #[error("Marker span is not a valid content slice: {marker}")]
    InvalidSpan { marker: String },

    /// A marker overlaps with the marker before it (sorted by start).
    #[error("Marker overlaps with previous marker: {marker}")]
    OverlapsPrevious { marker: String },

    /// A marker overlaps with the marker after it (sorted by start).
    #[error("Marker overlaps with next marker: {marker}")]
    OverlapsNext { marker: String },

    /// Regex compilation failed (e.g. vocabulary too large).
    #[error("Pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExtractError::OpenRange {
            span: "§§ bis 6 BGB".to_string(),
        };
        assert!(err.to_string().contains("bis"));
        assert!(err.to_string().contains("§§ bis 6 BGB"));
    }

    #[test]
    fn test_overlap_error_names_marker() {
        let err = ExtractError::OverlapsPrevious {
            marker: "[5..12) '§ 1 BGB'".to_string(),
        };
        assert!(err.to_string().contains("previous"));
        assert!(err.to_string().contains("§ 1 BGB"));
    }
}
