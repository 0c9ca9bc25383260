//! Reference markers and the content rewriter.
//!
//! A [`ReferenceMarker`] is the positional annotation for a recognized
//! citation: the verbatim text, its half-open byte span in the original
//! content, and the resolved references. [`insert_markers`] splices
//! `[ref=<id>]...[/ref]` tags into content while tracking the cumulative
//! insertion offset; [`mask`] overwrites a claimed span with same-length
//! filler so recognizers can re-scan a working copy without offset
//! adjustments.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ExtractError, Result};
use crate::types::Reference;

/// Filler character used when masking claimed spans.
const MASK_CHAR: char = '_';

/// Matches existing reference markers so they can be stripped before
/// extraction.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static MARKER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[ref=([-a-z0-9]+)\](.*?)\[/ref\]").expect("valid regex"));

/// A positionally exact annotation over source text.
///
/// Invariants: `end > start`, and `text` equals the `start..end` slice of
/// the content version the marker was produced against. Markers are
/// immutable extraction outputs; they are never mutated after extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceMarker {
    /// Unique marker id, used in the inserted tags.
    pub id: Uuid,

    /// Start byte offset into the original content (inclusive).
    pub start: usize,

    /// End byte offset into the original content (exclusive).
    pub end: usize,

    /// Verbatim text of the citation as it appears in the content.
    pub text: String,

    /// Resolved references, in citation order.
    pub references: Vec<Reference>,
}

impl ReferenceMarker {
    /// Create a marker over `start..end` with a fresh id and no references.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            text: text.into(),
            references: Vec::new(),
        }
    }

    /// Attach resolved references.
    #[must_use]
    pub fn with_references(mut self, references: Vec<Reference>) -> Self {
        self.references = references;
        self
    }

    /// Byte length of the annotated span.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is empty. Valid markers never are.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Opening tag inserted before the citation text.
    #[must_use]
    pub fn open_tag(&self) -> String {
        format!("[ref={}]", self.id)
    }

    /// Closing tag inserted after the citation text.
    #[must_use]
    pub fn close_tag(&self) -> String {
        "[/ref]".to_string()
    }
}

impl fmt::Display for ReferenceMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}) '{}'", self.start, self.end, self.text)
    }
}

/// Splice marker tags into `content`.
///
/// Markers are sorted by start offset; each marker's span must be a
/// non-empty char-boundary slice of `content`, ending at or before the
/// next marker's start. Violations indicate a recognizer logic error and
/// abort the rewrite with [`ExtractError::InvalidSpan`],
/// [`ExtractError::OverlapsPrevious`] or [`ExtractError::OverlapsNext`].
/// Touching spans (`end == next.start`) are legal.
pub fn insert_markers(content: &str, markers: &[ReferenceMarker]) -> Result<String> {
    let mut sorted: Vec<&ReferenceMarker> = markers.iter().collect();
    sorted.sort_by_key(|marker| marker.start);

    for (i, marker) in sorted.iter().enumerate() {
        if marker.is_empty()
            || marker.end > content.len()
            || !content.is_char_boundary(marker.start)
            || !content.is_char_boundary(marker.end)
        {
            return Err(ExtractError::InvalidSpan {
                marker: marker.to_string(),
            });
        }
        if i > 0 && marker.start < sorted[i - 1].end {
            return Err(ExtractError::OverlapsPrevious {
                marker: marker.to_string(),
            });
        }
        if i + 1 < sorted.len() && sorted[i + 1].start < marker.end {
            return Err(ExtractError::OverlapsNext {
                marker: marker.to_string(),
            });
        }
    }

    let mut rewritten = String::with_capacity(content.len());
    let mut cursor = 0;

    for marker in sorted {
        rewritten.push_str(&content[cursor..marker.start]);
        rewritten.push_str(&marker.open_tag());
        rewritten.push_str(&marker.text);
        rewritten.push_str(&marker.close_tag());
        cursor = marker.end;
    }
    rewritten.push_str(&content[cursor..]);

    Ok(rewritten)
}

/// Overwrite the marker's span in `content` with same-length filler.
///
/// Length preservation keeps all byte offsets of later matches against the
/// same working copy valid without adjustment.
#[must_use]
pub fn mask(content: &str, marker: &ReferenceMarker) -> String {
    let mut masked = String::with_capacity(content.len());
    masked.push_str(&content[..marker.start]);
    for _ in 0..marker.len() {
        masked.push(MASK_CHAR);
    }
    masked.push_str(&content[marker.end..]);
    masked
}

/// Strip all `[ref=..]...[/ref]` markers, keeping the inner text.
#[must_use]
pub fn remove_markers(content: &str) -> String {
    MARKER_PATTERN.replace_all(content, "$2").into_owned()
}
