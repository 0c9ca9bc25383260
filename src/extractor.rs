//! Extraction orchestration.
//!
//! The [`Extractor`] owns the configured recognizers, runs them over the
//! content and splices the resulting markers back in. Pre-existing
//! markers are stripped first so extraction is idempotent over its own
//! output.

use tracing::debug;

use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::extractors::{CaseRecognizer, LawRecognizer};
use crate::marker::{insert_markers, remove_markers, ReferenceMarker};

/// Reference extractor for German legal texts.
///
/// Construction compiles all patterns; extraction is read-only and can
/// be shared across threads.
#[derive(Debug)]
pub struct Extractor {
    law: Option<LawRecognizer>,
    case: Option<CaseRecognizer>,
}

impl Extractor {
    /// Build an extractor from the configuration.
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let law = if config.law_refs {
            Some(LawRecognizer::new(
                &config.law_book_codes,
                config.law_book_context.clone(),
            )?)
        } else {
            None
        };

        let case = if config.case_refs {
            Some(CaseRecognizer::new(&config.court_names)?)
        } else {
            None
        };

        Ok(Self { law, case })
    }

    /// Extract references from `content`.
    ///
    /// Returns the content with `[ref=<id>]...[/ref]` markers spliced in
    /// and the markers themselves, sorted by start offset. Marker spans
    /// are byte offsets into the returned content minus the tags, i.e.
    /// into `content` after stripping any pre-existing markers.
    pub fn extract(&self, content: &str, is_html: bool) -> Result<(String, Vec<ReferenceMarker>)> {
        let content = remove_markers(content);

        let mut markers = Vec::new();

        if let Some(law) = &self.law {
            markers.extend(law.recognize(&content, is_html)?);
        }
        if let Some(case) = &self.case {
            markers.extend(case.recognize(&content));
        }

        markers.sort_by_key(|marker| marker.start);
        debug!(count = markers.len(), "extraction finished");

        let rewritten = insert_markers(&content, &markers)?;
        Ok((rewritten, markers))
    }
}
