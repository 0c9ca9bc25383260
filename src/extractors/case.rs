//! Case reference recognition.
//!
//! Court decisions are cited by file number (Aktenzeichen), usually with
//! the deciding court named somewhere nearby: "BVerwG, Urteil vom
//! 27. April 2010 - 10 C 5.09 -". The file number itself is matched
//! structurally; the court is resolved by an expanding proximity search
//! around the match, overridden for social-court file numbers whose
//! instance letter already identifies the court level.
//!
//! A marker is emitted for every file number, with an empty court when
//! none could be resolved.

use std::collections::BTreeMap;

use regex::{Match, Regex};
use tracing::{debug, warn};

use crate::error::Result;
use crate::marker::ReferenceMarker;
use crate::patterns::{court_alternation, FILE_NUMBER_PATTERN, SOCIAL_FILE_NUMBER_PATTERN};
use crate::types::Reference;

/// Search radii in bytes around a file number. The first window with any
/// court candidate wins; wider windows are only tried when narrower ones
/// stay empty.
const WINDOW_RADII: [usize; 3] = [100, 200, 500];

/// Recognizer for court decision citations.
#[derive(Debug)]
pub struct CaseRecognizer {
    file_number: Regex,
    social: Regex,
    court: Regex,
}

impl CaseRecognizer {
    /// Compile the recognizer for the given court name vocabulary.
    ///
    /// Fails with [`crate::ExtractError::EmptyCourtNames`] when `names`
    /// is empty.
    pub fn new(names: &[String]) -> Result<Self> {
        let alternation = court_alternation(names)?;

        Ok(Self {
            file_number: Regex::new(FILE_NUMBER_PATTERN)?,
            social: Regex::new(SOCIAL_FILE_NUMBER_PATTERN)?,
            // A court name is always followed by punctuation or space.
            court: Regex::new(&format!(r"(?P<court>{alternation})[\s.;,:)]"))?,
        })
    }

    /// Find all case citations in `content`.
    #[must_use]
    pub fn recognize(&self, content: &str) -> Vec<ReferenceMarker> {
        let mut markers = Vec::new();

        for found in self.file_number.find_iter(content) {
            let file_number = found.as_str();

            let court = self
                .infer_court(file_number, &found, content)
                .or_else(|| self.search_court(&found, content))
                .unwrap_or_default();

            debug!(file_number, court = %court, "case citation");

            let marker = ReferenceMarker::new(file_number, found.start(), found.end())
                .with_references(vec![Reference::case(court, file_number)]);
            markers.push(marker);
        }

        markers
    }

    /// Derive the court from the file number itself.
    ///
    /// Social-court file numbers carry an instance letter (B/L/S) that
    /// pins the court level. A nearby candidate naming that level is
    /// preferred over the canonical name since it may carry the state or
    /// city.
    fn infer_court(&self, file_number: &str, found: &Match<'_>, content: &str) -> Option<String> {
        let caps = self.social.captures(file_number)?;

        let canonical = match caps.name("instance")?.as_str() {
            "B" => "Bundessozialgericht",
            "L" => "LSG",
            _ => "SG",
        };

        if let Some(candidate) = self.search_court(found, content) {
            if candidate.contains(canonical) {
                return Some(candidate);
            }
        }

        Some(canonical.to_string())
    }

    /// Proximity search for a court name around the file number.
    ///
    /// Windows expand until one contains a candidate; within a window the
    /// candidate whose center lies closest to the file number wins.
    fn search_court(&self, found: &Match<'_>, content: &str) -> Option<String> {
        for radius in WINDOW_RADII {
            let start = clamp_backward(content, found.start().saturating_sub(radius));
            let end = clamp_forward(content, (found.end() + radius).min(content.len()));
            let surrounding = &content[start..end];
            let file_number_pos = found.start() - start;

            // Candidates by distance to the file number.
            let mut candidates: BTreeMap<usize, &str> = BTreeMap::new();

            for caps in self.court.captures_iter(surrounding) {
                let (Some(whole), Some(court)) = (caps.get(0), caps.name("court")) else {
                    continue;
                };
                let center = (whole.start() + whole.end()) / 2;
                let distance = center.abs_diff(file_number_pos);

                if candidates.contains_key(&distance) {
                    warn!(
                        candidate = court.as_str(),
                        distance, "court candidate at same distance already found"
                    );
                } else {
                    candidates.insert(distance, court.as_str());
                }
            }

            if let Some((_, court)) = candidates.iter().next() {
                return Some((*court).to_string());
            }
        }

        None
    }
}

/// Largest char boundary at or below `pos`.
fn clamp_backward(text: &str, mut pos: usize) -> usize {
    while pos > 0 && !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Smallest char boundary at or above `pos`.
fn clamp_forward(text: &str, mut pos: usize) -> usize {
    while pos < text.len() && !text.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_court_names;
    use pretty_assertions::assert_eq;

    fn recognizer() -> CaseRecognizer {
        CaseRecognizer::new(&default_court_names()).expect("valid vocabulary")
    }

    #[test]
    fn test_file_number_with_nearby_court() {
        let content =
            "BVerwG, Urteil vom 27. April 2010 - 10 C 5.09 - hat dies entschieden.";
        let markers = recognizer().recognize(content);

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].text, "10 C 5.09");
        assert_eq!(
            markers[0].references,
            vec![Reference::case("BVerwG", "10 C 5.09")]
        );
    }

    #[test]
    fn test_marker_span_matches_content_slice() {
        let content = "OVG Schleswig, Beschluss vom 20.07.2006 - 1 MB 13/06 - bleibt maßgeblich.";
        let markers = recognizer().recognize(content);

        assert_eq!(markers.len(), 1);
        let marker = &markers[0];
        assert_eq!(&content[marker.start..marker.end], "1 MB 13/06");
        assert_eq!(
            marker.references,
            vec![Reference::case("OVG Schleswig", "1 MB 13/06")]
        );
    }

    #[test]
    fn test_no_court_in_reach_gives_empty_court() {
        let content = "Das Verfahren 2 BvR 1444/00 wurde eingestellt.";
        let markers = recognizer().recognize(content);

        assert_eq!(markers.len(), 1);
        assert_eq!(
            markers[0].references,
            vec![Reference::case("", "2 BvR 1444/00")]
        );
    }

    #[test]
    fn test_social_court_inferred_from_instance() {
        let content = "Die Revision im Verfahren B 6 KA 45/13 R wurde verworfen.";
        let markers = recognizer().recognize(content);

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].text, "B 6 KA 45/13 R");
        assert_eq!(
            markers[0].references,
            vec![Reference::case("Bundessozialgericht", "B 6 KA 45/13 R")]
        );
    }

    #[test]
    fn test_social_court_candidate_must_name_the_instance() {
        // The nearby BVerwG does not match the social instance letter, so
        // the canonical name wins.
        let content = "BVerwG und andere: im Verfahren B 6 KA 45/13 R gilt anderes.";
        let markers = recognizer().recognize(content);

        assert_eq!(markers.len(), 1);
        assert_eq!(
            markers[0].references,
            vec![Reference::case("Bundessozialgericht", "B 6 KA 45/13 R")]
        );
    }

    #[test]
    fn test_social_court_candidate_with_matching_instance_wins() {
        let content = "Das LSG Schleswig-Holstein entschied im Verfahren L 5 KR 134/20 anders.";
        let markers = recognizer().recognize(content);

        assert_eq!(markers.len(), 1);
        assert_eq!(
            markers[0].references,
            vec![Reference::case("LSG Schleswig-Holstein", "L 5 KR 134/20")]
        );
    }

    #[test]
    fn test_nearest_candidate_wins() {
        let content = "Der BGH folgte nicht; das BVerwG entschied mit Urteil - 2 C 24/10 - anders.";
        let markers = recognizer().recognize(content);

        assert_eq!(markers.len(), 1);
        assert_eq!(
            markers[0].references,
            vec![Reference::case("BVerwG", "2 C 24/10")]
        );
    }

    #[test]
    fn test_dates_and_bare_numbers_are_not_file_numbers() {
        let content = "Im Zeitraum 2014/20 gingen 245/45 Anträge ein, vgl. Bericht vom 22.12.2016.";
        assert_eq!(recognizer().recognize(content), vec![]);
    }

    #[test]
    fn test_window_clamps_to_char_boundaries() {
        // Multibyte chars right where the 100-byte window would cut.
        let padding = "ü".repeat(60);
        let content = format!("{padding}BGH, Urteil - IX ZR 165/12 - {padding}");
        let markers = recognizer().recognize(&content);

        assert_eq!(markers.len(), 1);
        assert_eq!(
            markers[0].references,
            vec![Reference::case("BGH", "IX ZR 165/12")]
        );
    }

    #[test]
    fn test_roman_chamber() {
        let content = "BGH, Beschluss vom 5.3.2013 - IX ZR 165/12 - juris.";
        let markers = recognizer().recognize(content);

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].text, "IX ZR 165/12");
    }
}
