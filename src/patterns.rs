//! Shared regex building blocks.
//!
//! Citation patterns come in a plain and an HTML-escaped flavor: escaped
//! content spells the section sign as `&#167;` and quotes as numeric
//! entities, so the fragments here vary with the content mode. Vocabulary
//! alternations (book codes, court names) are built from configuration at
//! extractor construction time; everything here produces pattern text,
//! compilation happens in the recognizers.

use crate::error::{ExtractError, Result};

/// The section sign as it appears in the content mode.
#[must_use]
pub fn section_sign(html: bool) -> &'static str {
    if html {
        "&#167;"
    } else {
        "§"
    }
}

/// A consumed word-boundary group.
///
/// The regex engine has no lookahead, so patterns consume one boundary
/// character (or end of input) after the final token and the recognizer
/// trims the span back to the last semantic capture group.
#[must_use]
pub fn word_boundary(html: bool) -> &'static str {
    if html {
        r#"(?:&#8221;|&#8216;|&#8217;|&#60;|&#62;|&#38;|&rdquo;|&lsquo;|&rsquo;|&lt;|&gt;|&amp;|[\s.,;:!?()\[\]"'<>&]|$)"#
    } else {
        r#"(?:[\s.,;:!?()\[\]"'<>&]|$)"#
    }
}

/// Build an alternation from a vocabulary.
///
/// Entries are regex-escaped and sorted by descending length so that a
/// longer entry always wins over one of its prefixes ("SGB X" before
/// "SG"). The sort is stable; configuration order breaks length ties.
fn alternation(entries: &[String]) -> String {
    let mut escaped: Vec<String> = entries
        .iter()
        .map(|entry| regex::escape(entry))
        .collect();
    escaped.sort_by_key(|entry| std::cmp::Reverse(entry.len()));
    escaped.join("|")
}

/// Case-insensitive alternation over the configured law book codes.
pub fn book_alternation(codes: &[String]) -> Result<String> {
    if codes.is_empty() {
        return Err(ExtractError::EmptyBookCodes);
    }
    Ok(format!("(?i:{})", alternation(codes)))
}

/// Alternation over the configured court names (case-sensitive; court
/// names are proper nouns).
pub fn court_alternation(names: &[String]) -> Result<String> {
    if names.is_empty() {
        return Err(ExtractError::EmptyCourtNames);
    }
    Ok(alternation(names))
}

/// A court file number (Aktenzeichen).
///
/// Shape: optional instance letter, chamber (arabic or roman), a register
/// code starting with an uppercase letter, optional parenthetical and
/// extra code token, serial number, separator, two-digit year, optional
/// trailing register letter. The uppercase-first code requirement keeps
/// date fragments ("2014/20", "07/20") and bare number pairs from
/// matching.
pub const FILE_NUMBER_PATTERN: &str = r"(?:(?P<instance>B|L|S)\s)?(?P<chamber>[0-9]{1,2}[a-z]?|[IVX]+)\s(?P<code>[A-Z][A-Za-z]{0,4})(?:\s\([A-Za-z]{1,6}\))?(?:\s[A-Za-z]{1,6})?\s(?P<number>[0-9]{1,6})[/.](?P<year>[0-9]{2})(?:\s(?P<register>AR|BH|GS|KH|RH|B|C|K|R|S))?";

/// A social-court file number, anchored to the start of a candidate.
///
/// Instance letter B/L/S plus a social-law subject area code identify the
/// court level even when no court name appears nearby.
pub const SOCIAL_FILE_NUMBER_PATTERN: &str = r"^(?P<instance>B|L|S)\s(?P<chamber>[0-9]{1,2})\s(?P<subject>AL|AS|AY|BK|BL|EG|KA|KG|KR|KS|LW|RE|RS|SB|SF|SO|ÜG|VG|VH|VJ|VK|VS|A|P|R|U|V)\s(?P<number>[0-9]{1,6})/(?P<year>[0-9]{2})";

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use regex::Regex;

    #[test]
    fn test_section_sign_modes() {
        assert_eq!(section_sign(false), "§");
        assert_eq!(section_sign(true), "&#167;");
    }

    #[test]
    fn test_book_alternation_prefers_longer_codes() {
        let codes = vec!["SG".to_string(), "SGB X".to_string(), "SGG".to_string()];
        let pattern = book_alternation(&codes).expect("non-empty vocabulary");

        let regex = Regex::new(&pattern).expect("valid pattern");
        let found = regex.find("SGB X").expect("matches");
        assert_eq!(found.as_str(), "SGB X");
    }

    #[test]
    fn test_book_alternation_is_case_insensitive() {
        let codes = vec!["BGB".to_string()];
        let pattern = book_alternation(&codes).expect("non-empty vocabulary");
        let regex = Regex::new(&pattern).expect("valid pattern");
        assert!(regex.is_match("bgb"));
    }

    #[test]
    fn test_book_alternation_empty_vocabulary() {
        let err = book_alternation(&[]).expect_err("empty vocabulary");
        assert!(matches!(err, ExtractError::EmptyBookCodes));
    }

    #[test]
    fn test_court_alternation_escapes_entries() {
        let names = vec!["Schl.-Holst. OVG".to_string()];
        let pattern = court_alternation(&names).expect("non-empty vocabulary");
        let regex = Regex::new(&pattern).expect("valid pattern");
        assert!(regex.is_match("Schl.-Holst. OVG"));
        assert!(!regex.is_match("SchlX-HolstX OVG"));
    }

    #[test]
    fn test_court_alternation_empty_vocabulary() {
        let err = court_alternation(&[]).expect_err("empty vocabulary");
        assert!(matches!(err, ExtractError::EmptyCourtNames));
    }

    #[test]
    fn test_file_number_matches() {
        let regex = Regex::new(FILE_NUMBER_PATTERN).expect("valid pattern");

        for text in ["B 6 KA 45/13 R", "IX ZR 165/12", "1 KN 19/09", "2 BvR 1444/00"] {
            let found = regex.find(text).expect("matches");
            assert_eq!(found.as_str(), text, "whole input should match");
        }
    }

    #[test]
    fn test_file_number_exclusions() {
        let regex = Regex::new(FILE_NUMBER_PATTERN).expect("valid pattern");

        for text in ["2014/20", "07/20", "245/45", "im Jahr 2014/20 etwa"] {
            assert!(!regex.is_match(text), "must not match: {text}");
        }
    }

    #[test]
    fn test_social_file_number() {
        let regex = Regex::new(SOCIAL_FILE_NUMBER_PATTERN).expect("valid pattern");

        let caps = regex.captures("B 6 KA 45/13 R").expect("matches");
        assert_eq!(&caps["instance"], "B");
        assert_eq!(&caps["subject"], "KA");

        assert!(!regex.is_match("IX ZR 165/12"));
    }
}
