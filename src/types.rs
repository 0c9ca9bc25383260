//! Core data types for extracted references.
//!
//! A [`Reference`] points either to a section of statutory law (identified
//! by a book code and section number, e.g. "bgb" / "433") or to a court
//! decision (identified by court name and file number, e.g.
//! "Bundessozialgericht" / "B 6 KA 45/13 R").

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A resolved reference to a legal document.
///
/// Equality is full structural equality including the variant. The
/// ordering is lexicographic over `(type, book, section, court,
/// file_number)` and exists only so reference lists can be canonicalized
/// for comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Reference {
    /// Citation of legislation: a section within a law book.
    Law {
        /// Canonical book code, lower-cased and trimmed (e.g. "bgb", "sgb x").
        book: String,
        /// Section number, lower-cased with spaces stripped (e.g. "124a").
        section: String,
        /// Sentence (Satz) within the section, if cited.
        #[serde(skip_serializing_if = "Option::is_none")]
        sentence: Option<String>,
    },
    /// Citation of a court decision.
    Case {
        /// Court name; empty when no court could be resolved.
        court: String,
        /// File number (Aktenzeichen) verbatim.
        file_number: String,
        /// Decision date, if known.
        #[serde(skip_serializing_if = "Option::is_none")]
        date: Option<String>,
        /// European Case Law Identifier, if known.
        #[serde(skip_serializing_if = "Option::is_none")]
        ecli: Option<String>,
    },
}

/// Canonicalize a book code: trim and lower-case.
#[must_use]
pub fn clean_book(book: &str) -> String {
    book.trim().to_lowercase()
}

/// Canonicalize a section: strip spaces and lower-case ("83 D" -> "83d").
#[must_use]
pub fn clean_section(section: &str) -> String {
    section.replace(' ', "").to_lowercase()
}

impl Reference {
    /// Create a law reference with canonicalized book and section.
    #[must_use]
    pub fn law(book: &str, section: &str) -> Self {
        Self::Law {
            book: clean_book(book),
            section: clean_section(section),
            sentence: None,
        }
    }

    /// Create a case reference.
    #[must_use]
    pub fn case(court: impl Into<String>, file_number: impl Into<String>) -> Self {
        Self::Case {
            court: court.into(),
            file_number: file_number.into(),
            date: None,
            ecli: None,
        }
    }

    /// Whether this is a law reference.
    #[must_use]
    pub fn is_law(&self) -> bool {
        matches!(self, Self::Law { .. })
    }

    /// Whether this is a case reference.
    #[must_use]
    pub fn is_case(&self) -> bool {
        matches!(self, Self::Case { .. })
    }

    /// Sort key: `(type, book, section, court, file_number)`.
    fn sort_key(&self) -> (&'static str, &str, &str, &str, &str) {
        match self {
            Self::Law { book, section, .. } => ("law", book, section, "", ""),
            Self::Case {
                court, file_number, ..
            } => ("case", "", "", court, file_number),
        }
    }
}

impl Ord for Reference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Reference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Law { book, section, .. } => write!(f, "law:{book}/{section}"),
            Self::Case {
                court, file_number, ..
            } => write!(f, "case:{court}/{file_number}"),
        }
    }
}
