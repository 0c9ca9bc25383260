//! Law reference recognition.
//!
//! Citations of legislation name a section (§, digits with an optional
//! letter suffix) and a law book, either as a code ("BGB") or as a full
//! name in the genitive ("des Verwaltungsverfahrensgesetzes"). A single
//! marker can carry one reference ("§ 433 Abs. 1 S. 1 BGB") or many
//! ("§§ 708 Nr. 11, 711 ZPO").
//!
//! Recognition is divide and conquer over a private working copy:
//! multi-reference spans are claimed first and masked with same-length
//! filler, then a battery of single-reference patterns runs over the
//! remainder. Masking keeps every later match's byte offsets valid
//! against the original content.
//!
//! When an implicit book is configured (parsing a statute that cites its
//! own sections), a separate context mode runs instead.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, error, warn};

use crate::error::{ExtractError, Result};
use crate::marker::{mask, ReferenceMarker};
use crate::patterns::{book_alternation, section_sign, word_boundary};
use crate::types::Reference;

/// Inline tokens allowed between section and book in a single citation
/// (paragraph, sentence and alternative designators).
const ANY_CONTENT: &str = r"(?:[0-9]{1,5}|\.|[a-z]|[IXV]{1,3}|Absatz|Abs\.|Abs|Satz|Halbsatz|S\.|Nummern|Nummer|Nr\.|Nr|Alt\.|Alt|und|bis|,|;|\s)*";

/// Section part of a single citation: digits with an optional letter
/// suffix, possibly space-separated ("3", "3b", "83 d").
const SECTION: &str = r"(?P<sect>[0-9]+(?:\s?[a-z])?)";

/// Widest section range that still gets expanded. No real statute comes
/// close; anything wider is treated as a malformed citation and kept as
/// endpoints only.
const MAX_RANGE_EXPANSION: u32 = 1000;

/// How a single-reference pattern resolves its book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SingleKind {
    /// The pattern captures a book code in `book`.
    ExplicitBook,
    /// The pattern captures a genitive full law name in `fullbook`.
    FullName,
    /// The pattern captures a forward connector ("i.V.m.") in
    /// `next_book`; the book is adopted from a later resolved match.
    Forward,
}

/// A compiled single-reference pattern with its resolution strategy.
#[derive(Debug)]
struct SinglePattern {
    regex: Regex,
    kind: SingleKind,
}

/// Compiled patterns for one content mode (plain or HTML-escaped).
#[derive(Debug)]
struct LawPatterns {
    /// Whole multi-reference span, "§§ ... <book>".
    multi: Regex,
    /// Section scanner inside a multi span: separator plus digits plus
    /// optional letter suffix.
    multi_sub: Regex,
    /// Locates book codes (and their positions) inside a multi span.
    book_finder: Regex,
    /// Single-reference battery, in match priority order.
    singles: Vec<SinglePattern>,
}

impl LawPatterns {
    fn new(codes: &[String], html: bool) -> Result<Self> {
        let book = book_alternation(codes)?;
        let sign = section_sign(html);
        let boundary = word_boundary(html);

        let multi = Regex::new(&format!(
            r"{sign}{sign} (?:\s|[0-9]+\.?|[a-z]|Abs\.|Abs|Satz|Halbsatz|S\.|Nr\.|Nr|Alt\.|Alt|f\.|ff\.|und|bis|,|;|{book})+\s(?P<lastbook>{book}){boundary}"
        ))?;

        let multi_sub = Regex::new(&format!(
            r"(?P<sep>{sign}{sign}|,|;|und|bis)\s?(?P<num>[0-9]+)(?:\s?(?P<suf>[a-z]))?"
        ))?;

        let book_finder = Regex::new(&book)?;

        let singles = vec![
            // § 3 BGB, § 3d BGB, § 83 d BGB
            SinglePattern {
                regex: Regex::new(&format!(
                    r"{sign} {SECTION} (?P<book>{book}){boundary}"
                ))?,
                kind: SingleKind::ExplicitBook,
            },
            // § 42 Abs. 1 Alt. 1 VwGO
            SinglePattern {
                regex: Regex::new(&format!(
                    r"{sign} {SECTION} Abs\. [0-9]+ Alt\. [0-9]+ (?P<book>{book}){boundary}"
                ))?,
                kind: SingleKind::ExplicitBook,
            },
            // § 433 Abs. 1 S. 1 BGB
            SinglePattern {
                regex: Regex::new(&format!(
                    r"{sign} {SECTION} {ANY_CONTENT} (?P<book>{book}){boundary}"
                ))?,
                kind: SingleKind::ExplicitBook,
            },
            // § 40 des Verwaltungsverfahrensgesetzes
            SinglePattern {
                regex: Regex::new(&format!(
                    r"{sign} {SECTION} (?:des|der|dem) (?:[a-zäöüß]+ )?(?P<fullbook>[A-ZÄÖÜ][A-Za-zäöüß-]+(?:gesetzes|gesetzbuche?s|ordnung)){boundary}"
                ))?,
                kind: SingleKind::FullName,
            },
            // § 455 Abs. 1 i.V.m. ...; book adopted from a later match
            SinglePattern {
                regex: Regex::new(&format!(
                    r"{sign} {SECTION} {ANY_CONTENT} (?P<next_book>i\.V\.m\.|iVm){boundary}"
                ))?,
                kind: SingleKind::Forward,
            },
        ];

        Ok(Self {
            multi,
            multi_sub,
            book_finder,
            singles,
        })
    }
}

/// Context mode: §§ 664 bis 670 (inclusive ranges, implicit book).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CONTEXT_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"§§ (?P<from>[0-9]+) (?:bis|und) (?P<to>[0-9]+)").expect("valid regex")
});

/// Context mode: Anlage 3 (annexes of the implicit book).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CONTEXT_ANNEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Anlage (?P<sect>[0-9]+)").expect("valid regex"));

/// Context mode: § 1, § 1 Abs. 2, § 1 Absatz 2 Satz 3.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CONTEXT_SINGLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"§ (?P<sect>[0-9]+)(?:\s(?:Abs\.|Absatz)\s[0-9]+)?(?:\sSatz\s(?P<satz>[0-9]+))?")
        .expect("valid regex")
});

/// Recognizer for statute citations.
///
/// Patterns for both content modes are compiled once at construction;
/// [`LawRecognizer::recognize`] itself is read-only and can be shared
/// across threads.
#[derive(Debug)]
pub struct LawRecognizer {
    plain: LawPatterns,
    html: LawPatterns,
    book_context: Option<String>,
}

impl LawRecognizer {
    /// Compile the recognizer for the given book code vocabulary.
    ///
    /// Fails with [`ExtractError::EmptyBookCodes`] when `codes` is empty.
    pub fn new(codes: &[String], book_context: Option<String>) -> Result<Self> {
        Ok(Self {
            plain: LawPatterns::new(codes, false)?,
            html: LawPatterns::new(codes, true)?,
            book_context,
        })
    }

    /// Find all law citations in `content`.
    pub fn recognize(&self, content: &str, is_html: bool) -> Result<Vec<ReferenceMarker>> {
        if let Some(book) = &self.book_context {
            return Ok(recognize_with_context(content, book));
        }

        let patterns = if is_html { &self.html } else { &self.plain };

        let mut markers = Vec::new();
        let mut working = content.to_string();

        extract_multi(patterns, &mut working, &mut markers)?;
        extract_singles(patterns, &mut working, &mut markers);

        Ok(markers)
    }
}

/// Phase 1: claim multi-reference spans ("§§ ... <book>") and mask them.
fn extract_multi(
    patterns: &LawPatterns,
    working: &mut String,
    markers: &mut Vec<ReferenceMarker>,
) -> Result<()> {
    // Matches are collected from a snapshot so masking a claimed span
    // only affects later phases, never the current scan.
    let snapshot = working.clone();

    for caps in patterns.multi.captures_iter(&snapshot) {
        let Some(whole) = caps.get(0) else { continue };
        let Some(last_book) = caps.name("lastbook") else {
            continue;
        };

        // The trailing boundary character is part of the match but not
        // of the citation.
        let start = whole.start();
        let end = last_book.end();
        let span_text = &snapshot[start..end];

        debug!(span = span_text, "multi-reference span");

        let refs = scan_multi_span(patterns, span_text)?;
        if refs.is_empty() {
            warn!(span = span_text, "no references found in span");
            continue;
        }

        let marker = ReferenceMarker::new(span_text, start, end).with_references(refs);
        *working = mask(working, &marker);
        markers.push(marker);
    }

    Ok(())
}

/// Scan one multi-reference span for its sections and resolve each
/// section's book.
fn scan_multi_span(patterns: &LawPatterns, span: &str) -> Result<Vec<Reference>> {
    // Book codes by byte position; each section binds to the nearest
    // book on its right.
    let mut books: BTreeMap<usize, &str> = BTreeMap::new();
    for book_match in patterns.book_finder.find_iter(span) {
        books.insert(book_match.start(), book_match.as_str());
    }

    let mut refs: Vec<Reference> = Vec::new();
    let mut last_section: Option<String> = None;
    let mut at = 0;

    while let Some(caps) = patterns.multi_sub.captures_at(span, at) {
        let Some(num) = caps.name("num") else { break };
        let Some(sep) = caps.name("sep") else { break };

        // A letter directly after the suffix means the suffix is really
        // the start of a following word ("bis", "und"), not part of the
        // section number.
        let (section, next_at) = match caps.name("suf") {
            Some(suf) if !followed_by_letter(span, suf.end()) => {
                (format!("{}{}", num.as_str(), suf.as_str()), suf.end())
            }
            _ => (num.as_str().to_string(), num.end()),
        };
        at = next_at;

        let book = if books.len() == 1 {
            books.values().next().copied()
        } else {
            // Nearest book strictly right of this section.
            books
                .range(caps.get(0).map_or(0, |m| m.start())..)
                .map(|(_, book)| *book)
                .next()
        };
        let Some(book) = book else {
            error!(section = %section, span, "no book after section");
            continue;
        };

        if sep.as_str() == "bis" {
            let Some(from) = &last_section else {
                return Err(ExtractError::OpenRange {
                    span: span.to_string(),
                });
            };
            // Expand integer ranges; letter-suffixed sections stay as
            // endpoints only, as do implausibly wide or reversed ranges.
            if let (Ok(from), Ok(to)) = (from.parse::<u32>(), section.parse::<u32>()) {
                if to.checked_sub(from).is_some_and(|width| width <= MAX_RANGE_EXPANSION) {
                    for between in from.saturating_add(1)..to {
                        refs.push(Reference::law(book, &between.to_string()));
                    }
                } else {
                    warn!(from = %from, to = %to, span, "range not expanded");
                }
            }
        }

        refs.push(Reference::law(book, &section));
        last_section = Some(section);
    }

    Ok(refs)
}

/// Phase 2: single-reference battery over the masked working copy.
fn extract_singles(
    patterns: &LawPatterns,
    working: &mut String,
    markers: &mut Vec<ReferenceMarker>,
) {
    // Markers whose citation ends in a forward connector ("i.V.m."),
    // waiting to adopt the book of a later resolved match.
    let mut waiting: Vec<(ReferenceMarker, String)> = Vec::new();

    for single in &patterns.singles {
        // Snapshot per pattern: masking applies between patterns, not
        // within one pattern's scan.
        let snapshot = working.clone();

        for caps in single.regex.captures_iter(&snapshot) {
            let Some(whole) = caps.get(0) else { continue };
            let Some(sect) = caps.name("sect") else { continue };

            let resolved_book = match single.kind {
                SingleKind::ExplicitBook => {
                    caps.name("book").map(|m| m.as_str().to_string())
                }
                SingleKind::FullName => caps.name("fullbook").map(|m| normalize_full_name(m.as_str())),
                SingleKind::Forward => None,
            };

            let span_end = match single.kind {
                SingleKind::ExplicitBook => caps.name("book").map(|m| m.end()),
                SingleKind::FullName => caps.name("fullbook").map(|m| m.end()),
                SingleKind::Forward => caps.name("next_book").map(|m| m.end()),
            };
            let Some(end) = span_end else { continue };
            let start = whole.start();
            let span_text = &snapshot[start..end];

            let marker = ReferenceMarker::new(span_text, start, end);

            if let Some(book) = resolved_book {
                let marker =
                    marker.with_references(vec![Reference::law(&book, sect.as_str())]);
                *working = mask(working, &marker);
                markers.push(marker);

                // A resolved book also settles every waiting forward
                // reference.
                for (pending, pending_sect) in waiting.drain(..) {
                    let pending =
                        pending.with_references(vec![Reference::law(&book, &pending_sect)]);
                    *working = mask(working, &pending);
                    markers.push(pending);
                }
            } else {
                waiting.push((marker, sect.as_str().to_string()));
            }
        }
    }

    if !waiting.is_empty() {
        warn!(count = waiting.len(), "unresolved forward references dropped");
    }
}

/// Whether the byte position is followed by an alphabetic character.
fn followed_by_letter(text: &str, pos: usize) -> bool {
    text[pos..]
        .chars()
        .next()
        .is_some_and(char::is_alphabetic)
}

/// Lower-case a genitive full law name and strip the case ending
/// ("Verwaltungsverfahrensgesetzes" -> "verwaltungsverfahrensgesetz").
fn normalize_full_name(name: &str) -> String {
    let name = name.to_lowercase();
    if let Some(stem) = name.strip_suffix("gesetzes") {
        return format!("{stem}gesetz");
    }
    if let Some(stem) = name.strip_suffix("gesetzbuches") {
        return format!("{stem}gesetzbuch");
    }
    if let Some(stem) = name.strip_suffix("gesetzbuchs") {
        return format!("{stem}gesetzbuch");
    }
    name
}

/// Context mode: every bare section citation refers to the implicit book.
fn recognize_with_context(content: &str, book: &str) -> Vec<ReferenceMarker> {
    let mut markers = Vec::new();
    let mut working = content.to_string();

    // §§ 664 bis 670: inclusive range over the implicit book.
    let snapshot = working.clone();
    for caps in CONTEXT_RANGE.captures_iter(&snapshot) {
        let Some(whole) = caps.get(0) else { continue };
        let (Some(from), Some(to)) = (caps.name("from"), caps.name("to")) else {
            continue;
        };
        let (Ok(from), Ok(to)) = (from.as_str().parse::<u32>(), to.as_str().parse::<u32>())
        else {
            continue;
        };

        let refs = if to.checked_sub(from).is_some_and(|width| width <= MAX_RANGE_EXPANSION) {
            (from..=to)
                .map(|section| Reference::law(book, &section.to_string()))
                .collect()
        } else {
            warn!(from, to, "range not expanded");
            vec![
                Reference::law(book, &from.to_string()),
                Reference::law(book, &to.to_string()),
            ]
        };
        let marker = ReferenceMarker::new(whole.as_str(), whole.start(), whole.end())
            .with_references(refs);
        working = mask(&working, &marker);
        markers.push(marker);
    }

    // Anlage 3: annex of the implicit book.
    let snapshot = working.clone();
    for caps in CONTEXT_ANNEX.captures_iter(&snapshot) {
        let (Some(whole), Some(sect)) = (caps.get(0), caps.name("sect")) else {
            continue;
        };
        let marker = ReferenceMarker::new(whole.as_str(), whole.start(), whole.end())
            .with_references(vec![Reference::law(
                book,
                &format!("anlage-{}", sect.as_str()),
            )]);
        working = mask(&working, &marker);
        markers.push(marker);
    }

    // § 1 Absatz 2 Satz 3: single section, optional sentence.
    let snapshot = working.clone();
    for caps in CONTEXT_SINGLE.captures_iter(&snapshot) {
        let (Some(whole), Some(sect)) = (caps.get(0), caps.name("sect")) else {
            continue;
        };
        let mut reference = Reference::law(book, sect.as_str());
        if let (Reference::Law { sentence, .. }, Some(satz)) =
            (&mut reference, caps.name("satz"))
        {
            *sentence = Some(satz.as_str().to_string());
        }
        let marker = ReferenceMarker::new(whole.as_str(), whole.start(), whole.end())
            .with_references(vec![reference]);
        working = mask(&working, &marker);
        markers.push(marker);
    }

    markers
}
