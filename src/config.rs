//! Vocabularies and extractor configuration.
//!
//! Vocabularies are immutable configuration values built once and passed
//! into recognizer constructors. The defaults mirror the upstream resource
//! files; callers working with their own jurisdictions pass their own
//! lists.

use std::sync::LazyLock;

use regex::Regex;

/// Default law book codes used to build the book alternation.
pub const DEFAULT_LAW_BOOK_CODES: &[&str] = &[
    "AsylG", "BGB", "GG", "VwGO", "GkG", "stbstg", "lbo", "ZPO", "LVwG", "AGVwGO SH", "BauGB",
    "BauNVO", "ZWStS", "SbStG", "StPO", "TKG", "SG", "SGG", "SGB X",
];

/// Federal court names.
const FEDERAL_COURTS: &[&str] = &[
    "Bundesverfassungsgericht",
    "BVerfG",
    "Bundesverwaltungsgericht",
    "BVerwG",
    "Bundesgerichtshof",
    "BGH",
    "Bundesarbeitsgericht",
    "BAG",
    "Bundesfinanzhof",
    "BFH",
    "Bundessozialgericht",
    "BSG",
    "Bundespatentgericht",
    "BPatG",
    "Truppendienstgericht Nord",
    "TDG Nord",
    "Truppendienstgericht Süd",
    "TDG Süd",
    "EUGH",
    "Truppendienstgericht S&#252;d",
    "TDG S&#252;d",
];

/// German states (and common abbreviations, plus HTML-escaped spellings).
const STATES: &[&str] = &[
    "Berlin",
    "Baden-Württemberg",
    "BW",
    "Baden-W&#252;rttemberg",
    "Brandenburg",
    "Brandenburgisches",
    "Bremen",
    "Hamburg",
    "Hessen",
    "Niedersachsen",
    "Mecklenburg-Vorpommern",
    "Nordrhein-Westfalen",
    "NRW",
    "Rheinland-Pfalz",
    "Saarland",
    "Sachsen",
    "Sachsen-Anhalt",
    "Schleswig-Holstein",
    "Schl.-Holst.",
    "SH",
    "Thüringen",
    "Th&#252;ringen",
];

/// State-level court types, combined with state names in both orders.
const STATE_COURTS: &[&str] = &["OVG", "VGH", "LSG"];

/// Cities with commonly cited courts.
const CITIES: &[&str] = &["Baden-Baden", "Berlin-Brbg.", "Wedding", "Schleswig", "Koblenz", "Hamm"];

/// City-level court types, combined with city names in both orders.
const CITY_COURTS: &[&str] = &[
    "Amtsgericht",
    "AG",
    "Landgericht",
    "LG",
    "Oberlandesgericht",
    "OLG",
    "OVG",
];

/// Default file number codes (Registerzeichen), in `code[,meta]` line
/// format as found in the upstream resource file.
pub const DEFAULT_FILE_NUMBER_CODES: &str = "\
A,Verwaltungsgericht
AR,Allgemeines Register
AnwSt (R),Anwaltsgericht
B,Beschwerde
BvL,Normenkontrolle
BvR,Verfassungsbeschwerde
C,Bundesverwaltungsgericht Revision
K,Klage
KA,Kassenarztrecht
KN,Normenkontrolle
Ks,Schwurgericht
L,Landessozialgericht
LB,Berufung
MB,Eilverfahren
O,Zivilkammer
REMiet (WuM),Rechtsentscheid Mietrecht
S,Sozialgericht
Sa,Arbeitsgericht Berufung
U,Berufung Zivilsachen
W (pat),Patentgericht Beschwerde
ZR,Zivilsachen Revision
";

/// Matches a parenthetical suffix in a code column, e.g. `W (pat)`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CODE_PARENTHESIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s\((.*?)\)").expect("valid regex"));

/// Parse a `code[,meta]` resource into the list of codes.
///
/// One code per line; everything after the first comma is metadata and is
/// dropped, as is any parenthetical suffix in the code itself
/// (`"W (pat)"` -> `"W"`). Blank lines are skipped.
#[must_use]
pub fn parse_code_lines(resource: &str) -> Vec<String> {
    resource
        .lines()
        .filter_map(|line| {
            let code = line.trim().split(',').next().unwrap_or("").trim();
            if code.is_empty() {
                return None;
            }
            Some(CODE_PARENTHESIS.replace_all(code, "").into_owned())
        })
        .collect()
}

/// Default law book codes as owned strings.
#[must_use]
pub fn default_law_book_codes() -> Vec<String> {
    DEFAULT_LAW_BOOK_CODES.iter().map(ToString::to_string).collect()
}

/// Compose the default court name vocabulary.
///
/// Federal courts stand alone; state courts are combined with every state
/// name and city courts with every city name, in both orders ("OVG
/// Schleswig-Holstein" and "Schleswig-Holstein OVG"). Order is preserved
/// so earlier entries win alternation ties.
#[must_use]
pub fn default_court_names() -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for court in FEDERAL_COURTS {
        names.push((*court).to_string());
    }

    for court in STATE_COURTS {
        for state in STATES {
            names.push(format!("{court} {state}"));
            names.push(format!("{state} {court}"));
        }
    }

    for court in CITY_COURTS {
        for city in CITIES {
            names.push(format!("{court} {city}"));
            names.push(format!("{city} {court}"));
        }
    }

    names
}

/// Immutable configuration for an [`crate::Extractor`].
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Law book codes for the book alternation.
    pub law_book_codes: Vec<String>,

    /// Court names for the proximity search.
    pub court_names: Vec<String>,

    /// File number codes (Registerzeichen). Kept as vocabulary for
    /// callers; the file number pattern itself is structural.
    pub file_number_codes: Vec<String>,

    /// Implicit book for context-mode law extraction (set when parsing a
    /// statute that cites its own sections without naming itself).
    pub law_book_context: Option<String>,

    /// Whether to extract law references.
    pub law_refs: bool,

    /// Whether to extract case references.
    pub case_refs: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            law_book_codes: default_law_book_codes(),
            court_names: default_court_names(),
            file_number_codes: parse_code_lines(DEFAULT_FILE_NUMBER_CODES),
            law_book_context: None,
            law_refs: true,
            case_refs: true,
        }
    }
}

impl ExtractorConfig {
    /// Configure an implicit law book for context-mode extraction.
    #[must_use]
    pub fn with_law_book_context(mut self, book: impl Into<String>) -> Self {
        self.law_book_context = Some(book.into());
        self
    }

    /// Enable or disable law reference extraction.
    #[must_use]
    pub fn with_law_refs(mut self, enabled: bool) -> Self {
        self.law_refs = enabled;
        self
    }

    /// Enable or disable case reference extraction.
    #[must_use]
    pub fn with_case_refs(mut self, enabled: bool) -> Self {
        self.case_refs = enabled;
        self
    }
}
