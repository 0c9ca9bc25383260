//! Citation recognizers.
//!
//! Each recognizer scans content for one citation family and produces
//! position-exact [`crate::ReferenceMarker`]s. The orchestrator in
//! [`crate::extractor`] runs the configured recognizers and merges their
//! output.

pub mod case;
pub mod law;

pub use case::CaseRecognizer;
pub use law::LawRecognizer;
