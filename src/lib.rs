//! Reference extraction for German legal texts.
//!
//! Finds citations of legislation ("§ 433 Abs. 1 S. 1 BGB",
//! "§§ 3, 3b AsylG") and of court decisions ("B 6 KA 45/13 R") in plain
//! or HTML-escaped text, replaces them with position-exact
//! `[ref=<id>]...[/ref]` markers and returns the structured references.
//!
//! ```
//! use verweis::{Extractor, ExtractorConfig};
//!
//! # fn main() -> verweis::Result<()> {
//! let extractor = Extractor::new(&ExtractorConfig::default())?;
//! let (rewritten, markers) = extractor.extract("Anspruch aus § 433 BGB.", false)?;
//!
//! assert_eq!(markers.len(), 1);
//! assert!(rewritten.contains("[/ref]"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod extractors;
pub mod marker;
pub mod patterns;
pub mod types;

pub use config::ExtractorConfig;
pub use error::{ExtractError, Result};
pub use extractor::Extractor;
pub use marker::{insert_markers, mask, remove_markers, ReferenceMarker};
pub use types::Reference;
