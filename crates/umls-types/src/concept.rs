//! UMLS concept name type.
//!
//! This module provides the `ConceptName` struct representing the columns of
//! an `MRCONSO` row used for indexing, and `TermVariants` for the string forms
//! recorded per term identity.

use crate::{Code, Cui, Lui};

/// A concept name row from the `MRCONSO` table.
///
/// Only the columns the index needs are kept.
///
/// # Examples
///
/// ```
/// use umls_types::ConceptName;
///
/// let name = ConceptName {
///     cui: "C0011849".to_string(),
///     language: "ENG".to_string(),
///     term_status: "P".to_string(),
///     lui: "L0011849".to_string(),
///     source: "MSH".to_string(),
///     code: "D003920".to_string(),
///     string: "Diabetes Mellitus".to_string(),
/// };
///
/// assert!(name.has_status_marker("p"));
/// assert!(!name.has_status_marker("s"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConceptName {
    /// Concept this name belongs to.
    pub cui: Cui,
    /// Language of the term (e.g., "ENG").
    pub language: String,
    /// Term status (TS), "P" for preferred.
    pub term_status: String,
    /// Term identity.
    pub lui: Lui,
    /// Source vocabulary abbreviation (SAB).
    pub source: String,
    /// Code in the source vocabulary.
    pub code: Code,
    /// The display string.
    pub string: String,
}

impl ConceptName {
    /// Returns true if the lowercased term status contains `marker`.
    ///
    /// This is a containment check, not an equality check, so any status
    /// string carrying the marker qualifies.
    pub fn has_status_marker(&self, marker: &str) -> bool {
        self.term_status
            .to_lowercase()
            .contains(&marker.to_lowercase())
    }
}

/// The three string forms recorded for one term identity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TermVariants {
    /// The string as it appears in the release.
    pub original: String,
    /// Lowercased form.
    pub lowercase: String,
    /// Normalized lookup key.
    pub normalized: String,
}

impl TermVariants {
    /// Iterates over the three forms in original, lowercase, normalized order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [
            self.original.as_str(),
            self.lowercase.as_str(),
            self.normalized.as_str(),
        ]
        .into_iter()
    }
}
