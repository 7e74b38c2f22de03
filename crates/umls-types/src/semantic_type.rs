//! UMLS semantic type assignment.

use crate::Cui;

/// A semantic type row from the `MRSTY` table.
///
/// # Examples
///
/// ```
/// use umls_types::SemanticType;
///
/// let sty = SemanticType {
///     cui: "C0018681".to_string(),
///     label: "Sign or Symptom".to_string(),
/// };
/// assert_eq!(sty.label, "Sign or Symptom");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SemanticType {
    /// Concept the type is assigned to.
    pub cui: Cui,
    /// Semantic type name (STY).
    pub label: String,
}
