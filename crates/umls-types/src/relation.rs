//! UMLS relation type.
//!
//! This module provides the `Relation` struct representing the columns of an
//! `MRREL` row used for indexing.

use crate::Cui;

/// A relation row from the `MRREL` table.
///
/// # Examples
///
/// ```
/// use umls_types::Relation;
///
/// let relation = Relation {
///     source_cui: "C0018681".to_string(),
///     relation_attr: "RB".to_string(),
///     target_cui: "C0234238".to_string(),
///     relation_type: "isa".to_string(),
/// };
///
/// assert!(!relation.is_self_relation());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relation {
    /// Source concept.
    pub source_cui: Cui,
    /// Coarse relation label (e.g., "RB", "PAR").
    pub relation_attr: String,
    /// Target concept.
    pub target_cui: Cui,
    /// Fine-grained relation label adjacency is keyed by (e.g., "isa").
    pub relation_type: String,
}

impl Relation {
    /// Returns true if source and target are the same concept.
    pub fn is_self_relation(&self) -> bool {
        self.source_cui == self.target_cui
    }
}

/// Identity of a stored relation.
///
/// Two relations are the same iff all four fields match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationKey {
    /// Source concept.
    pub source_cui: Cui,
    /// Target concept.
    pub target_cui: Cui,
    /// Coarse relation label.
    pub relation_attr: String,
    /// Fine-grained relation label.
    pub relation_type: String,
}

impl From<Relation> for RelationKey {
    fn from(relation: Relation) -> Self {
        Self {
            source_cui: relation.source_cui,
            target_cui: relation.target_cui,
            relation_attr: relation.relation_attr,
            relation_type: relation.relation_type,
        }
    }
}
