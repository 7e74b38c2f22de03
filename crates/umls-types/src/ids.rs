//! UMLS identifier types.
//!
//! UMLS identifiers are opaque strings (`C0018681`, `L0018681`, `D006261`).
//! They are never parsed or compared numerically.

/// Concept Unique Identifier.
///
/// Canonical id for a clustered meaning, e.g. `C0018681` (Headache).
pub type Cui = String;

/// Lexical (term identity) Unique Identifier.
///
/// Identifies one distinct lexical form of a meaning, e.g. `L0018681`.
pub type Lui = String;

/// Source vocabulary code, e.g. a MeSH descriptor `D006261`.
pub type Code = String;
