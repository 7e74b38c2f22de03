//! # umls-types
//!
//! Type definitions for UMLS Metathesaurus release files.
//!
//! This crate provides plain Rust records for the three tables the loader
//! consumes: concept names (`MRCONSO`), relations (`MRREL`) and semantic
//! types (`MRSTY`), plus the release format tag and a few well-known values.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!
//! ## Usage
//!
//! ```rust
//! use umls_types::{ConceptName, ReleaseFormat, UmlsTable};
//!
//! let name = ConceptName {
//!     cui: "C0018681".to_string(),
//!     language: "ENG".to_string(),
//!     term_status: "P".to_string(),
//!     lui: "L0018681".to_string(),
//!     source: "MSH".to_string(),
//!     code: "D006261".to_string(),
//!     string: "Headache".to_string(),
//! };
//!
//! assert!(name.has_status_marker("p"));
//! assert_eq!(UmlsTable::Concepts.file_name(ReleaseFormat::Rrf), "MRCONSO.RRF");
//! ```

#![warn(missing_docs)]

mod concept;
mod enums;
mod ids;
mod relation;
mod semantic_type;
pub mod well_known;

// Re-export all public types at crate root
pub use concept::{ConceptName, TermVariants};
pub use enums::{ReleaseFormat, UmlsTable};
pub use ids::{Code, Cui, Lui};
pub use relation::{Relation, RelationKey};
pub use semantic_type::SemanticType;
