//! # umls-loader
//!
//! Streaming loader and in-memory lookup index for UMLS Metathesaurus
//! release files.
//!
//! Reads `MRCONSO`, `MRREL` and `MRSTY` in either the pipe-delimited RRF
//! layout or the quoted-comma export layout and builds an immutable
//! [`TerminologyIndex`] that resolves concept ids, source codes and display
//! strings to concept synonyms, relations and semantic types.
//!
//! ```ignore
//! use umls_loader::{TerminologyIndex, UmlsConfig};
//!
//! let config = UmlsConfig::default().with_sources(["MSH", "SNOMEDCT_US"]);
//! let index = TerminologyIndex::load("/data/2024AA", config)?;
//!
//! let synonyms = index.search(Some("C0018681"), Some(&["Headache"][..]), 5);
//! ```

#![warn(missing_docs)]

pub mod concept;
pub mod loader;
pub mod normalize;
pub mod parser;
pub mod relation;
pub mod semantic_type;
pub mod store;
pub mod types;

pub use concept::{ConceptFilter, ConceptIndex, ConceptIndexBuilder};
pub use loader::{detect_format, discover_umls_files};
pub use normalize::{normalize, normalize_with, NormalizeOptions};
pub use parser::{RecordFields, TableSource, UmlsParser, UmlsRecord};
pub use relation::{Adjacency, RelationIndex, RelationIndexBuilder};
pub use semantic_type::{SemanticTypeIndex, SemanticTypeIndexBuilder};
pub use store::TerminologyIndex;
pub use types::{
    ConceptColumns, LoadStats, RelationColumns, ReleaseSchema, SemanticTypeColumns, UmlsConfig,
    UmlsError, UmlsFiles, UmlsResult,
};

// Re-export umls-types for convenience
pub use umls_types;
