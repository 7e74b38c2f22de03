//! Loader-specific types for UMLS release processing.

use std::path::PathBuf;

use thiserror::Error;
use umls_types::{well_known, ReleaseFormat, UmlsTable};

use crate::normalize::NormalizeOptions;

/// Errors that can occur while loading a UMLS release.
#[derive(Error, Debug)]
pub enum UmlsError {
    /// I/O error reading a release file.
    #[error("IO error reading UMLS file: {0}")]
    Io(#[from] std::io::Error),

    /// Record splitting error (includes invalid UTF-8).
    #[error("Record parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A line has fewer fields than the table schema requires.
    #[error("{table} line {line}: missing column '{column}' at index {index} (found {found} fields)")]
    MissingField {
        /// The table being read.
        table: UmlsTable,
        /// Name of the missing column.
        column: &'static str,
        /// Configured column index.
        index: usize,
        /// Number of fields present on the line.
        found: usize,
        /// 1-based line number, 0 if unknown.
        line: u64,
    },
}

/// Result type for UMLS loading operations.
pub type UmlsResult<T> = Result<T, UmlsError>;

/// Column offsets of the `MRCONSO` fields the index reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConceptColumns {
    /// CUI column.
    pub cui: usize,
    /// LAT column.
    pub language: usize,
    /// TS column.
    pub term_status: usize,
    /// LUI column.
    pub lui: usize,
    /// SAB column.
    pub source: usize,
    /// CODE column.
    pub code: usize,
    /// STR column.
    pub string: usize,
}

impl Default for ConceptColumns {
    fn default() -> Self {
        Self {
            cui: 0,
            language: 1,
            term_status: 2,
            lui: 3,
            source: 11,
            code: 13,
            string: 14,
        }
    }
}

/// Column offsets of the `MRREL` fields the index reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationColumns {
    /// CUI1 column.
    pub source_cui: usize,
    /// REL column.
    pub relation_attr: usize,
    /// CUI2 column.
    pub target_cui: usize,
    /// RELA column.
    pub relation_type: usize,
}

impl Default for RelationColumns {
    fn default() -> Self {
        Self {
            source_cui: 0,
            relation_attr: 3,
            target_cui: 4,
            relation_type: 7,
        }
    }
}

/// Column offsets of the `MRSTY` fields the index reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemanticTypeColumns {
    /// CUI column.
    pub cui: usize,
    /// STY column.
    pub label: usize,
}

impl Default for SemanticTypeColumns {
    fn default() -> Self {
        Self { cui: 0, label: 3 }
    }
}

/// Column layout of every table in a release.
///
/// Defaults match the documented Metathesaurus layout. Releases that shift
/// columns only need the affected offset changed here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseSchema {
    /// `MRCONSO` layout.
    pub concepts: ConceptColumns,
    /// `MRREL` layout.
    pub relations: RelationColumns,
    /// `MRSTY` layout.
    pub semantic_types: SemanticTypeColumns,
}

/// Configuration for loading a UMLS release.
#[derive(Debug, Clone)]
pub struct UmlsConfig {
    /// Source vocabularies to include (`None` = all).
    pub source_range: Option<Vec<String>>,
    /// Languages to include (`None` = all).
    pub lang_range: Option<Vec<String>>,
    /// Skip the relation and semantic type passes.
    pub only_load_dict: bool,
    /// Marker a term status must contain (case-insensitive) to be accepted.
    pub preferred_marker: String,
    /// Column layout of the release tables.
    pub schema: ReleaseSchema,
    /// Rules used to build normalized lookup keys.
    pub normalize: NormalizeOptions,
    /// Seed for the concept order shuffle (`None` = random).
    pub shuffle_seed: Option<u64>,
    /// Log and skip lines with too few fields instead of failing the load.
    pub skip_malformed_lines: bool,
}

impl Default for UmlsConfig {
    fn default() -> Self {
        Self {
            source_range: None,
            lang_range: Some(vec![well_known::LANGUAGE_ENGLISH.to_string()]),
            only_load_dict: false,
            preferred_marker: well_known::PREFERRED_MARKER.to_string(),
            schema: ReleaseSchema::default(),
            normalize: NormalizeOptions::default(),
            shuffle_seed: None,
            skip_malformed_lines: false,
        }
    }
}

impl UmlsConfig {
    /// Creates a config that only loads the dictionary (no relations or types).
    pub fn dictionary_only() -> Self {
        Self {
            only_load_dict: true,
            ..Default::default()
        }
    }

    /// Restricts names to the given source vocabularies.
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_range = Some(sources.into_iter().map(Into::into).collect());
        self
    }

    /// Accepts names in every language.
    pub fn all_languages(mut self) -> Self {
        self.lang_range = None;
        self
    }

    /// Fixes the concept order shuffle to a seed.
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }
}

/// Statistics from loading a release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Distinct concepts with at least one accepted name.
    pub concept_count: usize,
    /// Distinct keys in the string-to-concept index.
    pub string_count: usize,
    /// Name records accepted (after filtering and term identity dedup).
    pub accepted_names: usize,
    /// Distinct relations stored.
    pub relation_count: usize,
    /// Concepts with a semantic type.
    pub semantic_type_count: usize,
    /// Lines read across all tables.
    pub lines_read: usize,
    /// Time taken to load in milliseconds.
    pub load_time_ms: u64,
}

/// Table paths of a release directory.
///
/// Paths are derived from the detected format; their existence is only
/// checked when a table is first read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UmlsFiles {
    /// Detected release format.
    pub format: ReleaseFormat,
    /// Directory containing the tables.
    pub directory: PathBuf,
}

impl UmlsFiles {
    /// Creates a file set for a directory in a given format.
    pub fn new(directory: impl Into<PathBuf>, format: ReleaseFormat) -> Self {
        Self {
            format,
            directory: directory.into(),
        }
    }

    /// Path of a table in this release.
    pub fn table_path(&self, table: UmlsTable) -> PathBuf {
        self.directory.join(table.file_name(self.format))
    }

    /// Path of the concept name table.
    pub fn concept_file(&self) -> PathBuf {
        self.table_path(UmlsTable::Concepts)
    }

    /// Path of the relation table.
    pub fn relation_file(&self) -> PathBuf {
        self.table_path(UmlsTable::Relations)
    }

    /// Path of the semantic type table.
    pub fn semantic_type_file(&self) -> PathBuf {
        self.table_path(UmlsTable::SemanticTypes)
    }
}
