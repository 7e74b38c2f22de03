//! UMLS semantic type table (`MRSTY`) parser and index builder.

use std::collections::HashMap;

use tracing::info;
use umls_types::{Cui, SemanticType, UmlsTable};

use crate::concept::ConceptIndex;
use crate::parser::{RecordFields, TableSource, UmlsRecord};
use crate::types::{SemanticTypeColumns, UmlsConfig, UmlsResult};

impl UmlsRecord for SemanticType {
    const TABLE: UmlsTable = UmlsTable::SemanticTypes;
    type Columns = SemanticTypeColumns;

    fn from_fields(fields: &RecordFields<'_>, columns: &SemanticTypeColumns) -> UmlsResult<Self> {
        Ok(SemanticType {
            cui: fields.get(columns.cui, "cui")?,
            label: fields.get(columns.label, "label")?,
        })
    }
}

/// Accumulates one semantic type label per known concept.
///
/// A concept listed more than once keeps the last label read.
#[derive(Debug)]
pub struct SemanticTypeIndexBuilder<'a> {
    concepts: &'a ConceptIndex,
    cui_to_type: HashMap<Cui, String>,
}

impl<'a> SemanticTypeIndexBuilder<'a> {
    /// Creates a builder filtering against a completed concept index.
    pub fn new(concepts: &'a ConceptIndex) -> Self {
        Self {
            concepts,
            cui_to_type: HashMap::new(),
        }
    }

    /// Streams a semantic type table into the builder.
    ///
    /// Returns the number of lines read.
    pub fn load(&mut self, source: &TableSource, config: &UmlsConfig) -> UmlsResult<usize> {
        let mut parser = source
            .records::<SemanticType>(config.schema.semantic_types, config.skip_malformed_lines)?;

        for sty in parser.by_ref() {
            self.insert(sty?);
        }

        Ok(parser.records_read())
    }

    /// Records a type; returns false if the concept is unknown.
    pub fn insert(&mut self, sty: SemanticType) -> bool {
        if !self.concepts.contains(&sty.cui) {
            return false;
        }
        self.cui_to_type.insert(sty.cui, sty.label);
        true
    }

    /// Finishes the pass.
    pub fn build(self) -> SemanticTypeIndex {
        info!(types = self.cui_to_type.len(), "built semantic type index");
        SemanticTypeIndex {
            cui_to_type: self.cui_to_type,
        }
    }
}

/// Immutable concept → semantic type mapping.
#[derive(Debug, Clone, Default)]
pub struct SemanticTypeIndex {
    cui_to_type: HashMap<Cui, String>,
}

impl SemanticTypeIndex {
    /// Semantic type of a concept.
    pub fn get(&self, cui: &str) -> Option<&str> {
        self.cui_to_type.get(cui).map(String::as_str)
    }

    /// Number of concepts with a type.
    pub fn len(&self) -> usize {
        self.cui_to_type.len()
    }

    /// Returns true if no types were recorded.
    pub fn is_empty(&self) -> bool {
        self.cui_to_type.is_empty()
    }
}
