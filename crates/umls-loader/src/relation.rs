//! UMLS relation table (`MRREL`) parser and relation index builder.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::info;
use umls_types::{Cui, Relation, RelationKey, UmlsTable};

use crate::concept::ConceptIndex;
use crate::parser::{RecordFields, TableSource, UmlsRecord};
use crate::types::{RelationColumns, UmlsConfig, UmlsResult};

impl UmlsRecord for Relation {
    const TABLE: UmlsTable = UmlsTable::Relations;
    type Columns = RelationColumns;

    fn from_fields(fields: &RecordFields<'_>, columns: &RelationColumns) -> UmlsResult<Self> {
        Ok(Relation {
            source_cui: fields.get(columns.source_cui, "source_cui")?,
            relation_attr: fields.get(columns.relation_attr, "relation_attr")?,
            target_cui: fields.get(columns.target_cui, "target_cui")?,
            relation_type: fields.get(columns.relation_type, "relation_type")?,
        })
    }
}

/// Relation type → related concepts, for one concept.
pub type Adjacency = HashMap<String, BTreeSet<Cui>>;

/// Accumulates relations between known concepts.
///
/// Relations are kept only when both endpoints are in the concept index and
/// differ from each other, and are deduplicated on
/// (source, target, relation-attr, relation-type).
#[derive(Debug)]
pub struct RelationIndexBuilder<'a> {
    concepts: &'a ConceptIndex,
    relations: HashSet<RelationKey>,
    outgoing: HashMap<Cui, Adjacency>,
    incoming: HashMap<Cui, Adjacency>,
}

impl<'a> RelationIndexBuilder<'a> {
    /// Creates a builder filtering against a completed concept index.
    pub fn new(concepts: &'a ConceptIndex) -> Self {
        Self {
            concepts,
            relations: HashSet::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
        }
    }

    /// Streams a relation table into the builder.
    ///
    /// Returns the number of lines read.
    pub fn load(&mut self, source: &TableSource, config: &UmlsConfig) -> UmlsResult<usize> {
        let mut parser =
            source.records::<Relation>(config.schema.relations, config.skip_malformed_lines)?;

        for relation in parser.by_ref() {
            self.insert(relation?);
        }

        Ok(parser.records_read())
    }

    /// Adds one relation.
    ///
    /// Returns true if it was stored, false if an endpoint is unknown, it is
    /// a self-relation or it was already stored.
    pub fn insert(&mut self, relation: Relation) -> bool {
        if !self.concepts.contains(&relation.source_cui)
            || !self.concepts.contains(&relation.target_cui)
            || relation.is_self_relation()
        {
            return false;
        }

        let key = RelationKey::from(relation);
        if self.relations.contains(&key) {
            return false;
        }

        self.outgoing
            .entry(key.source_cui.clone())
            .or_default()
            .entry(key.relation_type.clone())
            .or_default()
            .insert(key.target_cui.clone());
        self.incoming
            .entry(key.target_cui.clone())
            .or_default()
            .entry(key.relation_type.clone())
            .or_default()
            .insert(key.source_cui.clone());
        self.relations.insert(key);
        true
    }

    /// Finishes the pass.
    pub fn build(self) -> RelationIndex {
        let mut relations: Vec<RelationKey> = self.relations.into_iter().collect();
        relations.sort();

        info!(relations = relations.len(), "built relation index");

        RelationIndex {
            relations,
            outgoing: self.outgoing,
            incoming: self.incoming,
        }
    }
}

/// Immutable relation adjacency produced by [`RelationIndexBuilder`].
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    relations: Vec<RelationKey>,
    outgoing: HashMap<Cui, Adjacency>,
    incoming: HashMap<Cui, Adjacency>,
}

impl RelationIndex {
    /// All distinct relations, sorted.
    pub fn relations(&self) -> &[RelationKey] {
        &self.relations
    }

    /// Number of distinct relations.
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Returns true if no relations were stored.
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Relations where the concept is the source, by relation type.
    pub fn outgoing(&self, cui: &str) -> Option<&Adjacency> {
        self.outgoing.get(cui)
    }

    /// Relations where the concept is the target, by relation type.
    pub fn incoming(&self, cui: &str) -> Option<&Adjacency> {
        self.incoming.get(cui)
    }
}
