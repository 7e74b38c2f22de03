//! In-memory UMLS terminology index.
//!
//! [`TerminologyIndex::load`] is the only way to build an index. It detects
//! the release format, then runs the concept, relation and semantic type
//! passes in that order; the latter two filter against the finished concept
//! index. The result is immutable and can be shared between threads.
//!
//! ```ignore
//! use umls_loader::{TerminologyIndex, UmlsConfig};
//!
//! let index = TerminologyIndex::load("/data/2024AA/META", UmlsConfig::default())?;
//!
//! if let Some(strings) = index.search_by_code("C0018681") {
//!     println!("Headache synonyms: {:?}", strings);
//! }
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};
use umls_types::{Cui, Lui, RelationKey, TermVariants, UmlsTable};

use crate::concept::{ConceptIndex, ConceptIndexBuilder};
use crate::loader::discover_umls_files;
use crate::parser::TableSource;
use crate::relation::{Adjacency, RelationIndex, RelationIndexBuilder};
use crate::semantic_type::{SemanticTypeIndex, SemanticTypeIndexBuilder};
use crate::types::{LoadStats, UmlsConfig, UmlsFiles, UmlsResult};

/// Lookup index over a loaded UMLS release.
pub struct TerminologyIndex {
    files: UmlsFiles,
    concepts: ConceptIndex,
    relations: RelationIndex,
    semantic_types: SemanticTypeIndex,
    stats: LoadStats,
}

impl std::fmt::Debug for TerminologyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminologyIndex")
            .field("directory", &self.files.directory)
            .field("format", &self.files.format)
            .field("concepts", &self.concepts.concept_count())
            .field("strings", &self.concepts.string_count())
            .field("relations", &self.relations.len())
            .field("semantic_types", &self.semantic_types.len())
            .finish()
    }
}

impl TerminologyIndex {
    /// Loads a release directory.
    ///
    /// `path` may be the directory holding the tables or a release root
    /// with a `META` subdirectory.
    ///
    /// # Errors
    /// Fails if the directory does not exist, a required table is missing
    /// for the detected format, or a line is malformed (unless
    /// [`UmlsConfig::skip_malformed_lines`] is set). No partial index is
    /// returned.
    pub fn load<P: AsRef<Path>>(path: P, config: UmlsConfig) -> UmlsResult<Self> {
        let files = discover_umls_files(path)?;
        Self::load_files(files, &config)
    }

    /// Loads the tables of an already discovered release.
    pub fn load_files(files: UmlsFiles, config: &UmlsConfig) -> UmlsResult<Self> {
        let started = Instant::now();
        info!(
            directory = %files.directory.display(),
            format = ?files.format,
            "loading UMLS release"
        );

        let mut concept_builder = ConceptIndexBuilder::new(config);
        let mut lines_read =
            concept_builder.load(&TableSource::new(files.concept_file(), files.format))?;
        let concepts = concept_builder.build();

        let (relations, semantic_types) = if config.only_load_dict {
            debug!(
                "dictionary-only load, skipping {} and {}",
                UmlsTable::Relations,
                UmlsTable::SemanticTypes
            );
            (RelationIndex::default(), SemanticTypeIndex::default())
        } else {
            let mut relation_builder = RelationIndexBuilder::new(&concepts);
            lines_read += relation_builder
                .load(&TableSource::new(files.relation_file(), files.format), config)?;
            let relations = relation_builder.build();

            let mut type_builder = SemanticTypeIndexBuilder::new(&concepts);
            lines_read += type_builder
                .load(&TableSource::new(files.semantic_type_file(), files.format), config)?;
            (relations, type_builder.build())
        };

        let stats = LoadStats {
            concept_count: concepts.concept_count(),
            string_count: concepts.string_count(),
            accepted_names: concepts.accepted_names(),
            relation_count: relations.len(),
            semantic_type_count: semantic_types.len(),
            lines_read,
            load_time_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            concepts = stats.concept_count,
            strings = stats.string_count,
            names = stats.accepted_names,
            relations = stats.relation_count,
            semantic_types = stats.semantic_type_count,
            elapsed_ms = stats.load_time_ms,
            "UMLS release loaded"
        );

        Ok(Self {
            files,
            concepts,
            relations,
            semantic_types,
            stats,
        })
    }

    // Search

    /// Returns the normalized strings of a concept id or source code.
    ///
    /// `code` is first tried as a CUI, then as a source vocabulary code.
    /// Strings are returned in sorted order; `None` means not found.
    pub fn search_by_code(&self, code: &str) -> Option<Vec<String>> {
        let cui = if self.concepts.contains(code) {
            code
        } else {
            self.concepts.concept_for_code(code)?.as_str()
        };
        self.concepts
            .strings(cui)
            .map(|strings| strings.iter().cloned().collect())
    }

    /// Returns the synonyms of the first candidate string that resolves.
    ///
    /// Each candidate is tried as-is, then lowercased. The matched concept's
    /// strings are returned without any string that appears in `strings`.
    /// `None` means no candidate resolved.
    pub fn search_by_strings<S: AsRef<str>>(&self, strings: &[S]) -> Option<Vec<String>> {
        let cui = strings.iter().find_map(|candidate| {
            let candidate = candidate.as_ref();
            self.concepts
                .concept_for_string(candidate)
                .or_else(|| self.concepts.concept_for_string(&candidate.to_lowercase()))
        })?;

        let synonyms = self.concepts.strings(cui)?;
        Some(
            synonyms
                .iter()
                .filter(|s| !strings.iter().any(|c| c.as_ref() == s.as_str()))
                .cloned()
                .collect(),
        )
    }

    /// Looks up by code, falling back to candidate strings.
    ///
    /// When the code lookup finds nothing (or `code` is `None`), the string
    /// candidates are searched with [`search_by_strings`](Self::search_by_strings).
    /// Use [`search_by_code`](Self::search_by_code) directly for a code-only
    /// lookup. A `max_number` above zero truncates the result; zero returns
    /// everything.
    pub fn search<S: AsRef<str>>(
        &self,
        code: Option<&str>,
        strings: Option<&[S]>,
        max_number: usize,
    ) -> Option<Vec<String>> {
        let mut result = match code.and_then(|code| self.search_by_code(code)) {
            Some(result) => result,
            None => {
                let strings = strings?;
                debug!(
                    ?code,
                    candidates = strings.len(),
                    "code lookup missed, searching by strings"
                );
                self.search_by_strings(strings)?
            }
        };

        if max_number > 0 {
            result.truncate(max_number);
        }
        Some(result)
    }

    // Concepts

    /// Returns true if the concept has at least one accepted name.
    pub fn contains_concept(&self, cui: &str) -> bool {
        self.concepts.contains(cui)
    }

    /// All concept ids, shuffled once at load time.
    pub fn concept_ids(&self) -> &[Cui] {
        self.concepts.concept_ids()
    }

    /// Normalized strings of a concept.
    pub fn strings(&self, cui: &str) -> Option<&BTreeSet<String>> {
        self.concepts.strings(cui)
    }

    /// Concept a raw, lowercased or normalized string maps to.
    pub fn concept_for_string(&self, string: &str) -> Option<&Cui> {
        self.concepts.concept_for_string(string)
    }

    /// Concept a source code maps to.
    pub fn concept_for_code(&self, code: &str) -> Option<&Cui> {
        self.concepts.concept_for_code(code)
    }

    /// Term identities of a concept in load order.
    pub fn terms_for_concept(&self, cui: &str) -> Option<&[Lui]> {
        self.concepts.terms_for_concept(cui)
    }

    /// Term identities a string variant belongs to.
    pub fn terms_for_string(&self, string: &str) -> Option<&BTreeSet<Lui>> {
        self.concepts.terms_for_string(string)
    }

    /// String variants of a term identity.
    pub fn term_variants(&self, lui: &str) -> Option<&TermVariants> {
        self.concepts.term_variants(lui)
    }

    /// Concept a term identity belongs to.
    pub fn concept_for_term(&self, lui: &str) -> Option<&Cui> {
        self.concepts.concept_for_term(lui)
    }

    /// Semantic type of a concept.
    pub fn semantic_type(&self, cui: &str) -> Option<&str> {
        self.semantic_types.get(cui)
    }

    // Relations

    /// All distinct relations, sorted.
    pub fn relations(&self) -> &[RelationKey] {
        self.relations.relations()
    }

    /// Relations leaving a concept, by relation type.
    pub fn outgoing_relations(&self, cui: &str) -> Option<&Adjacency> {
        self.relations.outgoing(cui)
    }

    /// Relations arriving at a concept, by relation type.
    pub fn incoming_relations(&self, cui: &str) -> Option<&Adjacency> {
        self.relations.incoming(cui)
    }

    /// Targets of `cui` under one relation type.
    pub fn related(&self, cui: &str, relation_type: &str) -> Option<&BTreeSet<Cui>> {
        self.relations.outgoing(cui)?.get(relation_type)
    }

    /// Sources pointing at `cui` under one relation type.
    pub fn related_inverse(&self, cui: &str, relation_type: &str) -> Option<&BTreeSet<Cui>> {
        self.relations.incoming(cui)?.get(relation_type)
    }

    // Metadata

    /// The release files this index was loaded from.
    pub fn files(&self) -> &UmlsFiles {
        &self.files
    }

    /// Load statistics.
    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    /// Number of concepts.
    pub fn concept_count(&self) -> usize {
        self.concepts.concept_count()
    }

    /// Number of distinct string keys.
    pub fn string_count(&self) -> usize {
        self.concepts.string_count()
    }

    /// Number of distinct relations.
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// The concept lookup tables.
    pub fn concept_index(&self) -> &ConceptIndex {
        &self.concepts
    }

    /// The relation adjacency.
    pub fn relation_index(&self) -> &RelationIndex {
        &self.relations
    }

    /// The semantic type mapping.
    pub fn semantic_type_index(&self) -> &SemanticTypeIndex {
        &self.semantic_types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn conso(cui: &str, ts: &str, lui: &str, code: &str, string: &str) -> String {
        [
            cui, "ENG", ts, lui, "PF", "S1", "Y", "A1", "", "", "", "MSH", "PT", code, string, "0",
            "N", "", "",
        ]
        .join("|")
    }

    fn rel(cui1: &str, attr: &str, cui2: &str, rela: &str) -> String {
        [
            cui1, "A1", "AUI", attr, cui2, "A2", "AUI", rela, "R1", "", "MSH", "MSH", "", "N", "N",
            "",
        ]
        .join("|")
    }

    fn sty(cui: &str, label: &str) -> String {
        [cui, "T184", "A2.2.2", label, "AT1", "256", ""].join("|")
    }

    fn write_release() -> TempDir {
        let dir = tempdir().unwrap();
        let names = [
            conso("C0018681", "P", "L1", "D006261", "Headache"),
            conso("C0018681", "P", "L2", "D006261", "Cephalalgia"),
            conso("C0018681", "P", "L3", "R51", "Head pain"),
            conso("C0018681", "P", "L4", "R51", "Cranial pain"),
            conso("C0018681", "P", "L5", "R51", "Pain in head (NOS)"),
            conso("C0018681", "S", "L6", "R51", "Suppressed synonym"),
            conso("C0015967", "P", "L7", "D005334", "Fever"),
        ];
        let relations = [
            rel("C0018681", "RO", "C0015967", "associated_with"),
            rel("C0018681", "RO", "C0015967", "associated_with"),
            rel("C0018681", "RO", "C0018681", "same_as"),
            rel("C0018681", "RO", "C9999999", "associated_with"),
        ];
        let types = [
            sty("C0018681", "Finding"),
            sty("C0018681", "Sign or Symptom"),
            sty("C9999999", "Disease or Syndrome"),
        ];
        fs::write(dir.path().join("MRCONSO.RRF"), names.join("\n") + "\n").unwrap();
        fs::write(dir.path().join("MRREL.RRF"), relations.join("\n") + "\n").unwrap();
        fs::write(dir.path().join("MRSTY.RRF"), types.join("\n") + "\n").unwrap();
        dir
    }

    fn load(dir: &TempDir) -> TerminologyIndex {
        TerminologyIndex::load(dir.path(), UmlsConfig::default().with_shuffle_seed(42)).unwrap()
    }

    #[test]
    fn test_search_by_code() {
        let dir = write_release();
        let index = load(&dir);

        let by_cui = index.search_by_code("C0018681").unwrap();
        assert_eq!(
            by_cui,
            vec!["cephalalgia", "cranial pain", "head pain", "headache", "pain in head"]
        );

        // Source code resolves to its concept
        assert_eq!(index.search_by_code("D005334").unwrap(), vec!["fever"]);
        assert_eq!(index.search_by_code("R51").unwrap(), by_cui);
        assert_eq!(index.search_by_code("UNKNOWN"), None);
    }

    #[test]
    fn test_search_by_strings() {
        let dir = write_release();
        let index = load(&dir);

        // Exact hit excludes the candidate itself
        let result = index.search_by_strings(&["headache"]).unwrap();
        assert_eq!(result, vec!["cephalalgia", "cranial pain", "head pain", "pain in head"]);

        // Lowercased hit; every input candidate is excluded
        let result = index
            .search_by_strings(&["unknownterm", "HEAD PAIN", "cranial pain"])
            .unwrap();
        assert_eq!(result, vec!["cephalalgia", "head pain", "headache", "pain in head"]);

        assert_eq!(index.search_by_strings(&["unknownterm"]), None);
        assert_eq!(index.search_by_strings::<&str>(&[]), None);
    }

    #[test]
    fn test_search_truncates() {
        let dir = write_release();
        let index = load(&dir);

        let result = index.search(Some("C0018681"), None::<&[&str]>, 2).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result, vec!["cephalalgia", "cranial pain"]);

        assert_eq!(index.search(Some("C0018681"), None::<&[&str]>, 0).unwrap().len(), 5);
        assert_eq!(index.search(Some("C0018681"), None::<&[&str]>, 100).unwrap().len(), 5);
    }

    #[test]
    fn test_search_falls_back_to_strings() {
        let dir = write_release();
        let index = load(&dir);

        // Exclusion is literal, so the normalized form survives
        let result = index.search(Some("UNKNOWN"), Some(&["Fever"][..]), 0).unwrap();
        assert_eq!(result, vec!["fever"]);

        let result = index.search(Some("UNKNOWN"), Some(&["fever"][..]), 0).unwrap();
        assert!(result.is_empty());

        let result = index.search(None, Some(&["cephalalgia"][..]), 1).unwrap();
        assert_eq!(result, vec!["cranial pain"]);

        assert_eq!(index.search(Some("UNKNOWN"), None::<&[&str]>, 0), None);
        assert_eq!(index.search(Some("UNKNOWN"), Some(&["nothing"][..]), 0), None);
    }

    #[test]
    fn test_search_accepts_owned_candidates() {
        let dir = write_release();
        let index = load(&dir);

        let candidates = vec!["Unknown".to_string(), "cephalalgia".to_string()];
        let result = index.search(None, Some(&candidates[..]), 0).unwrap();
        assert_eq!(result, index.search_by_strings(&candidates[..]).unwrap());
        assert!(!result.contains(&"cephalalgia".to_string()));
    }

    #[test]
    fn test_relations_and_types() {
        let dir = write_release();
        let index = load(&dir);

        assert_eq!(index.relation_count(), 1);
        let targets = index.related("C0018681", "associated_with").unwrap();
        assert!(targets.contains("C0015967"));
        let sources = index.related_inverse("C0015967", "associated_with").unwrap();
        assert!(sources.contains("C0018681"));
        assert!(index.related("C0018681", "same_as").is_none());

        assert_eq!(index.semantic_type("C0018681"), Some("Sign or Symptom"));
        assert_eq!(index.semantic_type("C0015967"), None);
        assert_eq!(index.semantic_type("C9999999"), None);
    }

    #[test]
    fn test_stats() {
        let dir = write_release();
        let index = load(&dir);
        let stats = index.stats();

        assert_eq!(stats.concept_count, 2);
        assert_eq!(stats.accepted_names, 6);
        assert_eq!(stats.relation_count, 1);
        assert_eq!(stats.semantic_type_count, 1);
        assert_eq!(stats.lines_read, 7 + 4 + 3);
        assert_eq!(stats.string_count, index.string_count());
    }

    #[test]
    fn test_code_index_points_at_known_concepts() {
        let dir = write_release();
        let index = load(&dir);

        for code in ["D006261", "R51", "D005334"] {
            let cui = index.concept_for_code(code).unwrap();
            assert!(index.strings(cui).is_some());
        }
    }

    #[test]
    fn test_index_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TerminologyIndex>();
    }
}
