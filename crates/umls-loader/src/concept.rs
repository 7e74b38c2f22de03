//! UMLS concept name table (`MRCONSO`) parser and concept index builder.

use std::collections::{BTreeSet, HashMap, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;
use umls_types::{Code, ConceptName, Cui, Lui, TermVariants, UmlsTable};

use crate::normalize::normalize_with;
use crate::parser::{RecordFields, TableSource, UmlsRecord};
use crate::types::{ConceptColumns, UmlsConfig, UmlsResult};

impl UmlsRecord for ConceptName {
    const TABLE: UmlsTable = UmlsTable::Concepts;
    type Columns = ConceptColumns;

    fn from_fields(fields: &RecordFields<'_>, columns: &ConceptColumns) -> UmlsResult<Self> {
        Ok(ConceptName {
            cui: fields.get(columns.cui, "cui")?,
            language: fields.get(columns.language, "language")?,
            term_status: fields.get(columns.term_status, "term_status")?,
            lui: fields.get(columns.lui, "lui")?,
            source: fields.get(columns.source, "source")?,
            code: fields.get(columns.code, "code")?,
            string: fields.get(columns.string, "string")?,
        })
    }
}

/// Filter for concept names by status, vocabulary and language.
pub trait ConceptFilter {
    /// Returns true if the name passes the configured filters.
    fn passes_concept_filter(&self, config: &UmlsConfig) -> bool;
}

impl ConceptFilter for ConceptName {
    fn passes_concept_filter(&self, config: &UmlsConfig) -> bool {
        if !self.has_status_marker(&config.preferred_marker) {
            return false;
        }

        if let Some(ref sources) = config.source_range {
            if !sources.contains(&self.source) {
                return false;
            }
        }

        if let Some(ref languages) = config.lang_range {
            if !languages.contains(&self.language) {
                return false;
            }
        }

        true
    }
}

/// Accumulates concept names into the string and code indices.
///
/// Each term identity is indexed at most once: the first accepted name
/// carrying a LUI wins and later names with the same LUI are ignored, even
/// for a different concept.
#[derive(Debug)]
pub struct ConceptIndexBuilder {
    config: UmlsConfig,
    seen_luis: HashSet<Lui>,
    concept_order: Vec<Cui>,
    cui_to_strings: HashMap<Cui, BTreeSet<String>>,
    string_to_cui: HashMap<String, Cui>,
    code_to_cui: HashMap<Code, Cui>,
    lui_to_strings: HashMap<Lui, TermVariants>,
    string_to_luis: HashMap<String, BTreeSet<Lui>>,
    cui_to_luis: HashMap<Cui, Vec<Lui>>,
    lui_to_cui: HashMap<Lui, Cui>,
    accepted: usize,
}

impl ConceptIndexBuilder {
    /// Creates an empty builder.
    pub fn new(config: &UmlsConfig) -> Self {
        Self {
            config: config.clone(),
            seen_luis: HashSet::new(),
            concept_order: Vec::new(),
            cui_to_strings: HashMap::new(),
            string_to_cui: HashMap::new(),
            code_to_cui: HashMap::new(),
            lui_to_strings: HashMap::new(),
            string_to_luis: HashMap::new(),
            cui_to_luis: HashMap::new(),
            lui_to_cui: HashMap::new(),
            accepted: 0,
        }
    }

    /// Streams a concept name table into the builder.
    ///
    /// Returns the number of lines read.
    pub fn load(&mut self, source: &TableSource) -> UmlsResult<usize> {
        let mut parser = source.records::<ConceptName>(
            self.config.schema.concepts,
            self.config.skip_malformed_lines,
        )?;

        for name in parser.by_ref() {
            self.insert(name?);
        }

        Ok(parser.records_read())
    }

    /// Indexes one name record.
    ///
    /// Returns true if the record was accepted, false if it was filtered out
    /// or its term identity was already indexed.
    pub fn insert(&mut self, name: ConceptName) -> bool {
        if !name.passes_concept_filter(&self.config) || self.seen_luis.contains(&name.lui) {
            return false;
        }

        let ConceptName {
            cui,
            lui,
            code,
            string,
            ..
        } = name;

        let variants = TermVariants {
            lowercase: string.to_lowercase(),
            normalized: normalize_with(&string, &self.config.normalize),
            original: string,
        };

        for variant in variants.iter() {
            self.string_to_cui.insert(variant.to_string(), cui.clone());
            self.string_to_luis
                .entry(variant.to_string())
                .or_default()
                .insert(lui.clone());
        }

        if !self.cui_to_strings.contains_key(&cui) {
            self.concept_order.push(cui.clone());
        }
        self.cui_to_strings
            .entry(cui.clone())
            .or_default()
            .insert(variants.normalized.clone());
        self.code_to_cui.insert(code, cui.clone());

        self.lui_to_strings.insert(lui.clone(), variants);
        self.lui_to_cui.insert(lui.clone(), cui.clone());
        self.cui_to_luis.entry(cui).or_default().push(lui.clone());
        self.seen_luis.insert(lui);

        self.accepted += 1;
        true
    }

    /// Returns the number of accepted records so far.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Finishes the pass and shuffles the concept order.
    ///
    /// The shuffle starts from first-seen order, so a fixed seed over the
    /// same records always yields the same order.
    pub fn build(self) -> ConceptIndex {
        let mut concept_ids = self.concept_order;
        let mut rng = match self.config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        concept_ids.shuffle(&mut rng);

        let index = ConceptIndex {
            concept_ids,
            cui_to_strings: self.cui_to_strings,
            string_to_cui: self.string_to_cui,
            code_to_cui: self.code_to_cui,
            lui_to_strings: self.lui_to_strings,
            string_to_luis: self.string_to_luis,
            cui_to_luis: self.cui_to_luis,
            lui_to_cui: self.lui_to_cui,
            accepted_names: self.accepted,
        };

        info!(
            concepts = index.concept_count(),
            strings = index.string_count(),
            accepted = index.accepted_names,
            "built concept index"
        );

        index
    }
}

/// Immutable concept lookup tables produced by [`ConceptIndexBuilder`].
#[derive(Debug, Clone, Default)]
pub struct ConceptIndex {
    concept_ids: Vec<Cui>,
    cui_to_strings: HashMap<Cui, BTreeSet<String>>,
    string_to_cui: HashMap<String, Cui>,
    code_to_cui: HashMap<Code, Cui>,
    lui_to_strings: HashMap<Lui, TermVariants>,
    string_to_luis: HashMap<String, BTreeSet<Lui>>,
    cui_to_luis: HashMap<Cui, Vec<Lui>>,
    lui_to_cui: HashMap<Lui, Cui>,
    accepted_names: usize,
}

impl ConceptIndex {
    /// Returns true if the concept has at least one accepted name.
    pub fn contains(&self, cui: &str) -> bool {
        self.cui_to_strings.contains_key(cui)
    }

    /// All concept ids in shuffled order.
    pub fn concept_ids(&self) -> &[Cui] {
        &self.concept_ids
    }

    /// Normalized strings of a concept.
    pub fn strings(&self, cui: &str) -> Option<&BTreeSet<String>> {
        self.cui_to_strings.get(cui)
    }

    /// Concept a string variant maps to.
    pub fn concept_for_string(&self, string: &str) -> Option<&Cui> {
        self.string_to_cui.get(string)
    }

    /// Concept a source code maps to.
    pub fn concept_for_code(&self, code: &str) -> Option<&Cui> {
        self.code_to_cui.get(code)
    }

    /// String variants recorded for a term identity.
    pub fn term_variants(&self, lui: &str) -> Option<&TermVariants> {
        self.lui_to_strings.get(lui)
    }

    /// Term identities a string variant belongs to.
    pub fn terms_for_string(&self, string: &str) -> Option<&BTreeSet<Lui>> {
        self.string_to_luis.get(string)
    }

    /// Term identities of a concept in load order.
    pub fn terms_for_concept(&self, cui: &str) -> Option<&[Lui]> {
        self.cui_to_luis.get(cui).map(Vec::as_slice)
    }

    /// Concept a term identity belongs to.
    pub fn concept_for_term(&self, lui: &str) -> Option<&Cui> {
        self.lui_to_cui.get(lui)
    }

    /// Number of concepts.
    pub fn concept_count(&self) -> usize {
        self.concept_ids.len()
    }

    /// Number of distinct string keys.
    pub fn string_count(&self) -> usize {
        self.string_to_cui.len()
    }

    /// Number of accepted name records.
    pub fn accepted_names(&self) -> usize {
        self.accepted_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv::StringRecord;
    use umls_types::ReleaseFormat;

    fn make_record(fields: &[&str]) -> StringRecord {
        let mut record = StringRecord::new();
        for field in fields {
            record.push_field(field);
        }
        record
    }

    fn make_name(cui: &str, lui: &str, code: &str, string: &str) -> ConceptName {
        ConceptName {
            cui: cui.to_string(),
            language: "ENG".to_string(),
            term_status: "P".to_string(),
            lui: lui.to_string(),
            source: "MSH".to_string(),
            code: code.to_string(),
            string: string.to_string(),
        }
    }

    fn builder() -> ConceptIndexBuilder {
        ConceptIndexBuilder::new(&UmlsConfig::default().with_shuffle_seed(1))
    }

    #[test]
    fn test_parse_concept_record() {
        let record = make_record(&[
            "C0018681", "ENG", "P", "L0018681", "PF", "S0046854", "Y", "A0066000", "", "M0009824",
            "D006261", "MSH", "MH", "D006261", "Headache", "0", "N", "", "",
        ]);
        let fields = RecordFields::new(&record, ReleaseFormat::Rrf, UmlsTable::Concepts);
        let name = ConceptName::from_fields(&fields, &ConceptColumns::default()).unwrap();

        assert_eq!(name.cui, "C0018681");
        assert_eq!(name.language, "ENG");
        assert_eq!(name.term_status, "P");
        assert_eq!(name.lui, "L0018681");
        assert_eq!(name.source, "MSH");
        assert_eq!(name.code, "D006261");
        assert_eq!(name.string, "Headache");
    }

    #[test]
    fn test_filters() {
        let config = UmlsConfig::default().with_sources(["MSH"]);
        let name = make_name("C1", "L1", "X1", "Headache");
        assert!(name.passes_concept_filter(&config));

        let suppressed = ConceptName {
            term_status: "S".to_string(),
            ..name.clone()
        };
        assert!(!suppressed.passes_concept_filter(&config));

        let french = ConceptName {
            language: "FRE".to_string(),
            ..name.clone()
        };
        assert!(!french.passes_concept_filter(&config));
        assert!(french.passes_concept_filter(&config.clone().all_languages()));

        let other_source = ConceptName {
            source: "ICD10".to_string(),
            ..name.clone()
        };
        assert!(!other_source.passes_concept_filter(&config));
        assert!(other_source.passes_concept_filter(&UmlsConfig::default()));
    }

    #[test]
    fn test_insert_populates_all_tables() {
        let mut builder = builder();
        assert!(builder.insert(make_name("C1", "L1", "D1", "Heart Attack (NOS)")));
        let index = builder.build();

        assert!(index.contains("C1"));
        assert_eq!(index.concept_for_string("Heart Attack (NOS)"), Some(&"C1".to_string()));
        assert_eq!(index.concept_for_string("heart attack (nos)"), Some(&"C1".to_string()));
        assert_eq!(index.concept_for_string("heart attack"), Some(&"C1".to_string()));
        assert_eq!(index.concept_for_code("D1"), Some(&"C1".to_string()));

        let strings: Vec<&String> = index.strings("C1").unwrap().iter().collect();
        assert_eq!(strings, vec!["heart attack"]);

        let variants = index.term_variants("L1").unwrap();
        assert_eq!(variants.original, "Heart Attack (NOS)");
        assert_eq!(variants.lowercase, "heart attack (nos)");
        assert_eq!(variants.normalized, "heart attack");

        assert!(index.terms_for_string("heart attack").unwrap().contains("L1"));
        assert_eq!(index.terms_for_concept("C1"), Some(&["L1".to_string()][..]));
        assert_eq!(index.concept_for_term("L1"), Some(&"C1".to_string()));
        assert_eq!(index.accepted_names(), 1);
        assert_eq!(index.string_count(), 3);
    }

    #[test]
    fn test_term_identity_first_write_wins() {
        let mut builder = builder();
        assert!(builder.insert(make_name("C1", "L1", "D1", "Headache")));
        // Same LUI, even for another concept, is ignored
        assert!(!builder.insert(make_name("C2", "L1", "D2", "Cephalgia")));
        assert_eq!(builder.accepted(), 1);

        let index = builder.build();
        assert!(!index.contains("C2"));
        assert_eq!(index.concept_for_code("D2"), None);
        assert_eq!(index.concept_for_term("L1"), Some(&"C1".to_string()));
    }

    #[test]
    fn test_filtered_record_does_not_consume_lui() {
        let mut builder = builder();
        let suppressed = ConceptName {
            term_status: "S".to_string(),
            ..make_name("C1", "L1", "D1", "Head pain")
        };
        assert!(!builder.insert(suppressed));
        assert!(builder.insert(make_name("C1", "L1", "D1", "Headache")));
    }

    #[test]
    fn test_string_collision_last_write_wins() {
        let mut builder = builder();
        builder.insert(make_name("C1", "L1", "D1", "Cold"));
        builder.insert(make_name("C2", "L2", "D2", "cold"));
        let index = builder.build();

        // Both concepts keep the normalized string
        assert!(index.strings("C1").unwrap().contains("cold"));
        assert!(index.strings("C2").unwrap().contains("cold"));
        // Forward lookups resolve to the later concept
        assert_eq!(index.concept_for_string("cold"), Some(&"C2".to_string()));
        assert_eq!(index.concept_for_string("Cold"), Some(&"C1".to_string()));
        assert_eq!(
            index.terms_for_string("cold").unwrap().iter().collect::<Vec<_>>(),
            vec!["L1", "L2"]
        );
    }

    #[test]
    fn test_code_collision_last_write_wins() {
        let mut builder = builder();
        builder.insert(make_name("C1", "L1", "SHARED", "Fever"));
        builder.insert(make_name("C2", "L2", "SHARED", "Pyrexia of unknown origin"));
        let index = builder.build();
        assert_eq!(index.concept_for_code("SHARED"), Some(&"C2".to_string()));
    }

    #[test]
    fn test_concept_strings_accumulate() {
        let mut builder = builder();
        builder.insert(make_name("C1", "L1", "D1", "Headache"));
        builder.insert(make_name("C1", "L2", "D1", "Cephalgia"));
        builder.insert(make_name("C1", "L3", "D1", "HEADACHE"));
        let index = builder.build();

        let strings: Vec<&String> = index.strings("C1").unwrap().iter().collect();
        assert_eq!(strings, vec!["cephalgia", "headache"]);
        assert_eq!(index.terms_for_concept("C1").unwrap().len(), 3);
        assert_eq!(index.accepted_names(), 3);
    }

    #[test]
    fn test_build_contains_every_concept() {
        let mut builder = builder();
        for i in 0..20 {
            builder.insert(make_name(&format!("C{i}"), &format!("L{i}"), &format!("D{i}"), &format!("term {i}")));
        }
        let index = builder.build();

        let mut ids = index.concept_ids().to_vec();
        ids.sort();
        let mut expected: Vec<String> = (0..20).map(|i| format!("C{i}")).collect();
        expected.sort();
        assert_eq!(ids, expected);
        assert_eq!(index.concept_count(), 20);
    }

    #[test]
    fn test_seeded_shuffle_is_deterministic() {
        let build = || {
            let mut builder = builder();
            for i in 0..50 {
                builder.insert(make_name(&format!("C{i}"), &format!("L{i}"), "X", "t"));
            }
            builder.build().concept_ids().to_vec()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_seeded_shuffle_follows_insertion_order() {
        let build = |order: &[usize]| {
            let mut builder = builder();
            for &i in order {
                builder.insert(make_name(&format!("C{i}"), &format!("L{i}"), "X", "t"));
            }
            builder.build().concept_ids().to_vec()
        };
        let forward: Vec<usize> = (0..30).collect();
        let backward: Vec<usize> = (0..30).rev().collect();

        // Fresh builders agree for the same input order
        assert_eq!(build(&forward), build(&forward));
        assert_eq!(build(&backward), build(&backward));
        // Repeated names for a concept do not move it
        let mut repeated = builder();
        for i in 0..30 {
            repeated.insert(make_name(&format!("C{i}"), &format!("L{i}"), "X", "t"));
            repeated.insert(make_name(&format!("C{i}"), &format!("M{i}"), "X", "u"));
        }
        assert_eq!(repeated.build().concept_ids().to_vec(), build(&forward));
    }
}
