//! UMLS release enumerations.
//!
//! Provides the release format tag detected for a release directory and the
//! table kinds the loader reads.

/// File naming and field-splitting convention of a release.
///
/// # Examples
///
/// ```
/// use umls_types::ReleaseFormat;
///
/// assert_eq!(ReleaseFormat::Rrf.extension(), "RRF");
/// assert_eq!(ReleaseFormat::QuotedCsv.delimiter(), b',');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReleaseFormat {
    /// Native pipe-delimited Rich Release Format (`MRCONSO.RRF`).
    Rrf,
    /// Comma-separated export with quoted fields (`MRCONSO.txt`).
    QuotedCsv,
}

impl ReleaseFormat {
    /// File extension used by tables in this format (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Rrf => "RRF",
            Self::QuotedCsv => "txt",
        }
    }

    /// Field delimiter byte.
    pub fn delimiter(self) -> u8 {
        match self {
            Self::Rrf => b'|',
            Self::QuotedCsv => b',',
        }
    }
}

/// A table of a UMLS release read by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UmlsTable {
    /// Concept names and sources (`MRCONSO`).
    Concepts,
    /// Related concepts (`MRREL`).
    Relations,
    /// Semantic types (`MRSTY`).
    SemanticTypes,
}

impl UmlsTable {
    /// Table name without extension.
    pub fn stem(self) -> &'static str {
        match self {
            Self::Concepts => "MRCONSO",
            Self::Relations => "MRREL",
            Self::SemanticTypes => "MRSTY",
        }
    }

    /// File name of this table in the given release format.
    ///
    /// # Examples
    ///
    /// ```
    /// use umls_types::{ReleaseFormat, UmlsTable};
    ///
    /// assert_eq!(UmlsTable::Relations.file_name(ReleaseFormat::QuotedCsv), "MRREL.txt");
    /// ```
    pub fn file_name(self, format: ReleaseFormat) -> String {
        format!("{}.{}", self.stem(), format.extension())
    }
}

impl std::fmt::Display for UmlsTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.stem())
    }
}
