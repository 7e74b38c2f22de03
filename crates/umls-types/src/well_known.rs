//! Well-known UMLS values.
//!
//! # Examples
//!
//! ```
//! use umls_types::well_known;
//!
//! assert_eq!(well_known::LANGUAGE_ENGLISH, "ENG");
//! assert_eq!(well_known::PREFERRED_MARKER, "p");
//! ```

// =============================================================================
// Languages
// =============================================================================

/// English (LAT column value).
pub const LANGUAGE_ENGLISH: &str = "ENG";

// =============================================================================
// Term status
// =============================================================================

/// Lowercase marker carried by preferred term statuses (TS = "P").
pub const PREFERRED_MARKER: &str = "p";

// =============================================================================
// Release layout
// =============================================================================

/// Subdirectory holding the Metathesaurus tables in a full UMLS release.
pub const META_DIR: &str = "META";

/// Standalone token meaning "not otherwise specified".
pub const NOS_TOKEN: &str = "nos";
