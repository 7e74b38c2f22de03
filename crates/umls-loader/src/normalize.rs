//! Display string normalization.
//!
//! Builds the lookup key stored for every accepted name: lowercased, without
//! parenthesized qualifiers or "NOS" markers, dashes folded to spaces and
//! whitespace collapsed.

use std::sync::LazyLock;

use regex::Regex;
use umls_types::well_known;

/// Non-greedy parenthesized substring.
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("bracket pattern is valid"));

/// Independently toggleable normalization steps. All are on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Lowercase the string.
    pub lowercase: bool,
    /// Drop standalone "NOS" tokens, case-insensitively.
    pub strip_nos: bool,
    /// Remove parenthesized substrings.
    pub strip_brackets: bool,
    /// Replace dash characters with spaces.
    pub fold_dashes: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            strip_nos: true,
            strip_brackets: true,
            fold_dashes: true,
        }
    }
}

/// Normalizes a display string with the default options.
///
/// # Examples
///
/// ```
/// use umls_loader::normalize;
///
/// assert_eq!(normalize("Heart Attack (NOS)"), "heart attack");
/// assert_eq!(normalize("Pre-existing condition"), "pre existing condition");
/// assert_eq!(normalize(" Diabetes Mellitus "), "diabetes mellitus");
/// ```
pub fn normalize(term: &str) -> String {
    normalize_with(term, &NormalizeOptions::default())
}

/// Normalizes a display string.
///
/// The result is single-space separated with no leading or trailing
/// whitespace, and normalizing it again returns it unchanged.
pub fn normalize_with(term: &str, options: &NormalizeOptions) -> String {
    let mut term = if options.lowercase {
        term.to_lowercase()
    } else {
        term.to_string()
    };

    if options.strip_brackets {
        term = BRACKETED.replace_all(&term, "").into_owned();
    }

    if options.fold_dashes {
        term = term.replace(is_dash, " ");
    }

    // NOS runs on whole tokens after folding so "pain-NOS" and "(x) NOS"
    // lose the marker on the first pass too.
    term.split_whitespace()
        .filter(|token| !(options.strip_nos && token.eq_ignore_ascii_case(well_known::NOS_TOKEN)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_dash(c: char) -> bool {
    matches!(
        c,
        '-' | '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}'
    )
}
