//! UMLS release discovery and format detection.

use std::path::{Path, PathBuf};

use tracing::debug;
use umls_types::{well_known, ReleaseFormat, UmlsTable};

use crate::types::{UmlsError, UmlsFiles, UmlsResult};

/// Detects the release format of a directory holding Metathesaurus tables.
///
/// The presence of `MRCONSO.RRF` selects the pipe-delimited format; anything
/// else is assumed to be the quoted-comma export. Only that single file is
/// probed, so a directory missing its other tables is still accepted here.
pub fn detect_format<P: AsRef<Path>>(dir: P) -> ReleaseFormat {
    let probe = dir
        .as_ref()
        .join(UmlsTable::Concepts.file_name(ReleaseFormat::Rrf));
    if probe.exists() {
        ReleaseFormat::Rrf
    } else {
        ReleaseFormat::QuotedCsv
    }
}

/// Discovers the table directory and format of a UMLS release.
///
/// Accepts either the directory holding the tables or a release root with a
/// `META` subdirectory.
pub fn discover_umls_files<P: AsRef<Path>>(path: P) -> UmlsResult<UmlsFiles> {
    let path = path.as_ref();

    if !path.is_dir() {
        return Err(UmlsError::DirectoryNotFound {
            path: path.display().to_string(),
        });
    }

    let table_dir = find_table_dir(path);
    let format = detect_format(&table_dir);
    debug!(
        directory = %table_dir.display(),
        ?format,
        "detected UMLS release format"
    );

    Ok(UmlsFiles::new(table_dir, format))
}

/// Finds the directory containing `MRCONSO` within a release.
fn find_table_dir(base: &Path) -> PathBuf {
    if has_concept_table(base) {
        return base.to_path_buf();
    }

    let meta = base.join(well_known::META_DIR);
    if meta.is_dir() && has_concept_table(&meta) {
        return meta;
    }

    base.to_path_buf()
}

fn has_concept_table(dir: &Path) -> bool {
    [ReleaseFormat::Rrf, ReleaseFormat::QuotedCsv]
        .into_iter()
        .any(|format| dir.join(UmlsTable::Concepts.file_name(format)).exists())
}
