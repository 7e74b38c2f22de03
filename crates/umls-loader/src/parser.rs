//! Generic UMLS table parser.
//!
//! Provides a streaming parser for Metathesaurus tables in either the
//! pipe-delimited RRF layout or the quoted-comma export layout.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder, StringRecord};
use tracing::warn;
use umls_types::{ReleaseFormat, UmlsTable};

use crate::types::{UmlsError, UmlsResult};

/// Trait for types that can be parsed from a UMLS table line.
pub trait UmlsRecord: Sized {
    /// Table this record type is read from.
    const TABLE: UmlsTable;

    /// Column layout used to locate the fields.
    type Columns: Copy;

    /// Builds a record from the split fields of one line.
    fn from_fields(fields: &RecordFields<'_>, columns: &Self::Columns) -> UmlsResult<Self>;
}

/// The split fields of one line, cleaned according to the release format.
///
/// Quoted-comma lines have every `"` removed from every field. Pipe lines
/// have the surrounding whitespace of the line stripped.
#[derive(Debug)]
pub struct RecordFields<'a> {
    record: &'a StringRecord,
    format: ReleaseFormat,
    table: UmlsTable,
}

impl<'a> RecordFields<'a> {
    /// Wraps a raw record.
    pub fn new(record: &'a StringRecord, format: ReleaseFormat, table: UmlsTable) -> Self {
        Self {
            record,
            format,
            table,
        }
    }

    /// Number of fields on the line.
    pub fn len(&self) -> usize {
        self.record.len()
    }

    /// Returns true if the line has no fields.
    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// Returns the cleaned field at `index`.
    ///
    /// # Errors
    /// Returns [`UmlsError::MissingField`] naming `column` if the line is too short.
    pub fn get(&self, index: usize, column: &'static str) -> UmlsResult<String> {
        let raw = self
            .record
            .get(index)
            .ok_or_else(|| UmlsError::MissingField {
                table: self.table,
                column,
                index,
                found: self.record.len(),
                line: self.record.position().map_or(0, |p| p.line()),
            })?;
        Ok(self.clean(index, raw).into_owned())
    }

    fn clean<'f>(&self, index: usize, raw: &'f str) -> Cow<'f, str> {
        match self.format {
            ReleaseFormat::QuotedCsv if raw.contains('"') => Cow::Owned(raw.replace('"', "")),
            ReleaseFormat::QuotedCsv => Cow::Borrowed(raw),
            ReleaseFormat::Rrf => {
                let mut field = raw;
                if index == 0 {
                    field = field.trim_start();
                }
                if index + 1 == self.record.len() {
                    field = field.trim_end();
                }
                Cow::Borrowed(field)
            }
        }
    }
}

/// A restartable source of one release table.
///
/// Every call to [`TableSource::records`] reopens the file and yields a fresh
/// forward-only sequence.
#[derive(Debug, Clone)]
pub struct TableSource {
    path: PathBuf,
    format: ReleaseFormat,
}

impl TableSource {
    /// Creates a source for a table file.
    pub fn new(path: impl Into<PathBuf>, format: ReleaseFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// Path of the table file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the table and returns a streaming parser over its records.
    ///
    /// # Errors
    /// Returns [`UmlsError::FileNotFound`] if the file does not exist.
    pub fn records<T: UmlsRecord>(
        &self,
        columns: T::Columns,
        skip_malformed: bool,
    ) -> UmlsResult<UmlsParser<BufReader<File>, T>> {
        UmlsParser::from_path(&self.path, self.format, columns, skip_malformed)
    }
}

/// A streaming parser for UMLS tables.
///
/// Reads a table record-by-record without loading it into memory. Lines with
/// too few fields end the iteration with an error unless `skip_malformed` is
/// set, in which case they are logged and skipped. Whitespace-only and
/// delimiter-only lines count as too short; only fully empty lines are
/// skipped silently.
pub struct UmlsParser<R: Read, T: UmlsRecord> {
    reader: Reader<R>,
    format: ReleaseFormat,
    columns: T::Columns,
    skip_malformed: bool,
    records_read: usize,
    records_skipped: usize,
    _marker: PhantomData<T>,
}

impl<T: UmlsRecord> UmlsParser<BufReader<File>, T> {
    /// Creates a new parser from a file path.
    ///
    /// # Errors
    /// Returns an error if the file does not exist or cannot be opened.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        format: ReleaseFormat,
        columns: T::Columns,
        skip_malformed: bool,
    ) -> UmlsResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(UmlsError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Ok(Self::from_reader(
            BufReader::new(file),
            format,
            columns,
            skip_malformed,
        ))
    }
}

impl<R: Read, T: UmlsRecord> UmlsParser<R, T> {
    /// Creates a new parser from a reader.
    pub fn from_reader(
        reader: R,
        format: ReleaseFormat,
        columns: T::Columns,
        skip_malformed: bool,
    ) -> Self {
        // Quote characters are stripped field by field, never interpreted.
        let reader = ReaderBuilder::new()
            .delimiter(format.delimiter())
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::None)
            .from_reader(reader);

        Self {
            reader,
            format,
            columns,
            skip_malformed,
            records_read: 0,
            records_skipped: 0,
            _marker: PhantomData,
        }
    }

    /// Returns the number of lines read so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Returns the number of malformed lines skipped so far.
    pub fn records_skipped(&self) -> usize {
        self.records_skipped
    }
}

impl<R: Read, T: UmlsRecord> Iterator for UmlsParser<R, T> {
    type Item = UmlsResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        loop {
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    self.records_read += 1;

                    let fields = RecordFields::new(&record, self.format, T::TABLE);
                    match T::from_fields(&fields, &self.columns) {
                        Ok(parsed) => return Some(Ok(parsed)),
                        Err(e @ UmlsError::MissingField { .. }) if self.skip_malformed => {
                            warn!(table = %T::TABLE, error = %e, "skipping malformed line");
                            self.records_skipped += 1;
                            continue;
                        }
                        Err(e) => return Some(Err(e)),
                    }
                }
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
