use crate::error::{EtlError, Result};
use crate::record::RawRecord;
use csv::{ReaderBuilder, StringRecordsIntoIter};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Lazy, single-pass sequence of [`RawRecord`]s keyed by the header row.
///
/// The underlying reader is owned by the iterator, so the file handle is
/// released as soon as the iterator is dropped, whether it was drained or not.
pub struct RecordReader<R: Read = File> {
    headers: Vec<String>,
    records: StringRecordsIntoIter<R>,
}

impl RecordReader<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| EtlError::File {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened input file");
        Self::from_reader(file)
    }
}

impl<R: Read> RecordReader<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        // Strict field counts: a short or long row is a parse error
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|source| EtlError::Read { line: 1, source })?
            .iter()
            .map(str::to_string)
            .collect();

        Ok(Self {
            headers,
            records: rdr.into_records(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.records.next()?;
        Some(match next {
            Ok(record) => Ok(RawRecord::new(
                self.headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect(),
            )),
            Err(source) => {
                let line = source.position().map(|p| p.line()).unwrap_or(0);
                Err(EtlError::Read { line, source })
            }
        })
    }
}
