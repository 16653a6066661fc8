//! Sequential record reading over a single file
//!
//! [`ReaderHandle::open`] decodes the footer and schema eagerly, so a
//! malformed file fails at open rather than halfway through iteration.
//! Rows are then pulled one at a time with [`ReaderHandle::read_next`].
//!
//! A handle moves through three states: `Open` after a successful open,
//! `Reading` once a record has been returned, and `Closed` after
//! [`ReaderHandle::close`] or drop. A read failure poisons the handle: the
//! same error is returned on every later call and the position does not move.

use crate::arrow_conversion::{arrow_schema_to_schema, record_from_batch};
use crate::error::{FormatError, ReadError};
use crate::{FileSource, Record, Result, Schema};
use arrow_array::RecordBatch;
use parquet::arrow::arrow_reader::{
    ArrowReaderMetadata, ArrowReaderOptions, ParquetRecordBatchReader,
    ParquetRecordBatchReaderBuilder,
};
use parquet::file::metadata::{ParquetMetaData, ParquetMetaDataReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Rows decoded per batch when no batch size is given
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Format versions this reader accepts
const SUPPORTED_VERSIONS: [i32; 2] = [1, 2];

/// Tuning knobs for opening a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Rows decoded per batch; must be at least 1
    pub batch_size: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ReaderOptions {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Lifecycle of a [`ReaderHandle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Open,
    Reading,
    Closed,
}

/// File-level metadata decoded from the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub version: i32,
    pub num_rows: u64,
    pub num_row_groups: usize,
    pub created_by: Option<String>,
    pub key_value_metadata: Vec<(String, Option<String>)>,
}

impl FileInfo {
    fn from_metadata(metadata: &ParquetMetaData, num_rows: u64) -> Self {
        let file_metadata = metadata.file_metadata();
        let key_value_metadata = file_metadata
            .key_value_metadata()
            .map(|kvs| {
                kvs.iter()
                    .map(|kv| (kv.key.clone(), kv.value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        FileInfo {
            version: file_metadata.version(),
            num_rows,
            num_row_groups: metadata.num_row_groups(),
            created_by: file_metadata.created_by().map(str::to_string),
            key_value_metadata,
        }
    }

    /// Look up a key in the file's key/value metadata
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.key_value_metadata
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }
}

/// Decoder state: the batch stream plus the batch currently being drained
struct Cursor {
    batches: ParquetRecordBatchReader,
    current: Option<RecordBatch>,
    batch_row: usize,
}

impl Cursor {
    /// Produce the record for file row `row`, or `None` if the decoder ran dry
    fn next_record(&mut self, row: u64) -> Option<std::result::Result<Record, ReadError>> {
        loop {
            if let Some(batch) = &self.current {
                if self.batch_row < batch.num_rows() {
                    let record = record_from_batch(batch, self.batch_row).map_err(|e| {
                        ReadError::DecodeFailure {
                            row,
                            message: e.to_string(),
                        }
                    });
                    if record.is_ok() {
                        self.batch_row += 1;
                    }
                    return Some(record);
                }
            }

            match self.batches.next()? {
                Ok(batch) => {
                    trace!(row, batch_rows = batch.num_rows(), "decoded batch");
                    self.current = Some(batch);
                    self.batch_row = 0;
                }
                Err(e) => return Some(Err(ReadError::from_decoder(row, &e))),
            }
        }
    }
}

/// An open columnar file with a forward-only record cursor
///
/// The handle owns the file exclusively: the [`FileSource`] is moved into
/// the decoder and released when the handle is closed or dropped. It is not
/// meant to be shared between threads without external locking; independent
/// handles share nothing.
pub struct ReaderHandle {
    path: PathBuf,
    schema: Schema,
    info: FileInfo,
    position: u64,
    state: HandleState,
    cursor: Option<Cursor>,
    failure: Option<ReadError>,
}

/// Open `path` with default options
pub fn open<P: AsRef<Path>>(path: P) -> Result<ReaderHandle> {
    ReaderHandle::open(path)
}

impl ReaderHandle {
    /// Open `path` with default options
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ReaderOptions::default())
    }

    /// Open `path`, decoding footer and schema before returning
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        if options.batch_size == 0 {
            return Err(crate::Error::invalid_argument("batch size must be at least 1"));
        }

        let source = FileSource::open(path)?;

        let metadata = ParquetMetaDataReader::new()
            .parse_and_finish(&source)
            .map_err(|e| FormatError::InvalidFooter(e.to_string()))?;

        let version = metadata.file_metadata().version();
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(FormatError::UnsupportedVersion(version).into());
        }

        let num_rows = u64::try_from(metadata.file_metadata().num_rows()).map_err(|_| {
            FormatError::InvalidFooter(format!(
                "negative row count {}",
                metadata.file_metadata().num_rows()
            ))
        })?;
        let info = FileInfo::from_metadata(&metadata, num_rows);

        let arrow_metadata =
            ArrowReaderMetadata::try_new(Arc::new(metadata), ArrowReaderOptions::new())
                .map_err(|e| FormatError::CorruptSchema(e.to_string()))?;
        let schema = arrow_schema_to_schema(arrow_metadata.schema())
            .map_err(|e| FormatError::CorruptSchema(e.to_string()))?;

        let batches = ParquetRecordBatchReaderBuilder::new_with_metadata(source, arrow_metadata)
            .with_batch_size(options.batch_size)
            .build()
            .map_err(|e| FormatError::CorruptSchema(e.to_string()))?;

        debug!(
            path = %path.display(),
            rows = num_rows,
            row_groups = info.num_row_groups,
            fields = schema.fields().len(),
            "opened file"
        );

        Ok(ReaderHandle {
            path: path.to_path_buf(),
            schema,
            info,
            position: 0,
            state: HandleState::Open,
            cursor: Some(Cursor {
                batches,
                current: None,
                batch_row: 0,
            }),
            failure: None,
        })
    }

    /// Total rows in the file, as recorded in the footer
    pub fn row_count(&self) -> u64 {
        self.info.num_rows
    }

    /// Rows returned so far; always within `0..=row_count()`
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn metadata(&self) -> &FileInfo {
        &self.info
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == HandleState::Closed
    }

    /// Decode the next record
    ///
    /// Returns `Ok(None)` at end of file, and keeps doing so on later calls.
    /// A closed handle behaves as if at end of file.
    pub fn read_next(&mut self) -> Result<Option<Record>> {
        if let Some(err) = &self.failure {
            return Err(err.clone().into());
        }

        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(None);
        };

        if self.position >= self.info.num_rows {
            return Ok(None);
        }

        let outcome = cursor.next_record(self.position).unwrap_or_else(|| {
            Err(ReadError::TruncatedData {
                row: self.position,
                message: format!(
                    "decoder ended after {} of {} rows",
                    self.position, self.info.num_rows
                ),
            })
        });

        match outcome {
            Ok(record) => {
                self.position += 1;
                self.state = HandleState::Reading;
                Ok(Some(record))
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "read failed");
                self.failure = Some(err.clone());
                Err(err.into())
            }
        }
    }

    /// Iterate over the remaining records
    ///
    /// The iterator ends at end of file, or right after yielding an error.
    pub fn records(&mut self) -> Records<'_> {
        Records {
            handle: self,
            done: false,
        }
    }

    /// Read every remaining record
    pub fn read_all(&mut self) -> Result<Vec<Record>> {
        self.records().collect()
    }

    /// Release the file and decoder state. Calling this again is a no-op.
    pub fn close(&mut self) {
        if self.cursor.take().is_some() {
            debug!(path = %self.path.display(), position = self.position, "closed file");
        }
        self.state = HandleState::Closed;
    }
}

impl Drop for ReaderHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ReaderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderHandle")
            .field("path", &self.path)
            .field("position", &self.position)
            .field("row_count", &self.info.num_rows)
            .field("state", &self.state)
            .finish()
    }
}

/// Borrowing iterator returned by [`ReaderHandle::records`]
pub struct Records<'a> {
    handle: &'a mut ReaderHandle,
    done: bool,
}

impl Iterator for Records<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.handle.read_next() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
