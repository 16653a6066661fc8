use arrow_schema::ArrowError;
use parquet::errors::ParquetError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to acquire the file behind a reader
#[derive(Error, Debug)]
pub enum OpenError {
    /// Path does not exist
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The process may not read the path
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Path exists but is a directory or some other non-regular file
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    /// Any other OS-level failure while opening
    #[error("cannot open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OpenError {
    /// Classify an I/O error raised while opening `path`
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => OpenError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => {
                OpenError::PermissionDenied(path.to_path_buf())
            }
            _ => OpenError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            OpenError::NotFound(path)
            | OpenError::PermissionDenied(path)
            | OpenError::NotAFile(path) => path,
            OpenError::Io { path, .. } => path,
        }
    }
}

/// Structural problems detected while decoding file metadata at open time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The footer is missing, truncated, or cannot be parsed
    #[error("invalid footer: {0}")]
    InvalidFooter(String),

    /// The footer decoded but declares a format version we do not read
    #[error("unsupported format version {0}")]
    UnsupportedVersion(i32),

    /// The schema cannot be resolved into logical fields
    #[error("corrupt schema: {0}")]
    CorruptSchema(String),
}

/// Failures while decoding rows after a successful open
///
/// `row` is the zero-based offset of the record that could not be produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// A row group or column chunk could not be decoded
    #[error("failed to decode row {row}: {message}")]
    DecodeFailure { row: u64, message: String },

    /// The file ended before the data the footer describes
    #[error("truncated data at row {row}: {message}")]
    TruncatedData { row: u64, message: String },
}

impl ReadError {
    /// Classify a decoder failure raised while producing row `row`
    pub fn from_decoder(row: u64, err: &ArrowError) -> Self {
        let message = err.to_string();
        if is_truncation(err) {
            ReadError::TruncatedData { row, message }
        } else {
            ReadError::DecodeFailure { row, message }
        }
    }

    /// Offset of the row that failed
    pub fn row(&self) -> u64 {
        match self {
            ReadError::DecodeFailure { row, .. } | ReadError::TruncatedData { row, .. } => *row,
        }
    }
}

/// Whether the decoder failed because the file ended early
///
/// The batch reader flattens `ParquetError` into its display string, so an
/// end-of-file failure is recognised by the `EOF:` prefix that
/// `ParquetError::EOF` renders with.
fn is_truncation(err: &ArrowError) -> bool {
    match err {
        ArrowError::ParquetError(message) => message.starts_with("EOF:"),
        ArrowError::ExternalError(source) => matches!(
            source.downcast_ref::<ParquetError>(),
            Some(ParquetError::EOF(_))
        ),
        ArrowError::IoError(_, source) => source.kind() == std::io::ErrorKind::UnexpectedEof,
        _ => false,
    }
}

/// Core error type for record reading
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Open(#[from] OpenError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Read(#[from] ReadError),

    /// Type conversion errors
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Invalid argument errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for record reading
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new conversion error
    pub fn conversion<S: Into<String>>(msg: S) -> Self {
        Error::Conversion(msg.into())
    }

    /// Create a new invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_open_error_classification() {
        let path = Path::new("missing.parquet");

        let err = OpenError::from_io(path, io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(err, OpenError::NotFound(_)));
        assert_eq!(err.path(), path);

        let err = OpenError::from_io(
            path,
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(matches!(err, OpenError::PermissionDenied(_)));

        let err = OpenError::from_io(path, io::Error::new(io::ErrorKind::Other, "weird"));
        assert!(matches!(err, OpenError::Io { .. }));
        assert!(err.to_string().contains("weird"));
    }

    #[test]
    fn test_error_display() {
        let err: Error = OpenError::NotFound(PathBuf::from("data.parquet")).into();
        assert_eq!(err.to_string(), "file not found: data.parquet");

        let err: Error = FormatError::UnsupportedVersion(7).into();
        assert_eq!(err.to_string(), "unsupported format version 7");

        let err = Error::conversion("Cannot convert value");
        assert_eq!(err.to_string(), "Conversion error: Cannot convert value");
    }

    #[test]
    fn test_read_error_classification() {
        let eof = ParquetError::EOF("failed to fill whole buffer".to_string());
        let err = ReadError::from_decoder(3, &ArrowError::ParquetError(eof.to_string()));
        assert!(matches!(err, ReadError::TruncatedData { row: 3, .. }));

        let err = ReadError::from_decoder(4, &ArrowError::ExternalError(Box::new(eof)));
        assert!(matches!(err, ReadError::TruncatedData { row: 4, .. }));

        let err = ReadError::from_decoder(
            0,
            &ArrowError::ParquetError("Invalid page header".to_string()),
        );
        assert!(matches!(err, ReadError::DecodeFailure { row: 0, .. }));
        assert_eq!(err.row(), 0);

        // Letters "eof" inside a column name are not a truncation
        let err = ReadError::from_decoder(
            1,
            &ArrowError::ParquetError("Invalid value for column 'geofence'".to_string()),
        );
        assert!(matches!(err, ReadError::DecodeFailure { row: 1, .. }));
    }
}
