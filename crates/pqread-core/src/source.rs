//! Byte-range access to a file on disk
//!
//! [`FileSource`] owns one open descriptor and hands the decoder bounded
//! readers over cloned descriptors. Nothing is buffered beyond what the
//! decoder asks for. Dropping the source closes the descriptor.

use crate::error::OpenError;
use bytes::Bytes;
use parquet::errors::ParquetError;
use parquet::file::reader::{ChunkReader, Length};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// An open, regular file that the decoder can read ranges from
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    file: File,
    file_len: u64,
}

impl FileSource {
    /// Acquire `path` for reading
    ///
    /// The descriptor is released before returning if the path turns out
    /// not to be a regular file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, OpenError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| OpenError::from_io(path, e))?;
        let metadata = file.metadata().map_err(|e| OpenError::from_io(path, e))?;

        if !metadata.is_file() {
            return Err(OpenError::NotAFile(path.to_path_buf()));
        }

        Ok(FileSource {
            path: path.to_path_buf(),
            file,
            file_len: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn clone_handle(&self) -> parquet::errors::Result<File> {
        self.file.try_clone().map_err(to_parquet_error)
    }
}

fn to_parquet_error(err: io::Error) -> ParquetError {
    match err.kind() {
        io::ErrorKind::UnexpectedEof => ParquetError::EOF(err.to_string()),
        _ => ParquetError::External(Box::new(err)),
    }
}

/// A reader that stops at the end of a byte range
pub struct RangeReader<R> {
    inner: R,
    end: u64,
    pos: u64,
}

impl<R: Read + Seek> RangeReader<R> {
    fn new(mut inner: R, start: u64, length: u64) -> io::Result<Self> {
        inner.seek(SeekFrom::Start(start))?;
        Ok(RangeReader {
            inner,
            end: start + length,
            pos: start,
        })
    }
}

impl<R: Read> Read for RangeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.end.saturating_sub(self.pos);
        if remaining == 0 {
            return Ok(0);
        }

        let to_read = buf.len().min(remaining.min(usize::MAX as u64) as usize);
        let n = self.inner.read(&mut buf[..to_read])?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl Length for FileSource {
    fn len(&self) -> u64 {
        self.file_len
    }
}

impl ChunkReader for FileSource {
    type T = RangeReader<File>;

    fn get_read(&self, start: u64) -> parquet::errors::Result<Self::T> {
        let file = self.clone_handle()?;
        RangeReader::new(file, start, self.file_len.saturating_sub(start))
            .map_err(to_parquet_error)
    }

    fn get_bytes(&self, start: u64, length: usize) -> parquet::errors::Result<Bytes> {
        let mut file = self.clone_handle()?;
        file.seek(SeekFrom::Start(start))
            .map_err(to_parquet_error)?;

        let mut buf = vec![0; length];
        file.read_exact(&mut buf).map_err(to_parquet_error)?;
        Ok(Bytes::from(buf))
    }
}
