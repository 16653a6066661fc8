//! Sequential record reading for single Parquet files
//!
//! `pqread-core` owns the reading side of a columnar file: it opens the
//! file, decodes footer and schema up front, and then yields decoded rows
//! as ordered [`Record`]s one at a time or in bulk. Parsing of the binary
//! container, page encodings and compression codecs is left to the Apache
//! `parquet` crate.
//!
//! # Key Components
//!
//! - **Reader**: [`ReaderHandle`] with `open`, `row_count`, `read_next`,
//!   `read_all` and `close`
//!   - Fail-fast open: a bad footer or schema is reported before any row
//!   - Forward-only cursor, idempotent end-of-file and close
//!
//! - **Source**: [`FileSource`] gives the decoder byte-range access to a
//!   regular file and releases the descriptor on drop
//!
//! - **Schema**: [`Schema`] tree decoded from the file, with introspection
//!   through [`traits::SchemaInspector`]
//!
//! - **Values**: [`Value`] covers every type the decoder produces, and
//!   [`Record`] maps field names to values in schema order
//!
//! - **Errors**: [`OpenError`], [`FormatError`] and [`ReadError`], wrapped
//!   by the crate-level [`Error`]
//!
//! # Example
//!
//! ```no_run
//! let mut handle = pqread_core::open("data.parquet")?;
//! println!("{} rows", handle.row_count());
//! while let Some(record) = handle.read_next()? {
//!     println!("{record}");
//! }
//! handle.close();
//! # Ok::<(), pqread_core::Error>(())
//! ```

pub mod arrow_conversion;
pub mod error;
pub mod reader;
pub mod record;
pub mod schema;
pub mod source;
pub mod traits;
pub mod value;

#[cfg(test)]
pub mod test_utils;

pub use error::{Error, FormatError, OpenError, ReadError, Result};
pub use reader::{open, FileInfo, HandleState, ReaderHandle, ReaderOptions, Records};
pub use record::Record;
pub use schema::{PrimitiveType, Repetition, Schema, SchemaNode};
pub use source::FileSource;
pub use traits::SchemaInspector;
pub use value::Value;
