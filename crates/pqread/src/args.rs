use clap::{Parser, ValueEnum};
use pqread_core::reader::DEFAULT_BATCH_SIZE;
use std::path::PathBuf;

/// Print the records of a Parquet file.
#[derive(Parser, Debug, Clone)]
#[command(name = "pqread", version)]
pub struct Args {
    /// File to read.
    #[arg(env = "PQREAD_FILE", default_value = "myfile.parquet")]
    pub path: PathBuf,

    /// Print only the first record.
    #[arg(long, conflicts_with = "limit")]
    pub first: bool,

    /// Stop after this many records.
    #[arg(long)]
    pub limit: Option<u64>,

    /// How records are written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print the field paths and types before the records.
    #[arg(long)]
    pub schema: bool,

    /// Print row count, row groups, writer and key/value metadata.
    #[arg(long)]
    pub metadata: bool,

    /// Rows decoded per batch.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `{field: value, ...}` per line
    Text,
    /// One JSON object per line
    Json,
}

impl Args {
    /// Maximum number of records to print, if bounded
    pub fn record_limit(&self) -> Option<u64> {
        if self.first {
            Some(1)
        } else {
            self.limit
        }
    }
}
