use crate::args::{Args, OutputFormat};
use pqread_core::{
    FileInfo, ReaderHandle, ReaderOptions, Record, Repetition, Schema, SchemaInspector,
};
use std::io::{self, Write};
use thiserror::Error;
use tracing::{debug, info};

/// Values longer than this are summarized in `--metadata` output
const MAX_METADATA_VALUE_LEN: usize = 64;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Reader(#[from] pqread_core::Error),

    #[error("write failed: {0}")]
    Io(#[from] io::Error),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Open the file named by `args` and print to `out`
///
/// The handle is closed on every path out of this function, including
/// early returns on a read error.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<(), CliError> {
    let options = ReaderOptions::default().with_batch_size(args.batch_size);
    let mut handle = ReaderHandle::open_with_options(&args.path, options)?;

    if args.metadata {
        write_metadata(out, handle.metadata())?;
    }
    if args.schema {
        write_schema(out, handle.schema())?;
    }

    if handle.row_count() == 0 {
        info!(path = %args.path.display(), "file has no rows");
        writeln!(out, "No records found in {}", args.path.display())?;
        handle.close();
        return Ok(());
    }

    let limit = args.record_limit();
    let mut written = 0u64;
    while limit.map_or(true, |limit| written < limit) {
        let Some(record) = handle.read_next()? else {
            break;
        };
        write_record(out, &record, args.format, args.first)?;
        written += 1;
    }

    handle.close();
    debug!(records = written, "finished");
    Ok(())
}

fn write_record<W: Write>(
    out: &mut W,
    record: &Record,
    format: OutputFormat,
    first_only: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Text if first_only => writeln!(out, "First record: {}", record)?,
        OutputFormat::Text => writeln!(out, "{}", record)?,
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, record)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_metadata<W: Write>(out: &mut W, info: &FileInfo) -> io::Result<()> {
    writeln!(out, "rows: {}", info.num_rows)?;
    writeln!(out, "row groups: {}", info.num_row_groups)?;
    writeln!(out, "format version: {}", info.version)?;
    if let Some(created_by) = &info.created_by {
        writeln!(out, "created by: {}", created_by)?;
    }
    if !info.key_value_metadata.is_empty() {
        writeln!(out, "key/value metadata:")?;
        for (key, value) in &info.key_value_metadata {
            match value {
                Some(v) if v.len() > MAX_METADATA_VALUE_LEN => {
                    writeln!(out, "  {} = <{} bytes>", key, v.len())?
                }
                Some(v) => writeln!(out, "  {} = {}", key, v)?,
                None => writeln!(out, "  {}", key)?,
            }
        }
    }
    Ok(())
}

fn write_schema<W: Write>(out: &mut W, schema: &Schema) -> io::Result<()> {
    writeln!(out, "schema:")?;
    for path in schema.all_field_paths() {
        let Some(node) = schema.get_field_by_path(&path) else {
            continue;
        };
        let repetition = match node.repetition() {
            Repetition::Required => "required",
            Repetition::Optional => "optional",
            Repetition::Repeated => "repeated",
        };
        writeln!(
            out,
            "  {}: {} ({})",
            path,
            node.type_description(),
            repetition
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::{ArrayRef, Int64Array, RecordBatch, StringArray};
    use arrow_schema::{DataType, Field, Schema as ArrowSchema};
    use clap::Parser;
    use parquet::arrow::ArrowWriter;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    fn write_rows(ids: &[i64], names: &[&str]) -> NamedTempFile {
        let schema = Arc::new(ArrowSchema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, false),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(ids.to_vec())),
            Arc::new(StringArray::from(names.to_vec())),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let file = NamedTempFile::new().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        file
    }

    fn run_with(argv: &[&str]) -> Result<String, CliError> {
        let mut full = vec!["pqread"];
        full.extend_from_slice(argv);
        let args = Args::try_parse_from(full).unwrap();

        let mut out = Vec::new();
        run(&args, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_prints_all_records() {
        let file = write_rows(&[1, 2, 3], &["a", "b", "c"]);
        let output = run_with(&[file.path().to_str().unwrap()]).unwrap();
        assert_eq!(
            output,
            "{id: 1, name: \"a\"}\n{id: 2, name: \"b\"}\n{id: 3, name: \"c\"}\n"
        );
    }

    #[test]
    fn test_first_record_only() {
        let file = write_rows(&[1, 2], &["a", "b"]);
        let output = run_with(&[file.path().to_str().unwrap(), "--first"]).unwrap();
        assert_eq!(output, "First record: {id: 1, name: \"a\"}\n");
    }

    #[test]
    fn test_limit_and_json() {
        let file = write_rows(&[1, 2, 3], &["a", "b", "c"]);
        let output = run_with(&[
            file.path().to_str().unwrap(),
            "--limit",
            "2",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(
            output,
            "{\"id\":1,\"name\":\"a\"}\n{\"id\":2,\"name\":\"b\"}\n"
        );
    }

    #[test]
    fn test_empty_file_is_not_an_error() {
        let file = write_rows(&[], &[]);
        let path = file.path().to_str().unwrap();
        let output = run_with(&[path]).unwrap();
        assert_eq!(output, format!("No records found in {}\n", path));
    }

    #[test]
    fn test_schema_and_metadata() {
        let file = write_rows(&[7], &["x"]);
        let output = run_with(&[file.path().to_str().unwrap(), "--schema", "--metadata"]).unwrap();

        assert!(output.starts_with("rows: 1\nrow groups: 1\n"));
        assert!(output.contains("schema:\n  id: Int64 (required)\n  name: String (required)\n"));
        // The embedded Arrow schema is long and gets summarized
        assert!(output.contains("ARROW:schema = <"));
        assert!(output.ends_with("{id: 7, name: \"x\"}\n"));
    }

    #[test]
    fn test_missing_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.parquet");
        let err = run_with(&[path.to_str().unwrap()]).unwrap_err();

        assert!(matches!(
            err,
            CliError::Reader(pqread_core::Error::Open(pqread_core::OpenError::NotFound(_)))
        ));
        assert_eq!(err.to_string(), format!("file not found: {}", path.display()));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let file = write_rows(&[1], &["a"]);
        let err = run_with(&[file.path().to_str().unwrap(), "--batch-size", "0"]).unwrap_err();
        assert!(err.to_string().contains("batch size"));
    }
}
