//! Test utilities for pqread-core

#[cfg(test)]
pub mod test {
    use arrow_array::{ArrayRef, Int64Array, RecordBatch, StringArray};
    use arrow_schema::{DataType, Field, Schema as ArrowSchema};
    use parquet::arrow::ArrowWriter;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    /// `{id: Int64, name: Utf8?}` with ids `0..rows` and names `name_<id>`
    pub fn sample_batch(rows: usize) -> RecordBatch {
        let schema = Arc::new(ArrowSchema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, true),
        ]));
        let ids: Vec<i64> = (0..rows as i64).collect();
        let names: Vec<String> = ids.iter().map(|i| format!("name_{}", i)).collect();
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(ids)),
            Arc::new(StringArray::from(names)),
        ];
        RecordBatch::try_new(schema, columns).unwrap()
    }

    /// Write a single batch to a temp file that lives as long as the handle
    pub fn write_batch(batch: &RecordBatch) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
        file
    }
}
