//! Export functionality for query and statistics results.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use arrow::array::RecordBatch;
use arrow::datatypes::Schema;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use super::ExportFormat;

/// Exports record batches to various file formats.
pub struct Exporter;

impl Exporter {
    /// Export RecordBatches to a file, returning the number of rows written.
    pub fn export<P: AsRef<Path>>(
        path: P,
        format: ExportFormat,
        batches: &[RecordBatch],
    ) -> std::io::Result<usize> {
        if batches.is_empty() {
            return Ok(0);
        }

        let schema = batches[0].schema();
        let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();

        match format {
            ExportFormat::Parquet => Self::export_parquet(path.as_ref(), schema, batches)?,
            ExportFormat::Json => Self::export_json(path.as_ref(), batches)?,
            ExportFormat::Csv => Self::export_csv(path.as_ref(), batches)?,
        }

        Ok(total_rows)
    }

    /// Export to Parquet with Snappy compression.
    fn export_parquet(
        path: &Path,
        schema: Arc<Schema>,
        batches: &[RecordBatch],
    ) -> std::io::Result<()> {
        let file = File::create(path)?;

        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        for batch in batches {
            writer
                .write(batch)
                .map_err(|e| std::io::Error::other(e.to_string()))?;
        }

        writer
            .close()
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        Ok(())
    }

    /// Export to JSON Lines format.
    fn export_json(path: &Path, batches: &[RecordBatch]) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = arrow::json::LineDelimitedWriter::new(BufWriter::new(file));

        let refs: Vec<&RecordBatch> = batches.iter().collect();
        writer
            .write_batches(&refs)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        Ok(())
    }

    /// Export to CSV format with a header row. Null statistics render as
    /// empty cells.
    fn export_csv(path: &Path, batches: &[RecordBatch]) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = arrow::csv::WriterBuilder::new()
            .with_header(true)
            .build(BufWriter::new(file));

        for batch in batches {
            writer
                .write(batch)
                .map_err(|e| std::io::Error::other(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field};
    use tempfile::tempdir;

    fn create_test_batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("branch", DataType::Utf8, false),
            Field::new("mean", DataType::Float64, true),
        ]));

        let branch = StringArray::from(vec!["Jets.pt", "Jets.eta", "Jets.empty"]);
        let mean = Float64Array::from(vec![Some(42.5), Some(0.1), None]);

        RecordBatch::try_new(schema, vec![Arc::new(branch), Arc::new(mean)]).unwrap()
    }

    #[test]
    fn test_export_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.csv");

        let batch = create_test_batch();
        let rows = Exporter::export(&path, ExportFormat::Csv, &[batch]).unwrap();
        assert_eq!(rows, 3);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("branch,mean"));
        assert!(content.contains("Jets.pt,42.5"));
        // Null statistics become empty cells
        assert!(content.contains("Jets.empty,\n") || content.ends_with("Jets.empty,"));
    }

    #[test]
    fn test_export_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.jsonl");

        let batch = create_test_batch();
        let rows = Exporter::export(&path, ExportFormat::Json, &[batch]).unwrap();
        assert_eq!(rows, 3);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"branch\":\"Jets.pt\""));
        assert!(content.contains("\"mean\":42.5"));
    }

    #[test]
    fn test_export_parquet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.parquet");

        let batch = create_test_batch();
        let rows = Exporter::export(&path, ExportFormat::Parquet, &[batch]).unwrap();
        assert_eq!(rows, 3);

        assert!(path.exists());
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn test_export_empty_batches() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        let rows = Exporter::export(&path, ExportFormat::Csv, &[]).unwrap();
        assert_eq!(rows, 0);
        // No batches, no file
        assert!(!path.exists());
    }
}
