//! Aggregation query engine.
//!
//! Registers the branch descriptor snapshot as a DataFusion table and
//! delegates the groupby/sum work to SQL, the same way the wider toolbox
//! queries packet tables. Ratio and percentage arithmetic happens on the
//! collected rows, where the degenerate denominators get their documented
//! fallbacks.

mod batch;
mod schema;

pub use batch::{descriptors_to_batch, scanned_to_batch};
pub use schema::{build_branches_schema, build_stats_schema};

use arrow::array::{Int64Array, RecordBatch, StringArray};
use datafusion::prelude::*;

use crate::classify::TypeCategory;
use crate::error::{Error, QueryError};
use crate::stats::{compression_ratio, CategorySummary, FieldDescriptor};

/// Name of the registered branch metadata table.
pub const BRANCHES_TABLE: &str = "branches";

const SUMMARY_SQL: &str = "\
    SELECT dtype_category, \
           CAST(SUM(compressed_bytes) AS BIGINT) AS compressed_bytes, \
           CAST(SUM(uncompressed_bytes) AS BIGINT) AS uncompressed_bytes, \
           COUNT(*) AS num_branches \
    FROM branches \
    GROUP BY dtype_category \
    ORDER BY compressed_bytes DESC, dtype_category ASC";

/// Query engine over one file's branch metadata snapshot.
pub struct StatsEngine {
    ctx: SessionContext,
}

impl StatsEngine {
    /// Build an engine from descriptors and register the `branches` table.
    pub fn from_descriptors(fields: &[FieldDescriptor]) -> Result<Self, Error> {
        let ctx = SessionContext::new();
        let batch = descriptors_to_batch(fields)?;

        ctx.register_batch(BRANCHES_TABLE, batch)
            .map_err(|e| Error::Query(QueryError::from(e)))?;

        Ok(Self { ctx })
    }

    /// Execute a SQL query against the registered table and collect results.
    pub async fn query(&self, sql: &str) -> Result<Vec<RecordBatch>, Error> {
        let df = self
            .ctx
            .sql(sql)
            .await
            .map_err(|e| Error::Query(QueryError::from(e)))?;

        let batches = df
            .collect()
            .await
            .map_err(|e| Error::Query(QueryError::from(e)))?;

        Ok(batches)
    }

    /// Group branches by category, summing byte counts and counting rows.
    ///
    /// Rows come back sorted by total compressed bytes descending, ties
    /// broken by category name ascending for determinism.
    pub async fn summarize_by_category(&self) -> Result<Vec<CategorySummary>, Error> {
        let batches = self.query(SUMMARY_SQL).await?;
        let mut summaries = Vec::new();

        for batch in &batches {
            let categories = string_column(batch, 0, "dtype_category")?;
            let compressed = int64_column(batch, 1, "compressed_bytes")?;
            let uncompressed = int64_column(batch, 2, "uncompressed_bytes")?;
            let counts = int64_column(batch, 3, "num_branches")?;

            for row in 0..batch.num_rows() {
                let label = categories.value(row);
                let category = TypeCategory::from_label(label).ok_or_else(|| {
                    Error::Query(QueryError::ResultShape(format!(
                        "unknown category label: {label}"
                    )))
                })?;

                let compressed_bytes = compressed.value(row).max(0) as u64;
                let uncompressed_bytes = uncompressed.value(row).max(0) as u64;

                summaries.push(CategorySummary {
                    category,
                    compressed_bytes,
                    uncompressed_bytes,
                    num_branches: counts.value(row).max(0) as u64,
                    // Unreachable for non-empty groups given the per-branch
                    // ratio rule, but the fallback holds regardless.
                    compression_ratio: compression_ratio(compressed_bytes, uncompressed_bytes),
                    pct_of_compressed: 0.0,
                    pct_of_uncompressed: 0.0,
                });
            }
        }

        let total_compressed: u64 = summaries.iter().map(|s| s.compressed_bytes).sum();
        let total_uncompressed: u64 = summaries.iter().map(|s| s.uncompressed_bytes).sum();

        for summary in &mut summaries {
            summary.pct_of_compressed = share_pct(summary.compressed_bytes, total_compressed);
            summary.pct_of_uncompressed =
                share_pct(summary.uncompressed_bytes, total_uncompressed);
        }

        Ok(summaries)
    }
}

fn share_pct(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

fn string_column<'a>(
    batch: &'a RecordBatch,
    idx: usize,
    name: &str,
) -> Result<&'a StringArray, Error> {
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| {
            Error::Query(QueryError::ResultShape(format!("{name}: expected Utf8")))
        })
}

fn int64_column<'a>(
    batch: &'a RecordBatch,
    idx: usize,
    name: &str,
) -> Result<&'a Int64Array, Error> {
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| {
            Error::Query(QueryError::ResultShape(format!("{name}: expected Int64")))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::compression_ratio;

    fn descriptor(name: &str, category: TypeCategory, compressed: u64, uncompressed: u64) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            container: name.split('.').next().unwrap_or(name).to_string(),
            category,
            interpretation: String::new(),
            compressed_bytes: compressed,
            uncompressed_bytes: uncompressed,
            compression_ratio: compression_ratio(compressed, uncompressed),
        }
    }

    #[tokio::test]
    async fn test_summary_matches_worked_example() {
        let fields = vec![
            descriptor("Jets.pt", TypeCategory::VectorFloat, 1000, 4000),
            descriptor("EventNumber", TypeCategory::Int32, 500, 500),
        ];

        let engine = StatsEngine::from_descriptors(&fields).unwrap();
        let summaries = engine.summarize_by_category().await.unwrap();

        assert_eq!(summaries.len(), 2);

        let vf = &summaries[0];
        assert_eq!(vf.category, TypeCategory::VectorFloat);
        assert_eq!(vf.compression_ratio, 4.0);
        assert!((vf.pct_of_compressed - 66.666).abs() < 0.01);

        let i32sum = &summaries[1];
        assert_eq!(i32sum.category, TypeCategory::Int32);
        assert_eq!(i32sum.compression_ratio, 1.0);
        assert!((i32sum.pct_of_compressed - 33.333).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_summary_partitions_totals() {
        let fields = vec![
            descriptor("a", TypeCategory::VectorFloat, 10, 40),
            descriptor("b", TypeCategory::VectorFloat, 20, 60),
            descriptor("c", TypeCategory::Double, 30, 30),
            descriptor("d", TypeCategory::Other, 5, 7),
        ];

        let engine = StatsEngine::from_descriptors(&fields).unwrap();
        let summaries = engine.summarize_by_category().await.unwrap();

        let summed: u64 = summaries.iter().map(|s| s.compressed_bytes).sum();
        let direct: u64 = fields.iter().map(|f| f.compressed_bytes).sum();
        assert_eq!(summed, direct);

        let pct_total: f64 = summaries.iter().map(|s| s.pct_of_compressed).sum();
        assert!((pct_total - 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_summary_sorted_with_name_tiebreak() {
        // Two categories with identical compressed totals; the tie resolves
        // by label ascending.
        let fields = vec![
            descriptor("x", TypeCategory::Int64, 100, 200),
            descriptor("y", TypeCategory::Double, 100, 300),
            descriptor("z", TypeCategory::VectorFloat, 900, 3600),
        ];

        let engine = StatsEngine::from_descriptors(&fields).unwrap();
        let summaries = engine.summarize_by_category().await.unwrap();

        assert_eq!(summaries[0].category, TypeCategory::VectorFloat);
        // "double" < "int64" lexicographically.
        assert_eq!(summaries[1].category, TypeCategory::Double);
        assert_eq!(summaries[2].category, TypeCategory::Int64);
    }

    #[tokio::test]
    async fn test_group_with_zero_compressed_reports_infinite_ratio() {
        let fields = vec![descriptor("a", TypeCategory::VectorOther, 0, 128)];

        let engine = StatsEngine::from_descriptors(&fields).unwrap();
        let summaries = engine.summarize_by_category().await.unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].compression_ratio, f64::INFINITY);
    }

    #[tokio::test]
    async fn test_sql_passthrough() {
        let fields = vec![
            descriptor("a", TypeCategory::Float, 1, 1),
            descriptor("b", TypeCategory::Float, 2, 2),
        ];

        let engine = StatsEngine::from_descriptors(&fields).unwrap();
        let batches = engine
            .query("SELECT COUNT(*) AS n FROM branches")
            .await
            .unwrap();

        let n = batches[0]
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap()
            .value(0);
        assert_eq!(n, 2);
    }

    #[tokio::test]
    async fn test_empty_snapshot_yields_empty_summary() {
        let engine = StatsEngine::from_descriptors(&[]).unwrap();
        let summaries = engine.summarize_by_category().await.unwrap();
        assert!(summaries.is_empty());
    }
}
