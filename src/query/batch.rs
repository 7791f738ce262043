//! Arrow RecordBatch construction from descriptor snapshots.

use std::sync::Arc;

use arrow::array::{Float64Array, RecordBatch, StringArray, UInt64Array};

use super::schema::{build_branches_schema, build_stats_schema};
use crate::error::QueryError;
use crate::stats::{FieldDescriptor, ScannedField};

/// Build the `branches` table batch from field descriptors.
///
/// One invocation produces one batch; the table is a snapshot, never
/// appended to.
pub fn descriptors_to_batch(fields: &[FieldDescriptor]) -> Result<RecordBatch, QueryError> {
    let schema = Arc::new(build_branches_schema());

    let branch = StringArray::from_iter_values(fields.iter().map(|f| f.name.as_str()));
    let container = StringArray::from_iter_values(fields.iter().map(|f| f.container.as_str()));
    let category = StringArray::from_iter_values(fields.iter().map(|f| f.category.label()));
    let interpretation =
        StringArray::from_iter_values(fields.iter().map(|f| f.interpretation.as_str()));
    let compressed = UInt64Array::from_iter_values(fields.iter().map(|f| f.compressed_bytes));
    let uncompressed = UInt64Array::from_iter_values(fields.iter().map(|f| f.uncompressed_bytes));
    let ratio = Float64Array::from_iter_values(fields.iter().map(|f| f.compression_ratio));

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(branch),
            Arc::new(container),
            Arc::new(category),
            Arc::new(interpretation),
            Arc::new(compressed),
            Arc::new(uncompressed),
            Arc::new(ratio),
        ],
    )
    .map_err(QueryError::from)
}

/// Build the statistics export batch from scanned branches.
///
/// `file_label` fills the `file` column on every row (one invocation, one
/// file).
pub fn scanned_to_batch(
    scanned: &[ScannedField],
    file_label: &str,
) -> Result<RecordBatch, QueryError> {
    let schema = Arc::new(build_stats_schema());

    let branch = StringArray::from_iter_values(scanned.iter().map(|s| s.name.as_str()));
    let container = StringArray::from_iter_values(scanned.iter().map(|s| s.container.as_str()));
    let category = StringArray::from_iter_values(scanned.iter().map(|s| s.category.label()));
    let file = StringArray::from_iter_values(scanned.iter().map(|_| file_label));

    let mean = Float64Array::from_iter(scanned.iter().map(|s| s.stats.map(|v| v.mean)));
    let std = Float64Array::from_iter(scanned.iter().map(|s| s.stats.map(|v| v.std)));
    let min = Float64Array::from_iter(scanned.iter().map(|s| s.stats.map(|v| v.min)));
    let max = Float64Array::from_iter(scanned.iter().map(|s| s.stats.map(|v| v.max)));
    let range =
        Float64Array::from_iter(scanned.iter().map(|s| s.stats.map(|v| v.dynamic_range)));

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(branch),
            Arc::new(container),
            Arc::new(category),
            Arc::new(file),
            Arc::new(mean),
            Arc::new(std),
            Arc::new(min),
            Arc::new(max),
            Arc::new(range),
        ],
    )
    .map_err(QueryError::from)
}
