//! Arrow schemas for the branch metadata table and the statistics export.

use arrow::datatypes::{DataType, Field, Schema};

/// Schema of the `branches` table registered with the query engine.
pub fn build_branches_schema() -> Schema {
    Schema::new(vec![
        Field::new("branch", DataType::Utf8, false),
        Field::new("container", DataType::Utf8, false),
        Field::new("dtype_category", DataType::Utf8, false),
        Field::new("interpretation", DataType::Utf8, false),
        Field::new("compressed_bytes", DataType::UInt64, false),
        Field::new("uncompressed_bytes", DataType::UInt64, false),
        Field::new("compression_ratio", DataType::Float64, false),
    ])
}

/// Schema of the per-branch value statistics export.
///
/// The statistics columns are nullable: a branch that flattened to zero
/// values keeps its row with unset statistics.
pub fn build_stats_schema() -> Schema {
    Schema::new(vec![
        Field::new("branch", DataType::Utf8, false),
        Field::new("container", DataType::Utf8, false),
        Field::new("dtype_category", DataType::Utf8, false),
        Field::new("file", DataType::Utf8, false),
        Field::new("mean", DataType::Float64, true),
        Field::new("std", DataType::Float64, true),
        Field::new("min", DataType::Float64, true),
        Field::new("max", DataType::Float64, true),
        Field::new("dynamic_range", DataType::Float64, true),
    ])
}
