//! Output formatting for query results.
//!
//! Provides type-aware formatting for query results, rendering compression
//! ratio columns as human-readable multipliers ("4.00x", "inf") while
//! displaying in table, CSV, or JSON format.

use std::io::Write;
use std::sync::Arc;

use arrow::array::{Array, Float64Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema};
use clap::ValueEnum;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table (default)
    Table,
    /// Comma-separated values
    Csv,
    /// JSON Lines (one JSON object per row)
    Json,
}

/// Formats query results for output.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    /// Create a new formatter with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format a RecordBatch and write to the given writer.
    pub fn write<W: Write>(&self, batch: &RecordBatch, writer: &mut W) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Table => self.write_table(batch, writer),
            OutputFormat::Csv => self.write_csv(batch, writer),
            OutputFormat::Json => self.write_json(batch, writer),
        }
    }

    /// A Float64 column whose name ends in `_ratio` holds a compression
    /// multiplier and gets the `Nx` rendering.
    fn is_ratio_column(field: &Field) -> bool {
        field.data_type() == &DataType::Float64 && field.name().ends_with("_ratio")
    }

    fn detect_ratio_columns(schema: &Schema) -> Vec<bool> {
        schema.fields().iter().map(|f| Self::is_ratio_column(f)).collect()
    }

    /// Format a single cell value, applying ratio formatting if applicable.
    fn format_value(col: &Arc<dyn Array>, row_idx: usize, is_ratio: bool) -> String {
        if col.is_null(row_idx) {
            return String::new();
        }

        if is_ratio {
            if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
                let ratio = arr.value(row_idx);
                if ratio.is_infinite() {
                    return "inf".to_string();
                }
                return format!("{ratio:.2}x");
            }
        }

        arrow::util::display::array_value_to_string(col, row_idx)
            .unwrap_or_else(|_| "?".to_string())
    }

    fn write_table<W: Write>(&self, batch: &RecordBatch, writer: &mut W) -> std::io::Result<()> {
        use comfy_table::{Cell, Table};

        let ratio_cols = Self::detect_ratio_columns(batch.schema().as_ref());

        let mut table = Table::new();

        let headers: Vec<Cell> = batch
            .schema()
            .fields()
            .iter()
            .map(|f| Cell::new(f.name()))
            .collect();
        table.set_header(headers);

        for row_idx in 0..batch.num_rows() {
            let mut row = Vec::with_capacity(batch.num_columns());
            for (col_idx, col) in batch.columns().iter().enumerate() {
                let value = Self::format_value(col, row_idx, ratio_cols[col_idx]);
                row.push(Cell::new(value));
            }
            table.add_row(row);
        }

        writeln!(writer, "{table}")
    }

    fn write_csv<W: Write>(&self, batch: &RecordBatch, writer: &mut W) -> std::io::Result<()> {
        let ratio_cols = Self::detect_ratio_columns(batch.schema().as_ref());

        let schema = batch.schema();
        let headers: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        writeln!(writer, "{}", headers.join(","))?;

        for row_idx in 0..batch.num_rows() {
            let mut values = Vec::with_capacity(batch.num_columns());
            for (col_idx, col) in batch.columns().iter().enumerate() {
                let value = Self::format_value(col, row_idx, ratio_cols[col_idx]);
                // Escape commas and quotes
                if value.contains(',') || value.contains('"') || value.contains('\n') {
                    values.push(format!("\"{}\"", value.replace('"', "\"\"")));
                } else {
                    values.push(value);
                }
            }
            writeln!(writer, "{}", values.join(","))?;
        }

        Ok(())
    }

    fn write_json<W: Write>(&self, batch: &RecordBatch, writer: &mut W) -> std::io::Result<()> {
        let schema = batch.schema();
        let ratio_cols = Self::detect_ratio_columns(schema.as_ref());

        for row_idx in 0..batch.num_rows() {
            let mut obj = serde_json::Map::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let col = batch.column(col_idx);

                let json_value = if col.is_null(row_idx) {
                    serde_json::Value::Null
                } else if ratio_cols[col_idx] {
                    // Formatted ratios are always strings
                    let value = Self::format_value(col, row_idx, true);
                    serde_json::Value::String(value)
                } else {
                    // Non-ratio values: try to preserve type
                    let value = arrow::util::display::array_value_to_string(col, row_idx)
                        .unwrap_or_else(|_| "null".to_string());

                    if value == "null" {
                        serde_json::Value::Null
                    } else if let Ok(n) = value.parse::<i64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::json!(n)
                    } else if value == "true" {
                        serde_json::Value::Bool(true)
                    } else if value == "false" {
                        serde_json::Value::Bool(false)
                    } else {
                        serde_json::Value::String(value)
                    }
                };

                obj.insert(field.name().clone(), json_value);
            }

            writeln!(writer, "{}", serde_json::Value::Object(obj))?;
        }

        Ok(())
    }
}
