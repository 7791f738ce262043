//! Per-branch storage descriptors and value statistics.
//!
//! The cheap pass walks branch metadata into [`FieldDescriptor`] snapshots;
//! the expensive, opt-in pass ([`scan_value_stats`]) loads full value
//! columns and summarizes them. Both passes treat per-branch failures as
//! recoverable: the branch is logged and skipped, the walk continues.

use tracing::{debug, warn};

use crate::classify::{classify, TypeCategory};
use crate::source::{container_prefix, ContainerSource};

/// Read-only snapshot of one branch's storage metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Prefix of `name` before the first `.` (the owning collection).
    pub container: String,
    pub category: TypeCategory,
    /// Raw interpretation string the category was derived from.
    pub interpretation: String,
    pub compressed_bytes: u64,
    pub uncompressed_bytes: u64,
    pub compression_ratio: f64,
}

impl FieldDescriptor {
    /// Percent reduction from uncompressed to compressed size.
    pub fn reduction_pct(&self) -> f64 {
        reduction_pct(self.compressed_bytes, self.uncompressed_bytes)
    }
}

/// Storage summary for one type category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: TypeCategory,
    pub compressed_bytes: u64,
    pub uncompressed_bytes: u64,
    pub num_branches: u64,
    pub compression_ratio: f64,
    /// This category's share of total compressed bytes, in percent.
    pub pct_of_compressed: f64,
    /// This category's share of total uncompressed bytes, in percent.
    pub pct_of_uncompressed: f64,
}

impl CategorySummary {
    /// Percent reduction from uncompressed to compressed size.
    pub fn reduction_pct(&self) -> f64 {
        reduction_pct(self.compressed_bytes, self.uncompressed_bytes)
    }
}

/// Compression ratio with the degenerate cases pinned down.
///
/// A branch with no uncompressed payload has nothing to compress, so its
/// ratio is 1.0 (not a division by zero). A branch with payload but zero
/// compressed bytes is stored without reduction metadata, reported as
/// infinite.
pub fn compression_ratio(compressed_bytes: u64, uncompressed_bytes: u64) -> f64 {
    if uncompressed_bytes == 0 {
        1.0
    } else if compressed_bytes == 0 {
        f64::INFINITY
    } else {
        uncompressed_bytes as f64 / compressed_bytes as f64
    }
}

/// Percent reduction from uncompressed to compressed size; 0 for branches
/// with no uncompressed payload.
pub fn reduction_pct(compressed_bytes: u64, uncompressed_bytes: u64) -> f64 {
    if uncompressed_bytes == 0 {
        0.0
    } else {
        100.0 * (1.0 - compressed_bytes as f64 / uncompressed_bytes as f64)
    }
}

/// Walk every branch of a container into descriptors.
///
/// Branches whose metadata cannot be read are logged at `warn` and left out
/// of the result; the walk never fails as a whole.
pub fn describe_fields(source: &dyn ContainerSource) -> Vec<FieldDescriptor> {
    let names = source.field_names();
    let mut fields = Vec::with_capacity(names.len());

    for name in names {
        match source.field_meta(&name) {
            Ok(meta) => {
                let category = classify(&meta.interpretation);
                fields.push(FieldDescriptor {
                    container: container_prefix(&meta.name).to_string(),
                    category,
                    compression_ratio: compression_ratio(
                        meta.compressed_bytes,
                        meta.uncompressed_bytes,
                    ),
                    name: meta.name,
                    interpretation: meta.interpretation,
                    compressed_bytes: meta.compressed_bytes,
                    uncompressed_bytes: meta.uncompressed_bytes,
                });
            }
            Err(e) => {
                warn!(branch = %name, error = %e, "skipping branch");
            }
        }
    }

    debug!(branches = fields.len(), "described container");
    fields
}

/// The `n` branches with the largest compressed size.
///
/// Ties keep their original encounter order (stable sort).
pub fn top_by_compressed(fields: &[FieldDescriptor], n: usize) -> Vec<&FieldDescriptor> {
    let mut ranked: Vec<&FieldDescriptor> = fields.iter().collect();
    ranked.sort_by(|a, b| b.compressed_bytes.cmp(&a.compressed_bytes));
    ranked.truncate(n);
    ranked
}

/// Collapse a sequence of per-entry sequences into one flat value list.
pub fn flatten_nested<I>(entries: I) -> Vec<f64>
where
    I: IntoIterator<Item = Vec<f64>>,
{
    entries.into_iter().flatten().collect()
}

/// Summary statistics over a flattened value sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueStats {
    pub mean: f64,
    /// Population standard deviation (not the sample estimator).
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub dynamic_range: f64,
}

/// Compute summary statistics; `None` for an empty sequence.
pub fn value_stats(values: &[f64]) -> Option<ValueStats> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(ValueStats {
        mean,
        std: variance.sqrt(),
        min,
        max,
        dynamic_range: max - min,
    })
}

/// One branch selected by the value-statistics pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedField {
    pub name: String,
    pub container: String,
    pub category: TypeCategory,
    /// `None` when the branch flattened to zero values.
    pub stats: Option<ValueStats>,
}

/// Opt-in heavy pass: load and summarize values for matching branches.
///
/// Selects descriptors of `category` whose names contain none of the
/// `exclude` substrings. Branches whose values cannot be read are logged
/// and skipped; branches that flatten to nothing are kept with unset
/// statistics.
pub fn scan_value_stats(
    source: &dyn ContainerSource,
    fields: &[FieldDescriptor],
    category: TypeCategory,
    exclude: &[String],
) -> Vec<ScannedField> {
    let mut scanned = Vec::new();

    for field in fields {
        if field.category != category {
            continue;
        }
        if exclude.iter().any(|pat| field.name.contains(pat)) {
            debug!(branch = %field.name, "excluded from value scan");
            continue;
        }

        match source.field_values(&field.name) {
            Ok(values) => scanned.push(ScannedField {
                name: field.name.clone(),
                container: field.container.clone(),
                category: field.category,
                stats: value_stats(&values),
            }),
            Err(e) => {
                warn!(branch = %field.name, error = %e, "skipping branch in value scan");
            }
        }
    }

    scanned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str, category: TypeCategory, compressed: u64) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            container: container_prefix(name).to_string(),
            category,
            interpretation: String::new(),
            compressed_bytes: compressed,
            uncompressed_bytes: compressed * 2,
            compression_ratio: compression_ratio(compressed, compressed * 2),
        }
    }

    #[test]
    fn test_compression_ratio_normal() {
        assert_eq!(compression_ratio(1000, 4000), 4.0);
        assert_eq!(compression_ratio(500, 500), 1.0);
    }

    #[test]
    fn test_compression_ratio_zero_uncompressed_is_one() {
        assert_eq!(compression_ratio(0, 0), 1.0);
        assert_eq!(compression_ratio(7, 0), 1.0);
    }

    #[test]
    fn test_compression_ratio_zero_compressed_is_infinite() {
        assert_eq!(compression_ratio(0, 100), f64::INFINITY);
    }

    #[test]
    fn test_reduction_pct() {
        assert_eq!(reduction_pct(1000, 4000), 75.0);
        assert_eq!(reduction_pct(500, 500), 0.0);
        assert_eq!(reduction_pct(0, 0), 0.0);
    }

    #[test]
    fn test_top_by_compressed_orders_descending() {
        let fields = vec![
            descriptor("a", TypeCategory::Float, 300),
            descriptor("b", TypeCategory::Float, 900),
            descriptor("c", TypeCategory::Float, 100),
        ];

        let top = top_by_compressed(&fields, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "b");
        assert_eq!(top[1].name, "a");
    }

    #[test]
    fn test_top_by_compressed_ties_keep_encounter_order() {
        let fields = vec![
            descriptor("first", TypeCategory::Float, 500),
            descriptor("second", TypeCategory::Float, 500),
            descriptor("third", TypeCategory::Float, 500),
        ];

        let top = top_by_compressed(&fields, 3);
        let names: Vec<&str> = top.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn test_flatten_nested() {
        let flat = flatten_nested(vec![vec![1.0, 2.0], vec![], vec![3.0]]);
        assert_eq!(flat, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_value_stats_worked_example() {
        let flat = flatten_nested(vec![vec![1.0, 2.0], vec![], vec![3.0]]);
        let stats = value_stats(&flat).unwrap();

        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.dynamic_range, 2.0);
        // Population std of [1, 2, 3] is sqrt(2/3).
        assert!((stats.std - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_value_stats_empty_is_none() {
        assert_eq!(value_stats(&[]), None);
    }
}
