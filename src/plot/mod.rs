//! Bar-chart figures for compression statistics.
//!
//! Renders horizontal uncompressed-vs-compressed bars with percent
//! reduction labels, per category (log size axis) or per branch (linear
//! axis). Charts are saved as PNG via the plotters bitmap backend, which
//! keeps rendering headless-friendly.

use std::path::Path;

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use tracing::info;

use crate::classify::TypeCategory;
use crate::error::{Error, PlotError};
use crate::source::ContainerSource;
use crate::stats::{CategorySummary, FieldDescriptor};

const BAR_UNCOMPRESSED: RGBColor = RGBColor(211, 211, 211);
const BAR_COMPRESSED: RGBColor = RGBColor(70, 130, 180);
const LABEL_COLOR: RGBColor = RGBColor(200, 30, 30);

const CHART_WIDTH: u32 = 900;

/// Default bin count for value histograms.
pub const HISTOGRAM_BINS: usize = 100;

/// One horizontal bar row.
struct BarRow {
    label: String,
    compressed: f64,
    uncompressed: f64,
    reduction_pct: f64,
}

/// Formats byte sizes into human-friendly base-10 units for axis labels.
fn format_byte_size(bytes: f64) -> String {
    let abs = bytes.abs();
    if abs >= 1e12 {
        format!("{:.0}TB", (bytes / 1e12).round())
    } else if abs >= 1e9 {
        format!("{:.0}GB", (bytes / 1e9).round())
    } else if abs >= 1e6 {
        format!("{:.0}MB", (bytes / 1e6).round())
    } else if abs >= 1e3 {
        format!("{:.0}kB", (bytes / 1e3).round())
    } else {
        format!("{:.0}B", bytes.round())
    }
}

/// Per-category size reduction chart with a log10 size axis.
///
/// Rows appear in the order of `summaries` (largest compressed first, the
/// summary sort order). An empty input produces no file, only a log line.
pub fn category_reduction_plot(
    summaries: &[CategorySummary],
    file_label: &str,
    output_path: &Path,
) -> Result<(), PlotError> {
    let rows: Vec<BarRow> = summaries
        .iter()
        .map(|s| BarRow {
            label: s.category.label().to_string(),
            compressed: s.compressed_bytes as f64,
            uncompressed: s.uncompressed_bytes as f64,
            reduction_pct: s.reduction_pct(),
        })
        .collect();

    if rows.is_empty() {
        info!("no categories to plot");
        return Ok(());
    }

    let title = format!("Reduction in Size by Data Type ({file_label})");
    render_bar_chart(&rows, &title, output_path, true, 500)
}

/// Per-branch chart for one category, restricted to branches whose size
/// reduction falls below `threshold_pct`. Linear size axis, rows sorted by
/// branch name.
pub fn branch_reduction_plot(
    fields: &[FieldDescriptor],
    category: TypeCategory,
    threshold_pct: f64,
    file_label: &str,
    output_path: &Path,
) -> Result<(), PlotError> {
    let mut rows: Vec<BarRow> = fields
        .iter()
        .filter(|f| f.category == category && f.reduction_pct() < threshold_pct)
        .map(|f| BarRow {
            label: f.name.clone(),
            compressed: f.compressed_bytes as f64,
            uncompressed: f.uncompressed_bytes as f64,
            reduction_pct: f.reduction_pct(),
        })
        .collect();

    if rows.is_empty() {
        info!(
            category = %category,
            threshold = threshold_pct,
            "no branches below reduction threshold, skipping plot"
        );
        return Ok(());
    }

    rows.sort_by(|a, b| a.label.cmp(&b.label));

    let title = format!(
        "{category} branches with < {threshold_pct:.0}% reduction ({file_label})"
    );
    let height = (rows.len() as u32) * 35 + 150;
    render_bar_chart(&rows, &title, output_path, false, height)
}

/// Value-distribution histogram for one branch.
///
/// Loads and flattens the branch values through the source; an unreadable
/// branch is a hard error here, the caller asked for it by name. A branch
/// that flattens to zero values produces no file, only a log line.
pub fn branch_value_histogram(
    source: &dyn ContainerSource,
    branch: &str,
    bins: usize,
    output_path: &Path,
) -> Result<(), Error> {
    let values = source.field_values(branch)?;
    let cells = histogram_bins(&values, bins);

    if cells.is_empty() {
        info!(branch = %branch, "no values to histogram, skipping plot");
        return Ok(());
    }

    render_histogram(&cells, branch, output_path).map_err(Error::Plot)
}

/// Bin values into `bins` equal-width buckets over `[min, max]`.
///
/// Returns `(bin_center, count)` pairs. The last bin is inclusive of the
/// maximum; a constant-valued input widens the range by half a unit on each
/// side so everything lands in the middle bin.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<(f64, u64)> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0u64; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| (lo + width * (i as f64 + 0.5), count))
        .collect()
}

fn render_histogram(
    cells: &[(f64, u64)],
    branch: &str,
    output_path: &Path,
) -> Result<(), PlotError> {
    let root = BitMapBackend::new(output_path, (600, 400)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let half_width = if cells.len() >= 2 {
        (cells[1].0 - cells[0].0) / 2.0
    } else {
        0.5
    };
    let x_lo = cells[0].0 - half_width;
    let x_hi = cells[cells.len() - 1].0 + half_width;
    let y_max = cells.iter().map(|c| c.1).max().unwrap_or(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{branch} Distribution"), ("sans-serif", 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, 0.0..y_max * 1.05)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(branch)
        .y_desc("Counts")
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(cells.iter().map(|&(center, count)| {
            Rectangle::new(
                [(center - half_width, 0.0), (center + half_width, count as f64)],
                BAR_COMPRESSED.filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

fn render_bar_chart(
    rows: &[BarRow],
    title: &str,
    output_path: &Path,
    log_axis: bool,
    height: u32,
) -> Result<(), PlotError> {
    let root = BitMapBackend::new(output_path, (CHART_WIDTH, height)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let x_max = rows
        .iter()
        .map(|r| r.uncompressed)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1.0);
    let n = rows.len() as f64;

    if log_axis {
        // Bars start at 1 byte; log scale cannot reach zero.
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(160)
            .build_cartesian_2d((1.0..x_max * 2.0).log_scale(), 0.0..n)
            .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("Size (bytes)")
            .x_label_formatter(&|x| format_byte_size(*x))
            .y_labels(rows.len())
            .y_label_formatter(&row_label_formatter(rows))
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        draw_bars(&mut chart, rows, 1.0)?;
    } else {
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(220)
            .build_cartesian_2d(0.0..x_max * 1.15, 0.0..n)
            .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("Size (bytes)")
            .x_label_formatter(&|x| format_byte_size(*x))
            .y_labels(rows.len())
            .y_label_formatter(&row_label_formatter(rows))
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        draw_bars(&mut chart, rows, 0.0)?;
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

/// Map a fractional axis position back to the row label it falls in.
fn row_label_formatter(rows: &[BarRow]) -> impl Fn(&f64) -> String + '_ {
    move |y: &f64| {
        let idx = y.floor();
        if idx < 0.0 {
            return String::new();
        }
        rows.get(idx as usize)
            .map(|r| r.label.clone())
            .unwrap_or_default()
    }
}

/// Draw overlayed uncompressed/compressed bars plus reduction labels.
fn draw_bars<DB, X>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<X, RangedCoordf64>>,
    rows: &[BarRow],
    x_base: f64,
) -> Result<(), PlotError>
where
    DB: DrawingBackend,
    X: Ranged<ValueType = f64>,
{
    chart
        .draw_series(rows.iter().enumerate().map(|(i, r)| {
            Rectangle::new(
                [
                    (x_base, i as f64 + 0.15),
                    (r.uncompressed.max(x_base), i as f64 + 0.85),
                ],
                BAR_UNCOMPRESSED.filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(rows.iter().enumerate().map(|(i, r)| {
            Rectangle::new(
                [
                    (x_base, i as f64 + 0.15),
                    (r.compressed.max(x_base), i as f64 + 0.85),
                ],
                BAR_COMPRESSED.filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(rows.iter().enumerate().map(|(i, r)| {
            Text::new(
                format!("-{:.0}%", r.reduction_pct),
                (r.uncompressed.max(x_base), i as f64 + 0.4),
                ("sans-serif", 14).into_font().color(&LABEL_COLOR),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::compression_ratio;
    use tempfile::tempdir;

    fn summary(category: TypeCategory, compressed: u64, uncompressed: u64) -> CategorySummary {
        CategorySummary {
            category,
            compressed_bytes: compressed,
            uncompressed_bytes: uncompressed,
            num_branches: 1,
            compression_ratio: compression_ratio(compressed, uncompressed),
            pct_of_compressed: 100.0,
            pct_of_uncompressed: 100.0,
        }
    }

    fn descriptor(name: &str, compressed: u64, uncompressed: u64) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            container: name.to_string(),
            category: TypeCategory::VectorFloat,
            interpretation: String::new(),
            compressed_bytes: compressed,
            uncompressed_bytes: uncompressed,
            compression_ratio: compression_ratio(compressed, uncompressed),
        }
    }

    #[test]
    fn test_format_byte_size() {
        assert_eq!(format_byte_size(0.0), "0B");
        assert_eq!(format_byte_size(512.0), "512B");
        assert_eq!(format_byte_size(10_000.0), "10kB");
        assert_eq!(format_byte_size(2_500_000.0), "3MB");
        assert_eq!(format_byte_size(4e9), "4GB");
        assert_eq!(format_byte_size(1e12), "1TB");
    }

    #[test]
    fn test_empty_inputs_produce_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.png");

        category_reduction_plot(&[], "f.root", &path).unwrap();
        assert!(!path.exists());

        branch_reduction_plot(&[], TypeCategory::VectorFloat, 50.0, "f.root", &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_threshold_filter_excludes_well_compressed_branches() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("branches.png");

        // 75% reduction, above a 50% threshold: filtered out, no chart.
        let fields = vec![descriptor("Jets.pt", 1000, 4000)];
        branch_reduction_plot(&fields, TypeCategory::VectorFloat, 50.0, "f.root", &path)
            .unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_histogram_bins_counts_and_centers() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0];
        let cells = histogram_bins(&values, 4);

        assert_eq!(cells.len(), 4);
        let total: u64 = cells.iter().map(|c| c.1).sum();
        assert_eq!(total, 5);
        assert_eq!(cells[0], (0.5, 1));
        // The maximum lands in the last bin, not past it.
        assert_eq!(cells[3], (3.5, 2));
    }

    #[test]
    fn test_histogram_bins_constant_values_single_spike() {
        let cells = histogram_bins(&[7.0; 10], 5);

        // The range widens to [6.5, 7.5]; everything falls in the middle bin.
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[2].1, 10);
        let total: u64 = cells.iter().map(|c| c.1).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn test_histogram_bins_degenerate_inputs() {
        assert!(histogram_bins(&[], 100).is_empty());
        assert!(histogram_bins(&[1.0], 0).is_empty());
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn test_category_plot_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("categories.png");

        let summaries = vec![
            summary(TypeCategory::VectorFloat, 1_000_000, 4_000_000),
            summary(TypeCategory::Int32, 500, 500),
        ];
        category_reduction_plot(&summaries, "sample.root", &path).unwrap();

        assert!(path.exists());
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn test_branch_plot_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("branches.png");

        // 20% reduction, below the 50% threshold.
        let fields = vec![
            descriptor("Jets.phi", 800, 1000),
            descriptor("Jets.eta", 900, 1000),
        ];
        branch_reduction_plot(&fields, TypeCategory::VectorFloat, 50.0, "f.root", &path)
            .unwrap();

        assert!(path.exists());
    }
}
