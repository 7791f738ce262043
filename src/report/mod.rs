//! Formatted console report.
//!
//! Mirrors the layout analysts are used to: overall totals, a per-category
//! breakdown, a focused look at `vector<float>` storage, and a top-N
//! listing by compressed size. Everything writes to a generic writer so
//! the sections are testable off-screen.

use std::io::{self, Write};

use crate::classify::TypeCategory;
use crate::stats::{top_by_compressed, CategorySummary, FieldDescriptor};

const RULE: &str = "================================================================================";

fn mb(bytes: u64) -> f64 {
    bytes as f64 / 1e6
}

fn format_ratio(ratio: f64) -> String {
    if ratio.is_infinite() {
        "inf".to_string()
    } else {
        format!("{ratio:.2}x")
    }
}

/// Write the full multi-section report.
pub fn write_report<W: Write>(
    w: &mut W,
    summaries: &[CategorySummary],
    fields: &[FieldDescriptor],
    entries: u64,
    top_n: usize,
) -> io::Result<()> {
    write_overall(w, summaries, entries)?;
    write_by_category(w, summaries)?;
    write_vector_float_focus(w, summaries)?;
    write_top_fields(w, fields, top_n)?;
    Ok(())
}

/// Overall totals section.
pub fn write_overall<W: Write>(
    w: &mut W,
    summaries: &[CategorySummary],
    entries: u64,
) -> io::Result<()> {
    let total_compressed: u64 = summaries.iter().map(|s| s.compressed_bytes).sum();
    let total_uncompressed: u64 = summaries.iter().map(|s| s.uncompressed_bytes).sum();
    let total_branches: u64 = summaries.iter().map(|s| s.num_branches).sum();
    let overall_ratio = crate::stats::compression_ratio(total_compressed, total_uncompressed);

    writeln!(w, "{RULE}")?;
    writeln!(w, "OVERALL FILE SUMMARY")?;
    writeln!(w, "{RULE}")?;

    if summaries.is_empty() {
        writeln!(w, "No branches found.")?;
        writeln!(w)?;
        return Ok(());
    }

    writeln!(w, "Entries:              {entries}")?;
    writeln!(w, "Total branches:       {total_branches}")?;
    writeln!(w, "Compressed size:      {:.2} MB", mb(total_compressed))?;
    writeln!(w, "Uncompressed size:    {:.2} MB", mb(total_uncompressed))?;
    writeln!(w, "Overall compression:  {}", format_ratio(overall_ratio))?;
    writeln!(w)?;
    Ok(())
}

/// Per-category breakdown section.
pub fn write_by_category<W: Write>(w: &mut W, summaries: &[CategorySummary]) -> io::Result<()> {
    writeln!(w, "{RULE}")?;
    writeln!(w, "SUMMARY BY DATA TYPE")?;
    writeln!(w, "{RULE}")?;
    writeln!(w)?;

    for s in summaries {
        writeln!(w, "{}", s.category)?;
        writeln!(w, "  Branches:          {}", s.num_branches)?;
        writeln!(
            w,
            "  Compressed:        {:.2} MB ({:.1}% of file)",
            mb(s.compressed_bytes),
            s.pct_of_compressed
        )?;
        writeln!(
            w,
            "  Uncompressed:      {:.2} MB ({:.1}%)",
            mb(s.uncompressed_bytes),
            s.pct_of_uncompressed
        )?;
        writeln!(w, "  Compression ratio: {}", format_ratio(s.compression_ratio))?;
        writeln!(w)?;
    }
    Ok(())
}

/// Focused comparison of `vector<float>` against other vectors and scalars.
pub fn write_vector_float_focus<W: Write>(
    w: &mut W,
    summaries: &[CategorySummary],
) -> io::Result<()> {
    writeln!(w, "{RULE}")?;
    writeln!(w, "VECTOR<FLOAT> FOCUS")?;
    writeln!(w, "{RULE}")?;

    let Some(vf) = summaries
        .iter()
        .find(|s| s.category == TypeCategory::VectorFloat)
    else {
        writeln!(w, "No vector<float> branches found in this file.")?;
        writeln!(w)?;
        return Ok(());
    };

    writeln!(
        w,
        "vector<float> is {:.1}% of compressed file size",
        vf.pct_of_compressed
    )?;
    writeln!(
        w,
        "vector<float> is {:.1}% of uncompressed file size",
        vf.pct_of_uncompressed
    )?;
    writeln!(
        w,
        "vector<float> compresses at {}",
        format_ratio(vf.compression_ratio)
    )?;

    if let Some(ratio) = grouped_ratio(summaries, |c| {
        c.is_vector() && c != TypeCategory::VectorFloat
    }) {
        writeln!(w, "Other vector types compress at {}", format_ratio(ratio))?;
    }

    if let Some(ratio) = grouped_ratio(summaries, |c| c.is_scalar()) {
        writeln!(w, "Scalar types compress at {}", format_ratio(ratio))?;
    }

    writeln!(w)?;
    Ok(())
}

/// Combined ratio over the summaries whose category matches `pred`.
fn grouped_ratio(
    summaries: &[CategorySummary],
    pred: impl Fn(TypeCategory) -> bool,
) -> Option<f64> {
    let matching: Vec<&CategorySummary> =
        summaries.iter().filter(|s| pred(s.category)).collect();
    if matching.is_empty() {
        return None;
    }

    let compressed: u64 = matching.iter().map(|s| s.compressed_bytes).sum();
    let uncompressed: u64 = matching.iter().map(|s| s.uncompressed_bytes).sum();
    Some(crate::stats::compression_ratio(compressed, uncompressed))
}

/// Top-N branches by compressed size.
pub fn write_top_fields<W: Write>(
    w: &mut W,
    fields: &[FieldDescriptor],
    n: usize,
) -> io::Result<()> {
    writeln!(w, "{RULE}")?;
    writeln!(w, "TOP {n} BRANCHES BY COMPRESSED SIZE")?;
    writeln!(w, "{RULE}")?;
    writeln!(w)?;

    for field in top_by_compressed(fields, n) {
        writeln!(w, "{}", field.name)?;
        writeln!(w, "  Type:        {}", field.category)?;
        writeln!(w, "  Compressed:  {:.3} MB", mb(field.compressed_bytes))?;
        writeln!(w, "  Ratio:       {}", format_ratio(field.compression_ratio))?;
        writeln!(w)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::compression_ratio;

    fn summary(category: TypeCategory, compressed: u64, uncompressed: u64) -> CategorySummary {
        CategorySummary {
            category,
            compressed_bytes: compressed,
            uncompressed_bytes: uncompressed,
            num_branches: 1,
            compression_ratio: compression_ratio(compressed, uncompressed),
            pct_of_compressed: 50.0,
            pct_of_uncompressed: 50.0,
        }
    }

    fn render(summaries: &[CategorySummary], fields: &[FieldDescriptor]) -> String {
        let mut out = Vec::new();
        write_report(&mut out, summaries, fields, 1200, 5).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_report_has_all_sections() {
        let summaries = vec![
            summary(TypeCategory::VectorFloat, 1000, 4000),
            summary(TypeCategory::Int32, 500, 500),
        ];
        let text = render(&summaries, &[]);

        assert!(text.contains("OVERALL FILE SUMMARY"));
        assert!(text.contains("SUMMARY BY DATA TYPE"));
        assert!(text.contains("VECTOR<FLOAT> FOCUS"));
        assert!(text.contains("TOP 5 BRANCHES BY COMPRESSED SIZE"));
    }

    #[test]
    fn test_overall_totals() {
        let summaries = vec![
            summary(TypeCategory::VectorFloat, 1_000_000, 4_000_000),
            summary(TypeCategory::Int32, 1_000_000, 1_000_000),
        ];
        let text = render(&summaries, &[]);

        assert!(text.contains("Entries:              1200"));
        assert!(text.contains("Compressed size:      2.00 MB"));
        assert!(text.contains("Uncompressed size:    5.00 MB"));
        assert!(text.contains("Overall compression:  2.50x"));
    }

    #[test]
    fn test_focus_compares_against_other_groups() {
        let summaries = vec![
            summary(TypeCategory::VectorFloat, 1000, 4000),
            summary(TypeCategory::VectorInt32, 1000, 2000),
            summary(TypeCategory::Double, 100, 300),
        ];
        let text = render(&summaries, &[]);

        assert!(text.contains("vector<float> compresses at 4.00x"));
        assert!(text.contains("Other vector types compress at 2.00x"));
        assert!(text.contains("Scalar types compress at 3.00x"));
    }

    #[test]
    fn test_focus_absent_category_is_informational() {
        let summaries = vec![summary(TypeCategory::Int32, 500, 500)];
        let text = render(&summaries, &[]);

        assert!(text.contains("No vector<float> branches found in this file."));
    }

    #[test]
    fn test_empty_report_is_informational() {
        let text = render(&[], &[]);
        assert!(text.contains("No branches found."));
    }

    #[test]
    fn test_infinite_ratio_renders_as_inf() {
        let summaries = vec![summary(TypeCategory::VectorOther, 0, 100)];
        let text = render(&summaries, &[]);
        assert!(text.contains("Compression ratio: inf"));
    }
}
