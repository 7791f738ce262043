//! rootstat CLI entry point.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rootstat::cli::{Args, ExportFormat, Exporter, OutputFormatter};
use rootstat::classify::TypeCategory;
use rootstat::query::{scanned_to_batch, StatsEngine};
use rootstat::source::{list_containers, ContainerSource, RootTreeSource};
use rootstat::stats::{describe_fields, scan_value_stats};
use rootstat::{plot, report};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    // Require a ROOT file for all operations
    let file = args
        .file
        .context("ROOT file required. Use --help for usage.")?;

    // Handle info-only commands
    if args.list_trees {
        let trees = list_containers(&file)
            .with_context(|| format!("Failed to open ROOT file: {}", file.display()))?;
        if trees.is_empty() {
            println!("No trees found in {}", file.display());
        } else {
            println!("Trees in {}:", file.display());
            for name in trees {
                println!("  {name}");
            }
        }
        return Ok(());
    }

    let source = RootTreeSource::open(&file, &args.tree).with_context(|| {
        format!("Failed to open tree '{}' in {}", args.tree, file.display())
    })?;

    let fields = describe_fields(&source);
    if fields.is_empty() {
        println!("No readable branches in tree '{}'.", args.tree);
        return Ok(());
    }

    let engine = StatsEngine::from_descriptors(&fields)?;
    let formatter = OutputFormatter::new(args.format);

    // Execute query from -e flag
    if let Some(query) = &args.query {
        let batches = engine.query(query).await?;

        // Export if output file specified
        if let Some(output_path) = &args.output {
            let export_format = args
                .export_format
                .or_else(|| ExportFormat::from_extension(output_path))
                .unwrap_or(ExportFormat::Csv);

            let rows = Exporter::export(output_path, export_format, &batches)?;
            eprintln!("Exported {} rows to {}", rows, output_path.display());
        } else {
            let mut stdout = io::stdout();
            for batch in batches {
                formatter.write(&batch, &mut stdout)?;
            }
        }
        return Ok(());
    }

    // Default mode: console report over the category summary
    let summaries = engine.summarize_by_category().await?;
    {
        let mut stdout = io::stdout();
        report::write_report(&mut stdout, &summaries, &fields, source.entries(), args.top)?;
    }

    let file_label = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    // Opt-in value-statistics pass
    if args.stats || args.csv.is_some() {
        let scanned = scan_value_stats(&source, &fields, TypeCategory::VectorFloat, &args.exclude);

        if scanned.is_empty() {
            println!("No vector<float> branches matched the value-statistics pass.");
        } else {
            let batch = scanned_to_batch(&scanned, &file_label)?;

            if let Some(csv_path) = &args.csv {
                let rows = Exporter::export(csv_path, ExportFormat::Csv, &[batch])?;
                eprintln!("Branch statistics saved to {} ({rows} rows)", csv_path.display());
            } else {
                let mut stdout = io::stdout();
                formatter.write(&batch, &mut stdout)?;
            }
        }
    }

    // Optional figures
    if args.plots.is_some() || !args.hist.is_empty() {
        let dir = args
            .plots
            .clone()
            .unwrap_or_else(|| PathBuf::from("plots"));
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create plot directory: {}", dir.display()))?;

        if args.plots.is_some() {
            plot::category_reduction_plot(
                &summaries,
                &file_label,
                &dir.join("reduction_by_dtype.png"),
            )?;
            plot::branch_reduction_plot(
                &fields,
                TypeCategory::VectorFloat,
                args.reduction_threshold,
                &file_label,
                &dir.join("reduction_by_branch.png"),
            )?;
        }

        for branch in &args.hist {
            let path = dir.join(format!("hist_{}.png", branch.replace('.', "_")));
            plot::branch_value_histogram(&source, branch, plot::HISTOGRAM_BINS, &path)
                .with_context(|| format!("Failed to plot histogram for {branch}"))?;
        }

        eprintln!("Figures written to {}", dir.display());
    }

    Ok(())
}
