//! rootstat - Branch-level storage statistics for ROOT ntuple files.
//!
//! This library reads per-branch compression metadata from a ROOT tree,
//! classifies branches into data-type categories, and aggregates storage
//! statistics using SQL via Apache DataFusion.
//!
//! # Example
//!
//! ```no_run
//! use rootstat::query::StatsEngine;
//! use rootstat::source::RootTreeSource;
//! use rootstat::stats::describe_fields;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let source = RootTreeSource::open("sample.root", "CollectionTree")?;
//!     let fields = describe_fields(&source);
//!     let engine = StatsEngine::from_descriptors(&fields)?;
//!     let summaries = engine.summarize_by_category().await?;
//!     // Render a report, export, or plot...
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod cli;
pub mod error;
pub mod plot;
pub mod query;
pub mod report;
pub mod source;
pub mod stats;

pub use error::{Error, Result};
