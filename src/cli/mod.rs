//! Command-line interface: argument parsing, result formatting, exports.

mod args;
mod export;
mod output;

pub use args::{Args, ExportFormat};
pub use export::Exporter;
pub use output::{OutputFormat, OutputFormatter};
