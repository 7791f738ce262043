//! Reading branch metadata and values from a columnar container.
//!
//! The file reader itself is an external capability: given a path and a
//! tree name it yields per-branch metadata and value arrays. This module
//! defines the seam ([`ContainerSource`]) the rest of the crate works
//! against, plus the ROOT-backed implementation in [`root`].

pub mod root;

pub use root::{list_containers, RootTreeSource};

use crate::error::FieldError;

/// Raw per-branch metadata as reported by the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMeta {
    /// Branch name, e.g. `Electrons.pt`.
    pub name: String,
    /// Raw interpretation string (endianness + width + shape markers).
    pub interpretation: String,
    /// On-disk (compressed) byte count.
    pub compressed_bytes: u64,
    /// In-memory (uncompressed) byte count.
    pub uncompressed_bytes: u64,
}

/// One opened container ("tree") of a columnar file.
///
/// Metadata access is cheap; [`field_values`](Self::field_values) is the
/// expensive full-column scan and is only invoked by the opt-in statistics
/// pass. Implementations own the underlying file handle and release it on
/// drop, on every exit path.
pub trait ContainerSource {
    /// Name of the container this source was opened on.
    fn container_name(&self) -> &str;

    /// Number of entries (rows) in the container.
    fn entries(&self) -> u64;

    /// Names of all branches, in file order.
    fn field_names(&self) -> Vec<String>;

    /// Metadata for one branch. A failure here is recoverable: callers log
    /// and skip the branch.
    fn field_meta(&self, name: &str) -> Result<FieldMeta, FieldError>;

    /// All values of one branch, flattened to a single numeric sequence.
    fn field_values(&self, name: &str) -> Result<Vec<f64>, FieldError>;
}

/// Extract the container prefix from a branch name.
///
/// Branch names encode a nested-object convention: everything before the
/// first `.` names the owning collection. A name with no `.` is its own
/// container. The split happens exactly once; later dots stay in the
/// remainder.
pub fn container_prefix(name: &str) -> &str {
    match name.split_once('.') {
        Some((prefix, _)) => prefix,
        None => name,
    }
}
