//! ROOT-backed container source.
//!
//! Thin adapter over the `oxyroot` reader. All oxyroot-specific API use
//! lives here; the rest of the crate only sees [`ContainerSource`].

use std::path::Path;

use oxyroot::{ReaderTree, RootFile};

use super::{ContainerSource, FieldMeta};
use crate::error::{FieldError, RootError};

/// One ROOT tree opened for reading.
///
/// Owns the decoded tree; the file handle is released when this value is
/// dropped.
pub struct RootTreeSource {
    tree: ReaderTree,
    name: String,
}

impl RootTreeSource {
    /// Open `path` and look up the tree called `tree_name`.
    pub fn open<P: AsRef<Path>>(path: P, tree_name: &str) -> Result<Self, RootError> {
        let path = path.as_ref();
        let mut file = RootFile::open(path).map_err(|e| RootError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let tree = file.get_tree(tree_name).map_err(|_| RootError::TreeNotFound {
            tree: tree_name.to_string(),
        })?;

        tracing::debug!(tree = tree_name, "opened ROOT tree");

        Ok(Self {
            tree,
            name: tree_name.to_string(),
        })
    }
}

impl ContainerSource for RootTreeSource {
    fn container_name(&self) -> &str {
        &self.name
    }

    fn entries(&self) -> u64 {
        self.tree.entries().max(0) as u64
    }

    fn field_names(&self) -> Vec<String> {
        self.tree.branches().map(|b| b.name().to_string()).collect()
    }

    fn field_meta(&self, name: &str) -> Result<FieldMeta, FieldError> {
        let branch = self
            .tree
            .branch(name)
            .ok_or_else(|| FieldError::UnknownField {
                field: name.to_string(),
            })?;

        Ok(FieldMeta {
            name: branch.name().to_string(),
            interpretation: branch.item_type_name(),
            compressed_bytes: branch.zip_bytes().max(0) as u64,
            uncompressed_bytes: branch.total_bytes().max(0) as u64,
        })
    }

    fn field_values(&self, name: &str) -> Result<Vec<f64>, FieldError> {
        let branch = self
            .tree
            .branch(name)
            .ok_or_else(|| FieldError::UnknownField {
                field: name.to_string(),
            })?;

        let type_name = branch.item_type_name();
        let values_err = |e: &dyn std::fmt::Display| FieldError::Values {
            field: name.to_string(),
            reason: e.to_string(),
        };

        // Decode per element type, flattening jagged entries as we go.
        let mut values = Vec::new();
        if type_name.starts_with("vector<float") {
            let it = branch
                .as_iter::<Vec<f32>>()
                .map_err(|e| values_err(&e))?;
            for entry in it {
                values.extend(entry.into_iter().map(f64::from));
            }
        } else if type_name.starts_with("vector<double") {
            let it = branch
                .as_iter::<Vec<f64>>()
                .map_err(|e| values_err(&e))?;
            for entry in it {
                values.extend(entry);
            }
        } else if type_name.starts_with("float") {
            let it = branch.as_iter::<f32>().map_err(|e| values_err(&e))?;
            values.extend(it.map(f64::from));
        } else if type_name.starts_with("double") {
            let it = branch.as_iter::<f64>().map_err(|e| values_err(&e))?;
            values.extend(it);
        } else {
            return Err(FieldError::Values {
                field: name.to_string(),
                reason: format!("unsupported element type: {type_name}"),
            });
        }

        Ok(values)
    }
}

/// List the top-level keys of a ROOT file (tree candidates).
pub fn list_containers<P: AsRef<Path>>(path: P) -> Result<Vec<String>, RootError> {
    let path = path.as_ref();
    let file = RootFile::open(path).map_err(|e| RootError::Open {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    Ok(file.keys_name().into_iter().map(|k| k.to_string()).collect())
}
