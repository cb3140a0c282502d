//! Weight artifacts: weights.json, model.json, weights.bin.

pub mod json;
pub mod manifest;
pub mod pack;

use std::path::Path;

use nbweights_core::errors::ExportError;

pub use json::{read_weights_json, write_weights_json};
pub use manifest::{write_manifest, ModelManifest};
pub use pack::pack_weights;

/// Create the parent directory of `path`; a no-op when it already exists.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| ExportError::Io {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
