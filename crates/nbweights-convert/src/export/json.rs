//! weights.json writer and reader.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nbweights_core::errors::ExportError;
use nbweights_core::WeightCollection;

use super::ensure_parent_dir;

/// Write the collection as one JSON document, creating parent directories.
///
/// Not atomic: a failure mid-write leaves a partial file behind.
pub fn write_weights_json(
    weights: &WeightCollection,
    path: &Path,
    pretty: bool,
) -> Result<(), ExportError> {
    ensure_parent_dir(path)?;
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    let written = if pretty {
        serde_json::to_writer_pretty(&mut writer, weights)
    } else {
        serde_json::to_writer(&mut writer, weights)
    };
    written.map_err(|e| ExportError::Serialize {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    writer.flush().map_err(io_err)?;

    tracing::info!(
        path = %path.display(),
        tensors = weights.len(),
        elements = weights.element_count(),
        "weights written"
    );
    Ok(())
}

/// Load a weights.json document back into a collection.
pub fn read_weights_json(path: &Path) -> Result<WeightCollection, ExportError> {
    let file = File::open(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| ExportError::Deserialize {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbweights_core::WeightTensor;

    fn sample() -> WeightCollection {
        WeightCollection::from(vec![
            WeightTensor::Nested(vec![WeightTensor::Float(0.5), WeightTensor::Int(-1)]),
            WeightTensor::Nested(vec![]),
        ])
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("m").join("weights.json");
        write_weights_json(&sample(), &path, false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[[0.5,-1],[]]");

        // Second write into the existing directory is fine.
        write_weights_json(&WeightCollection::new(), &path, false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn pretty_output_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");
        write_weights_json(&sample(), &path, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains('\n'));
        assert_eq!(read_weights_json(&path).unwrap(), sample());
    }

    #[test]
    fn reading_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");
        std::fs::write(&path, r#"{"not": "weights"}"#).unwrap();
        assert!(matches!(
            read_weights_json(&path),
            Err(ExportError::Deserialize { .. })
        ));
        assert!(matches!(
            read_weights_json(&dir.path().join("missing.json")),
            Err(ExportError::Io { .. })
        ));
    }
}
