//! weights.bin: every tensor flattened row-major as little-endian f32.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nbweights_core::errors::ExportError;
use nbweights_core::WeightCollection;

use super::ensure_parent_dir;

/// Write the packed weights and return the number of bytes written.
pub fn pack_weights(weights: &WeightCollection, path: &Path) -> Result<u64, ExportError> {
    if let Some(index) = weights.iter().position(|t| t.shape().is_none()) {
        return Err(ExportError::RaggedTensor { index });
    }

    ensure_parent_dir(path)?;
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    let mut values = Vec::with_capacity(weights.element_count());
    for tensor in weights {
        tensor.flatten_f32(&mut values);
    }
    for value in &values {
        writer.write_all(&value.to_le_bytes()).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;

    let bytes = (values.len() * std::mem::size_of::<f32>()) as u64;
    tracing::info!(path = %path.display(), bytes, "weights packed");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbweights_core::WeightTensor;

    #[test]
    fn packs_little_endian_f32() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("weights.bin");
        let weights = WeightCollection::from(vec![
            WeightTensor::Nested(vec![
                WeightTensor::Nested(vec![WeightTensor::Float(1.5), WeightTensor::Int(-2)]),
            ]),
            WeightTensor::Nested(vec![WeightTensor::Float(0.25)]),
        ]);

        let written = pack_weights(&weights, &path).unwrap();
        assert_eq!(written, 12);

        let bytes = std::fs::read(&path).unwrap();
        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(floats, vec![1.5, -2.0, 0.25]);
    }

    #[test]
    fn ragged_tensor_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.bin");
        let weights = WeightCollection::from(vec![
            WeightTensor::Nested(vec![WeightTensor::Float(1.0)]),
            WeightTensor::Nested(vec![
                WeightTensor::Nested(vec![WeightTensor::Int(1)]),
                WeightTensor::Nested(vec![]),
            ]),
        ]);
        assert!(matches!(
            pack_weights(&weights, &path),
            Err(ExportError::RaggedTensor { index: 1 })
        ));
        assert!(!path.exists());
    }
}
