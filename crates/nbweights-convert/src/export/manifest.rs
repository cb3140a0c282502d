//! TensorFlow.js `layers-model` manifest (model.json).
//!
//! The topology is inferred from the collection: a Sequential stack of Dense
//! layers, one per (kernel `[in, out]`, bias `[out]`) pair.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use nbweights_core::config::ManifestConfig;
use nbweights_core::errors::{ExportError, ManifestError};
use nbweights_core::{Shape, WeightCollection, WeightTensor};

use super::ensure_parent_dir;

const GENERATED_BY: &str = "keras v2.15.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelManifest {
    pub format: String,
    pub generated_by: String,
    pub converted_by: String,
    pub model_topology: ModelTopology,
    pub weights_manifest: Vec<WeightsGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTopology {
    pub class_name: String,
    pub config: SequentialConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequentialConfig {
    pub name: String,
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub class_name: String,
    pub config: DenseConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseConfig {
    pub name: String,
    pub trainable: bool,
    pub units: usize,
    pub activation: String,
    pub use_bias: bool,
    pub kernel_initializer: Initializer,
    pub bias_initializer: Initializer,
    pub kernel_regularizer: Option<Value>,
    pub bias_regularizer: Option<Value>,
    pub activity_regularizer: Option<Value>,
    pub kernel_constraint: Option<Value>,
    pub bias_constraint: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Initializer {
    pub class_name: String,
    pub config: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightsGroup {
    pub paths: Vec<String>,
    pub weights: Vec<WeightSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSpec {
    pub name: String,
    pub shape: Vec<usize>,
    pub dtype: String,
}

impl DenseConfig {
    fn new(name: String, units: usize, activation: String) -> Self {
        Self {
            name,
            trainable: true,
            units,
            activation,
            use_bias: true,
            kernel_initializer: Initializer {
                class_name: "GlorotUniform".to_string(),
                config: json!({ "seed": null }),
            },
            bias_initializer: Initializer {
                class_name: "Zeros".to_string(),
                config: json!({}),
            },
            kernel_regularizer: None,
            bias_regularizer: None,
            activity_regularizer: None,
            kernel_constraint: None,
            bias_constraint: None,
        }
    }
}

impl ModelManifest {
    /// Infer a Dense stack from kernel/bias pairs. `bin_file` is the weights
    /// path recorded in the manifest.
    pub fn from_weights(
        weights: &WeightCollection,
        config: &ManifestConfig,
        bin_file: &str,
    ) -> Result<Self, ManifestError> {
        if weights.is_empty() {
            return Err(ManifestError::NoLayers);
        }
        if weights.len() % 2 != 0 {
            return Err(ManifestError::OddTensorCount {
                count: weights.len(),
            });
        }

        let layer_count = weights.len() / 2;
        let mut layers = Vec::with_capacity(layer_count);
        let mut specs = Vec::with_capacity(weights.len());
        let mut previous_units: Option<usize> = None;

        for (layer, pair) in weights.0.chunks(2).enumerate() {
            let prefix = format!("dense_{}", layer + 1);
            let kernel_name = format!("{prefix}/kernel");
            let bias_name = format!("{prefix}/bias");

            let kernel = shape_of(&pair[0], layer * 2, &kernel_name, 2)?;
            let bias = shape_of(&pair[1], layer * 2 + 1, &bias_name, 1)?;

            if let Some(units) = previous_units {
                if kernel[0] != units {
                    return Err(ManifestError::ShapeMismatch {
                        name: kernel_name,
                        expected: format!("[{units}, _]"),
                        actual: kernel.to_vec(),
                    });
                }
            }
            let units = kernel[1];
            if bias[0] != units {
                return Err(ManifestError::ShapeMismatch {
                    name: bias_name,
                    expected: format!("[{units}]"),
                    actual: bias.to_vec(),
                });
            }
            previous_units = Some(units);

            let activation = if layer + 1 == layer_count {
                config.effective_output_activation()
            } else {
                config.effective_hidden_activation()
            };
            layers.push(Layer {
                class_name: "Dense".to_string(),
                config: DenseConfig::new(prefix, units, activation),
            });
            specs.push(WeightSpec {
                name: kernel_name,
                shape: kernel.to_vec(),
                dtype: "float32".to_string(),
            });
            specs.push(WeightSpec {
                name: bias_name,
                shape: bias.to_vec(),
                dtype: "float32".to_string(),
            });
        }

        Ok(Self {
            format: "layers-model".to_string(),
            generated_by: GENERATED_BY.to_string(),
            converted_by: format!("nbweights {}", env!("CARGO_PKG_VERSION")),
            model_topology: ModelTopology {
                class_name: "Sequential".to_string(),
                config: SequentialConfig {
                    name: config.effective_model_name(),
                    layers,
                },
            },
            weights_manifest: vec![WeightsGroup {
                paths: vec![bin_file.to_string()],
                weights: specs,
            }],
        })
    }

    pub fn layer_count(&self) -> usize {
        self.model_topology.config.layers.len()
    }
}

fn shape_of(
    tensor: &WeightTensor,
    index: usize,
    name: &str,
    rank: usize,
) -> Result<Shape, ManifestError> {
    let shape = tensor
        .shape()
        .ok_or(ManifestError::RaggedTensor { index })?;
    if shape.len() != rank {
        return Err(ManifestError::WrongRank {
            name: name.to_string(),
            expected: rank,
            actual: shape.len(),
        });
    }
    Ok(shape)
}

/// Write the manifest as 2-space indented JSON, creating parent directories.
pub fn write_manifest(manifest: &ModelManifest, path: &Path) -> Result<(), ExportError> {
    ensure_parent_dir(path)?;
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut writer, manifest).map_err(|e| ExportError::Serialize {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    writer.flush().map_err(io_err)?;
    tracing::info!(path = %path.display(), layers = manifest.layer_count(), "model manifest written");
    Ok(())
}
