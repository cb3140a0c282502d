//! Model manifest configuration.

use serde::{Deserialize, Serialize};

/// Naming and activations for the generated layers-model manifest.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ManifestConfig {
    /// Sequential model name. Default: `sequential_1`.
    pub model_name: Option<String>,
    /// Activation of every layer but the last. Default: `relu`.
    pub hidden_activation: Option<String>,
    /// Activation of the last layer. Default: `sigmoid`.
    pub output_activation: Option<String>,
}

impl ManifestConfig {
    pub fn effective_model_name(&self) -> String {
        self.model_name
            .clone()
            .unwrap_or_else(|| "sequential_1".to_string())
    }

    pub fn effective_hidden_activation(&self) -> String {
        self.hidden_activation
            .clone()
            .unwrap_or_else(|| "relu".to_string())
    }

    pub fn effective_output_activation(&self) -> String {
        self.output_activation
            .clone()
            .unwrap_or_else(|| "sigmoid".to_string())
    }
}
