//! Output configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the written artifacts.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory. Default: `../models/transaction_model`.
    pub dir: Option<PathBuf>,
    /// Weights file name inside `dir`. Default: `weights.json`.
    pub weights_file: Option<String>,
    /// Pretty-print weights.json. Default: false.
    pub pretty: Option<bool>,
    /// Also write model.json. Default: false.
    pub manifest: Option<bool>,
    /// Also write weights.bin. Default: false.
    pub bin: Option<bool>,
}

impl OutputConfig {
    pub fn effective_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("../models/transaction_model"))
    }

    pub fn effective_weights_file(&self) -> String {
        self.weights_file
            .clone()
            .unwrap_or_else(|| "weights.json".to_string())
    }

    /// Full path of the weights JSON file.
    pub fn weights_path(&self) -> PathBuf {
        self.effective_dir().join(self.effective_weights_file())
    }

    pub fn effective_pretty(&self) -> bool {
        self.pretty.unwrap_or(false)
    }

    pub fn effective_manifest(&self) -> bool {
        self.manifest.unwrap_or(false)
    }

    pub fn effective_bin(&self) -> bool {
        self.bin.unwrap_or(false)
    }
}
