//! End-to-end conversion: notebook → weight collection → artifacts.
//!
//! Everything that can fail on the input side (reading, JSON shape, literal
//! evaluation, manifest inference) runs before the first file is written.

use std::path::{Path, PathBuf};

use serde::Serialize;

use nbweights_core::config::{ExtractConfig, MatchPolicy};
use nbweights_core::errors::{ConvertError, ExportError};
use nbweights_core::{NbWeightsConfig, Shape, WeightCollection};

use crate::export::{pack_weights, read_weights_json, write_manifest, write_weights_json, ModelManifest};
use crate::literal::evaluate_line;
use crate::notebook::NotebookDocument;
use crate::scanner::{MarkerMatch, MarkerScanner};

pub const MANIFEST_FILE: &str = "model.json";
pub const BIN_FILE: &str = "weights.bin";

/// Result of the extraction step.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub notebook: PathBuf,
    pub content_hash: u64,
    /// `None` when no line matched; `weights` is then empty.
    pub selected: Option<MarkerMatch>,
    pub weights: WeightCollection,
}

/// Summary of a conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub notebook: PathBuf,
    pub notebook_hash: String,
    pub policy: MatchPolicy,
    pub selected: Option<MarkerMatch>,
    pub tensor_count: usize,
    /// `None` entries are ragged tensors.
    pub shapes: Vec<Option<Shape>>,
    pub weights_path: PathBuf,
    pub manifest_path: Option<PathBuf>,
    pub bin_path: Option<PathBuf>,
}

/// Summary of packing an existing weights.json.
#[derive(Debug, Clone, Serialize)]
pub struct PackReport {
    pub weights_path: PathBuf,
    pub manifest_path: PathBuf,
    pub bin_path: PathBuf,
    pub layers: usize,
    pub bytes: u64,
}

/// Locate the weight line in `notebook` and evaluate it.
///
/// No matching line yields an empty collection, not an error.
pub fn extract_weights(notebook: &Path, config: &ExtractConfig) -> Result<Extraction, ConvertError> {
    let document = NotebookDocument::load(notebook)?;
    let scanner = MarkerScanner::new(&config.effective_markers())?;
    let policy = config.effective_policy();

    let selected = scanner.select(&document.notebook, policy);
    let weights = match selected {
        Some(ref found) => {
            let weights = evaluate_line(&found.text).map_err(|source| ConvertError::Literal {
                cell: found.cell,
                line: found.line,
                source,
            })?;
            tracing::info!(
                cell = found.cell,
                line = found.line,
                marker = %found.marker,
                tensors = weights.len(),
                "weight expression evaluated"
            );
            weights
        }
        None => {
            tracing::warn!(
                path = %notebook.display(),
                markers = ?scanner.markers(),
                "no weight marker found; writing an empty collection"
            );
            WeightCollection::new()
        }
    };

    Ok(Extraction {
        notebook: document.path,
        content_hash: document.content_hash,
        selected,
        weights,
    })
}

/// Run the full conversion described by `config`.
pub fn convert(config: &NbWeightsConfig) -> Result<ConversionReport, ConvertError> {
    let notebook = config.notebook_path()?;
    let extraction = extract_weights(notebook, &config.extract)?;

    let output_dir = config.output.effective_dir();
    let manifest = if config.output.effective_manifest() && extraction.weights.is_empty() {
        tracing::warn!("no weights extracted; skipping {MANIFEST_FILE}");
        None
    } else if config.output.effective_manifest() {
        Some(ModelManifest::from_weights(
            &extraction.weights,
            &config.manifest,
            BIN_FILE,
        )?)
    } else {
        None
    };

    if config.output.effective_bin() {
        if let Some(index) = extraction.weights.iter().position(|t| t.shape().is_none()) {
            return Err(ExportError::RaggedTensor { index }.into());
        }
    }

    let weights_path = config.output.weights_path();
    write_weights_json(&extraction.weights, &weights_path, config.output.effective_pretty())?;

    let manifest_path = match manifest {
        Some(ref manifest) => {
            let path = output_dir.join(MANIFEST_FILE);
            write_manifest(manifest, &path)?;
            Some(path)
        }
        None => None,
    };

    let bin_path = if config.output.effective_bin() {
        let path = output_dir.join(BIN_FILE);
        pack_weights(&extraction.weights, &path)?;
        Some(path)
    } else {
        None
    };

    Ok(ConversionReport {
        notebook: extraction.notebook,
        notebook_hash: format!("{:016x}", extraction.content_hash),
        policy: config.extract.effective_policy(),
        selected: extraction.selected,
        tensor_count: extraction.weights.len(),
        shapes: extraction.weights.shapes(),
        weights_path,
        manifest_path,
        bin_path,
    })
}

/// Derive model.json and weights.bin from the weights.json already in the
/// output directory.
pub fn pack_existing(config: &NbWeightsConfig) -> Result<PackReport, ConvertError> {
    let output_dir = config.output.effective_dir();
    let weights_path = config.output.weights_path();
    let weights = read_weights_json(&weights_path)?;

    let manifest = ModelManifest::from_weights(&weights, &config.manifest, BIN_FILE)?;
    let manifest_path = output_dir.join(MANIFEST_FILE);
    let bin_path = output_dir.join(BIN_FILE);
    write_manifest(&manifest, &manifest_path)?;
    let bytes = pack_weights(&weights, &bin_path)?;

    Ok(PackReport {
        weights_path,
        manifest_path,
        bin_path,
        layers: manifest.layer_count(),
        bytes,
    })
}
