//! Top-level nbweights configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ExtractConfig, ManifestConfig, MatchPolicy, OutputConfig};
use crate::errors::ConfigError;

/// Project config file name looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "nbweights.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`NBWEIGHTS_*`)
/// 3. Project config (`nbweights.toml` in the working directory, or `--config`)
/// 4. User config (`~/.nbweights/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NbWeightsConfig {
    pub extract: ExtractConfig,
    pub output: OutputConfig,
    pub manifest: ManifestConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub notebook: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub markers: Vec<String>,
    pub policy: Option<MatchPolicy>,
    pub pretty: Option<bool>,
    pub manifest: Option<bool>,
    pub bin: Option<bool>,
}

impl NbWeightsConfig {
    /// Load configuration with layered resolution.
    ///
    /// `config_file` replaces the project lookup in `root`; unlike the
    /// implicit project file it must exist.
    pub fn load(
        root: &Path,
        config_file: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(path = %user_config_path.display(), error = %e, "ignoring user config");
                    }
                }
            }
        }

        // Layer 3: project config
        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::merge_toml_file(&mut config, path)?;
            }
            None => {
                let project_config_path = root.join(PROJECT_CONFIG_FILE);
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        tracing::debug!(
            notebook = ?config.extract.notebook,
            policy = %config.extract.effective_policy(),
            output = %config.output.weights_path().display(),
            "configuration resolved"
        );
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &NbWeightsConfig) -> Result<(), ConfigError> {
        if config.extract.markers.iter().any(|m| m.is_empty()) {
            return Err(ConfigError::ValidationFailed {
                field: "extract.markers".to_string(),
                message: "markers must be non-empty strings".to_string(),
            });
        }
        if let Some(ref name) = config.output.weights_file {
            if name.is_empty() || name.contains(['/', '\\']) {
                return Err(ConfigError::ValidationFailed {
                    field: "output.weights_file".to_string(),
                    message: "must be a bare file name".to_string(),
                });
            }
        }
        for (field, value) in [
            ("manifest.model_name", &config.manifest.model_name),
            ("manifest.hidden_activation", &config.manifest.hidden_activation),
            ("manifest.output_activation", &config.manifest.output_activation),
        ] {
            if value.as_deref() == Some("") {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the notebook path, or `MissingValue` when no layer set one.
    pub fn notebook_path(&self) -> Result<&Path, ConfigError> {
        self.extract
            .notebook
            .as_deref()
            .ok_or_else(|| ConfigError::MissingValue {
                field: "extract.notebook".to_string(),
            })
    }

    /// Returns the user config path: `~/.nbweights/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".nbweights").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut NbWeightsConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: NbWeightsConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut NbWeightsConfig, other: &NbWeightsConfig) {
        // Extract
        if other.extract.notebook.is_some() {
            base.extract.notebook = other.extract.notebook.clone();
        }
        if !other.extract.markers.is_empty() {
            base.extract.markers = other.extract.markers.clone();
        }
        if other.extract.policy.is_some() {
            base.extract.policy = other.extract.policy;
        }

        // Output
        if other.output.dir.is_some() {
            base.output.dir = other.output.dir.clone();
        }
        if other.output.weights_file.is_some() {
            base.output.weights_file = other.output.weights_file.clone();
        }
        if other.output.pretty.is_some() {
            base.output.pretty = other.output.pretty;
        }
        if other.output.manifest.is_some() {
            base.output.manifest = other.output.manifest;
        }
        if other.output.bin.is_some() {
            base.output.bin = other.output.bin;
        }

        // Manifest
        if other.manifest.model_name.is_some() {
            base.manifest.model_name = other.manifest.model_name.clone();
        }
        if other.manifest.hidden_activation.is_some() {
            base.manifest.hidden_activation = other.manifest.hidden_activation.clone();
        }
        if other.manifest.output_activation.is_some() {
            base.manifest.output_activation = other.manifest.output_activation.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Unparseable values are ignored.
    fn apply_env_overrides(config: &mut NbWeightsConfig) {
        if let Some(val) = std::env::var_os("NBWEIGHTS_NOTEBOOK") {
            config.extract.notebook = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("NBWEIGHTS_MARKERS") {
            let markers: Vec<String> = val
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from)
                .collect();
            if !markers.is_empty() {
                config.extract.markers = markers;
            }
        }
        if let Ok(val) = std::env::var("NBWEIGHTS_POLICY") {
            if let Ok(v) = val.parse::<MatchPolicy>() {
                config.extract.policy = Some(v);
            }
        }
        if let Some(val) = std::env::var_os("NBWEIGHTS_OUTPUT_DIR") {
            config.output.dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("NBWEIGHTS_PRETTY") {
            if let Ok(v) = val.parse::<bool>() {
                config.output.pretty = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut NbWeightsConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.notebook {
            config.extract.notebook = Some(v.clone());
        }
        if let Some(ref v) = cli.output_dir {
            config.output.dir = Some(v.clone());
        }
        if !cli.markers.is_empty() {
            config.extract.markers = cli.markers.clone();
        }
        if let Some(v) = cli.policy {
            config.extract.policy = Some(v);
        }
        if let Some(v) = cli.pretty {
            config.output.pretty = Some(v);
        }
        if let Some(v) = cli.manifest {
            config.output.manifest = Some(v);
        }
        if let Some(v) = cli.bin {
            config.output.bin = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
