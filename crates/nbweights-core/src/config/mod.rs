//! Configuration system for nbweights.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod extract_config;
pub mod manifest_config;
pub mod nbweights_config;
pub mod output_config;

pub use extract_config::{ExtractConfig, MatchPolicy, DEFAULT_MARKERS};
pub use manifest_config::ManifestConfig;
pub use nbweights_config::{CliOverrides, NbWeightsConfig};
pub use output_config::OutputConfig;
