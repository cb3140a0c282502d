//! Extraction configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Substrings that mark a line as producing the model's weights.
pub const DEFAULT_MARKERS: [&str; 2] = ["model.get_weights()", "model.weights"];

/// Which matching line wins when a notebook has several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// First matching line in document order; scanning stops there.
    #[default]
    First,
    /// First matching line of each code cell, later cells overriding earlier ones.
    LastCell,
}

impl MatchPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::LastCell => "last-cell",
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::First),
            "last-cell" => Ok(Self::LastCell),
            other => Err(format!("unknown match policy `{other}` (expected first or last-cell)")),
        }
    }
}

/// Configuration for locating the weight expression.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExtractConfig {
    /// Notebook to read. No default; must come from CLI, env, or a config file.
    pub notebook: Option<PathBuf>,
    /// Marker substrings. Default: `DEFAULT_MARKERS`.
    #[serde(default)]
    pub markers: Vec<String>,
    /// Match policy. Default: first.
    pub policy: Option<MatchPolicy>,
}

impl ExtractConfig {
    /// Returns the effective markers, defaulting to `DEFAULT_MARKERS`.
    pub fn effective_markers(&self) -> Vec<String> {
        if self.markers.is_empty() {
            DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect()
        } else {
            self.markers.clone()
        }
    }

    pub fn effective_policy(&self) -> MatchPolicy {
        self.policy.unwrap_or_default()
    }
}
