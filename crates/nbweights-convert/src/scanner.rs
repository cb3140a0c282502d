//! Marker scanner: finds code cell lines that produce the model's weights.
//!
//! Multi-pattern substring search via Aho-Corasick, one automaton per run.

use aho_corasick::AhoCorasick;
use serde::Serialize;

use nbweights_core::config::MatchPolicy;
use nbweights_core::errors::ConfigError;

use crate::notebook::Notebook;

/// A line containing a weight marker. Indices are 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerMatch {
    /// Index among all cells (markdown included).
    pub cell: usize,
    /// Index among the cell's source lines.
    pub line: usize,
    pub marker: String,
    /// The raw line, trailing newline included.
    pub text: String,
}

pub struct MarkerScanner {
    automaton: AhoCorasick,
    markers: Vec<String>,
}

impl MarkerScanner {
    pub fn new(markers: &[String]) -> Result<Self, ConfigError> {
        let automaton = AhoCorasick::new(markers).map_err(|e| ConfigError::ValidationFailed {
            field: "extract.markers".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            automaton,
            markers: markers.to_vec(),
        })
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// The leftmost marker occurring in `line`, if any.
    pub fn find_marker(&self, line: &str) -> Option<&str> {
        self.automaton
            .find(line)
            .map(|m| self.markers[m.pattern().as_usize()].as_str())
    }

    /// Every matching line of every code cell, in document order.
    pub fn scan_all(&self, notebook: &Notebook) -> Vec<MarkerMatch> {
        self.matches(notebook).collect()
    }

    /// The line whose value becomes the weight collection under `policy`.
    pub fn select(&self, notebook: &Notebook, policy: MatchPolicy) -> Option<MarkerMatch> {
        match policy {
            MatchPolicy::First => self.matches(notebook).next(),
            MatchPolicy::LastCell => {
                let mut selected: Option<MarkerMatch> = None;
                for found in self.matches(notebook) {
                    if selected.as_ref().is_some_and(|s| s.cell == found.cell) {
                        continue;
                    }
                    tracing::debug!(cell = found.cell, line = found.line, "later cell overrides match");
                    selected = Some(found);
                }
                selected
            }
        }
    }

    fn matches<'a>(&'a self, notebook: &'a Notebook) -> impl Iterator<Item = MarkerMatch> + 'a {
        notebook.code_cells().flat_map(move |(cell_index, cell)| {
            cell.source
                .lines()
                .into_iter()
                .enumerate()
                .filter_map(move |(line_index, line)| {
                    self.find_marker(line).map(|marker| {
                        tracing::debug!(cell = cell_index, line = line_index, marker, "marker found");
                        MarkerMatch {
                            cell: cell_index,
                            line: line_index,
                            marker: marker.to_string(),
                            text: line.to_string(),
                        }
                    })
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::NotebookDocument;
    use nbweights_core::config::DEFAULT_MARKERS;
    use std::path::Path;

    fn scanner() -> MarkerScanner {
        let markers: Vec<String> = DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect();
        MarkerScanner::new(&markers).unwrap()
    }

    fn notebook(json: &str) -> Notebook {
        NotebookDocument::from_slice(Path::new("t.ipynb"), json.as_bytes())
            .unwrap()
            .notebook
    }

    const TWO_CELLS: &str = r#"{"cells": [
        {"cell_type": "markdown", "source": ["model.get_weights() in prose\n"]},
        {"cell_type": "code", "source": ["x = 1\n", "[1] # model.weights\n", "[2] # model.weights\n"]},
        {"cell_type": "code", "source": ["[3] # model.get_weights()\n"]}
    ]}"#;

    #[test]
    fn finds_leftmost_marker() {
        let s = scanner();
        assert_eq!(s.find_marker("a = model.get_weights()"), Some("model.get_weights()"));
        assert_eq!(s.find_marker("print(model.weights)"), Some("model.weights"));
        assert_eq!(s.find_marker("model.summary()"), None);
    }

    #[test]
    fn markdown_cells_are_skipped() {
        let matches = scanner().scan_all(&notebook(TWO_CELLS));
        let positions: Vec<(usize, usize)> = matches.iter().map(|m| (m.cell, m.line)).collect();
        assert_eq!(positions, vec![(1, 1), (1, 2), (2, 0)]);
    }

    #[test]
    fn first_policy_stops_at_first_match() {
        let selected = scanner().select(&notebook(TWO_CELLS), MatchPolicy::First).unwrap();
        assert_eq!((selected.cell, selected.line), (1, 1));
        assert_eq!(selected.text, "[1] # model.weights\n");
        assert_eq!(selected.marker, "model.weights");
    }

    #[test]
    fn last_cell_policy_takes_first_line_of_last_matching_cell() {
        let nb = notebook(
            r#"{"cells": [
                {"cell_type": "code", "source": ["[3] # model.get_weights()\n"]},
                {"cell_type": "code", "source": ["[1] # model.weights\n", "[2] # model.weights\n"]}
            ]}"#,
        );
        let selected = scanner().select(&nb, MatchPolicy::LastCell).unwrap();
        assert_eq!((selected.cell, selected.line), (1, 0));
    }

    #[test]
    fn no_match_selects_nothing() {
        let nb = notebook(r#"{"cells": [{"cell_type": "code", "source": "x = 1"}]}"#);
        assert!(scanner().select(&nb, MatchPolicy::First).is_none());
        assert!(scanner().select(&nb, MatchPolicy::LastCell).is_none());
    }

    #[test]
    fn custom_markers() {
        let s = MarkerScanner::new(&["net.params".to_string()]).unwrap();
        assert_eq!(s.markers(), ["net.params".to_string()]);
        assert!(s.find_marker("model.get_weights()").is_none());
        assert_eq!(s.find_marker("[1] # net.params"), Some("net.params"));
    }
}
