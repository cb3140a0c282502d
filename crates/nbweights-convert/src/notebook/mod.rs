//! Notebook documents (nbformat 4 JSON).
//!
//! Only the fields the scanner needs are modelled; everything else in the
//! document is ignored. `cells`, `cell_type` and `source` are required.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use xxhash_rust::xxh3::xxh3_64;

use nbweights_core::errors::NotebookError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Code,
    Markdown,
    Raw,
    #[serde(other)]
    Other,
}

/// Cell source: nbformat allows a list of lines or a single string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Lines(Vec<String>),
    Text(String),
}

impl Source {
    /// Source lines in order, each keeping its trailing newline.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Lines(lines) => lines.iter().map(String::as_str).collect(),
            Self::Text(text) => text.split_inclusive('\n').collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,
    pub source: Source,
}

impl Cell {
    pub fn is_code(&self) -> bool {
        self.cell_type == CellType::Code
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub nbformat: Option<u32>,
    #[serde(default)]
    pub nbformat_minor: Option<u32>,
}

impl Notebook {
    /// Code cells with their index among all cells.
    pub fn code_cells(&self) -> impl Iterator<Item = (usize, &Cell)> {
        self.cells.iter().enumerate().filter(|(_, cell)| cell.is_code())
    }
}

/// A loaded notebook together with where it came from.
#[derive(Debug, Clone)]
pub struct NotebookDocument {
    pub path: PathBuf,
    pub notebook: Notebook,
    /// xxh3-64 of the raw file bytes.
    pub content_hash: u64,
}

impl NotebookDocument {
    /// Read and parse a notebook file.
    pub fn load(path: &Path) -> Result<Self, NotebookError> {
        let bytes = std::fs::read(path).map_err(|source| NotebookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Self::from_slice(path, &bytes)?;
        tracing::info!(
            path = %path.display(),
            cells = document.notebook.cells.len(),
            hash = %format!("{:016x}", document.content_hash),
            "notebook loaded"
        );
        Ok(document)
    }

    /// Parse notebook bytes; `path` is only used for reporting.
    pub fn from_slice(path: &Path, bytes: &[u8]) -> Result<Self, NotebookError> {
        let notebook: Notebook =
            serde_json::from_slice(bytes).map_err(|e| NotebookError::Malformed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            notebook,
            content_hash: xxh3_64(bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<NotebookDocument, NotebookError> {
        NotebookDocument::from_slice(Path::new("test.ipynb"), json.as_bytes())
    }

    #[test]
    fn list_and_string_sources() {
        let doc = parse(
            r##"{
                "cells": [
                    {"cell_type": "markdown", "metadata": {}, "source": ["# Title\n", "text"]},
                    {"cell_type": "code", "execution_count": 1, "outputs": [],
                     "source": "import numpy as np\nw = 1\n"}
                ],
                "metadata": {},
                "nbformat": 4,
                "nbformat_minor": 5
            }"##,
        )
        .unwrap();

        assert_eq!(doc.notebook.nbformat, Some(4));
        assert_eq!(doc.notebook.cells[0].cell_type, CellType::Markdown);
        assert_eq!(doc.notebook.cells[0].source.lines(), vec!["# Title\n", "text"]);
        assert_eq!(
            doc.notebook.cells[1].source.lines(),
            vec!["import numpy as np\n", "w = 1\n"]
        );

        let code: Vec<usize> = doc.notebook.code_cells().map(|(i, _)| i).collect();
        assert_eq!(code, vec![1]);
    }

    #[test]
    fn unknown_cell_types_are_not_code() {
        let doc = parse(r#"{"cells": [{"cell_type": "heading", "source": []}]}"#).unwrap();
        assert_eq!(doc.notebook.cells[0].cell_type, CellType::Other);
        assert_eq!(doc.notebook.code_cells().count(), 0);
    }

    #[test]
    fn missing_keys_are_malformed() {
        for json in [
            r#"{"worksheets": []}"#,
            r#"{"cells": [{"source": []}]}"#,
            r#"{"cells": [{"cell_type": "code"}]}"#,
            "not json at all",
        ] {
            assert!(
                matches!(parse(json), Err(NotebookError::Malformed { .. })),
                "{json} should be malformed"
            );
        }
    }

    #[test]
    fn hash_tracks_content() {
        let a = parse(r#"{"cells": []}"#).unwrap();
        let b = parse(r#"{"cells": [] }"#).unwrap();
        assert_ne!(a.content_hash, b.content_hash);
        assert_eq!(a.content_hash, parse(r#"{"cells": []}"#).unwrap().content_hash);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = NotebookDocument::load(&dir.path().join("absent.ipynb")).unwrap_err();
        assert!(matches!(err, NotebookError::Io { .. }));
    }
}
