//! nbweights-convert: turns a notebook's weight expression into weight artifacts.
//!
//! - Notebook: nbformat document loading and content hashing
//! - Scanner: marker search over code cell lines
//! - Literal: narrow literal-array grammar standing in for expression evaluation
//! - Export: weights.json, model.json manifest, weights.bin
//! - Pipeline: the end-to-end conversion and its report

pub mod export;
pub mod literal;
pub mod notebook;
pub mod pipeline;
pub mod scanner;

pub use notebook::{Cell, CellType, Notebook, NotebookDocument};
pub use pipeline::{convert, extract_weights, pack_existing, ConversionReport, Extraction, PackReport};
pub use scanner::{MarkerMatch, MarkerScanner};
