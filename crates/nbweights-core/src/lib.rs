//! nbweights-core: shared types, errors, configuration, and tracing for the
//! notebook weight converter.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::NbWeightsConfig;
pub use errors::{ConvertError, NbErrorCode};
pub use types::{Shape, WeightCollection, WeightTensor};
