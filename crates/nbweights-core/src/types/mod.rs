//! Weight data model: nested numeric tensors and the ordered collection.

pub mod tensor;

pub use tensor::{Shape, WeightCollection, WeightTensor};
