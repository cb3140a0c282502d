//! Nested numeric tensors.
//!
//! A `WeightTensor` mirrors what `tolist()` produces: integers and floats at
//! the leaves, nested sequences above them. It may be ragged when it came
//! from a plain list literal.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Tensor dimensions, outermost first. Scalars have an empty shape.
pub type Shape = SmallVec<[usize; 4]>;

/// One weight tensor. Serializes as a JSON number or nested JSON arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightTensor {
    Int(i64),
    Float(f64),
    Nested(Vec<WeightTensor>),
}

impl WeightTensor {
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Nested(_))
    }

    /// Scalar value widened to `f64`, or `None` for nested tensors.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Nested(_) => None,
        }
    }

    /// Returns the shape if the tensor is rectangular, `None` if ragged.
    pub fn shape(&self) -> Option<Shape> {
        match self {
            Self::Int(_) | Self::Float(_) => Some(Shape::new()),
            Self::Nested(items) => {
                let mut iter = items.iter();
                let inner = match iter.next() {
                    Some(first) => first.shape()?,
                    None => Shape::new(),
                };
                for item in iter {
                    if item.shape()? != inner {
                        return None;
                    }
                }
                let mut shape = Shape::with_capacity(inner.len() + 1);
                shape.push(items.len());
                shape.extend(inner);
                Some(shape)
            }
        }
    }

    /// Number of scalar leaves, ragged or not.
    pub fn element_count(&self) -> usize {
        match self {
            Self::Int(_) | Self::Float(_) => 1,
            Self::Nested(items) => items.iter().map(Self::element_count).sum(),
        }
    }

    /// Leaves in row-major order, narrowed to `f32`.
    pub fn flatten_f32(&self, out: &mut Vec<f32>) {
        match self {
            Self::Int(v) => out.push(*v as f32),
            Self::Float(v) => out.push(*v as f32),
            Self::Nested(items) => items.iter().for_each(|t| t.flatten_f32(out)),
        }
    }

    /// Numeric equality with ints and floats compared as `f64`.
    pub fn numerically_eq(&self, other: &WeightTensor) -> bool {
        match (self, other) {
            (Self::Nested(a), Self::Nested(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.numerically_eq(y))
            }
            (Self::Nested(_), _) | (_, Self::Nested(_)) => false,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl From<Vec<WeightTensor>> for WeightTensor {
    fn from(items: Vec<WeightTensor>) -> Self {
        Self::Nested(items)
    }
}

/// Ordered weight tensors, one per layer parameter group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightCollection(pub Vec<WeightTensor>);

impl WeightCollection {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeightTensor> {
        self.0.iter()
    }

    pub fn push(&mut self, tensor: WeightTensor) {
        self.0.push(tensor);
    }

    /// Shapes of every tensor, `None` entries for ragged ones.
    pub fn shapes(&self) -> Vec<Option<Shape>> {
        self.0.iter().map(WeightTensor::shape).collect()
    }

    /// Total scalar count across all tensors.
    pub fn element_count(&self) -> usize {
        self.0.iter().map(WeightTensor::element_count).sum()
    }

    pub fn numerically_eq(&self, other: &WeightCollection) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a.numerically_eq(b))
    }
}

impl From<Vec<WeightTensor>> for WeightCollection {
    fn from(tensors: Vec<WeightTensor>) -> Self {
        Self(tensors)
    }
}

impl<'a> IntoIterator for &'a WeightCollection {
    type Item = &'a WeightTensor;
    type IntoIter = std::slice::Iter<'a, WeightTensor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
