//! Evaluation of literal expressions into weight tensors.
//!
//! Arrays follow numpy's construction rules: they must be rectangular, mixed
//! int/float content is promoted to float, and a `dtype` casts every element
//! (`float32` values are rounded through `f32`, ints truncate toward zero).

use nbweights_core::errors::LiteralError;
use nbweights_core::{WeightCollection, WeightTensor};

use super::ast::{Constructor, DType, Expr, Number};

/// Runtime value of an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Array(WeightTensor),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Array(_) => "numpy.ndarray",
        }
    }

    /// The nested-number form `tolist()` would produce.
    pub fn into_tensor(self) -> WeightTensor {
        match self {
            Self::Int(v) => WeightTensor::Int(v),
            Self::Float(v) => WeightTensor::Float(v),
            Self::List(items) | Self::Tuple(items) => {
                WeightTensor::Nested(items.into_iter().map(Self::into_tensor).collect())
            }
            Self::Array(tensor) => tensor,
        }
    }

    /// Iterate the value the way `for w in value` would.
    pub fn into_collection(self) -> Result<WeightCollection, LiteralError> {
        match self {
            Self::List(items) | Self::Tuple(items) => Ok(items
                .into_iter()
                .map(Self::into_tensor)
                .collect::<Vec<_>>()
                .into()),
            Self::Array(WeightTensor::Nested(rows)) => Ok(rows.into()),
            Self::Array(_) => Err(LiteralError::NotIterable { kind: "0-d array" }),
            other => Err(LiteralError::NotIterable { kind: other.kind() }),
        }
    }
}

/// Evaluate an expression tree.
pub fn evaluate(expr: &Expr) -> Result<Value, LiteralError> {
    match expr {
        Expr::Number(Number::Int(v)) => Ok(Value::Int(*v)),
        Expr::Number(Number::Float(v)) => Ok(Value::Float(*v)),
        Expr::List(items) => items.iter().map(evaluate).collect::<Result<_, _>>().map(Value::List),
        Expr::Tuple(items) => items.iter().map(evaluate).collect::<Result<_, _>>().map(Value::Tuple),
        Expr::Unary { op, operand, column } => {
            let value = evaluate(operand)?;
            if *op == '+' {
                return match value {
                    Value::List(_) | Value::Tuple(_) => Err(bad_operand(*op, &value, *column)),
                    other => Ok(other),
                };
            }
            negate(value, *column)
        }
        Expr::Call {
            name,
            constructor,
            arg,
            dtype,
            column,
        } => {
            let value = evaluate(arg)?;
            match constructor {
                Constructor::Array => build_array(value, *dtype, *column).map(Value::Array),
                Constructor::Scalar(target) => match value {
                    Value::Int(_) | Value::Float(_) => {
                        cast_scalar(value.into_tensor(), *target, *column).map(|t| match t {
                            WeightTensor::Int(v) => Value::Int(v),
                            WeightTensor::Float(v) => Value::Float(v),
                            nested => Value::Array(nested),
                        })
                    }
                    other => Err(LiteralError::BadArguments {
                        callee: name.clone(),
                        message: format!("argument must be a number, not '{}'", other.kind()),
                        column: *column,
                    }),
                },
            }
        }
    }
}

fn bad_operand(op: char, value: &Value, column: usize) -> LiteralError {
    LiteralError::BadOperand {
        op,
        kind: value.kind(),
        column,
    }
}

fn negate(value: Value, column: usize) -> Result<Value, LiteralError> {
    match value {
        Value::Int(v) => v.checked_neg().map(Value::Int).ok_or(LiteralError::NumberOutOfRange {
            text: format!("-({v})"),
            column,
        }),
        Value::Float(v) => Ok(Value::Float(-v)),
        Value::Array(tensor) => negate_tensor(tensor, column).map(Value::Array),
        other => Err(bad_operand('-', &other, column)),
    }
}

fn negate_tensor(tensor: WeightTensor, column: usize) -> Result<WeightTensor, LiteralError> {
    match tensor {
        WeightTensor::Int(v) => v.checked_neg().map(WeightTensor::Int).ok_or(
            LiteralError::NumberOutOfRange {
                text: format!("-({v})"),
                column,
            },
        ),
        WeightTensor::Float(v) => Ok(WeightTensor::Float(-v)),
        WeightTensor::Nested(items) => items
            .into_iter()
            .map(|t| negate_tensor(t, column))
            .collect::<Result<Vec<_>, _>>()
            .map(WeightTensor::Nested),
    }
}

fn build_array(value: Value, dtype: Option<DType>, column: usize) -> Result<WeightTensor, LiteralError> {
    let tensor = value.into_tensor();
    if tensor.shape().is_none() {
        return Err(LiteralError::RaggedArray { column });
    }
    match dtype {
        Some(target) => cast_scalar(tensor, target, column),
        None if contains_float(&tensor) => cast_scalar(tensor, DType::Float { bits: 64 }, column),
        None => Ok(tensor),
    }
}

fn contains_float(tensor: &WeightTensor) -> bool {
    match tensor {
        WeightTensor::Float(_) => true,
        WeightTensor::Int(_) => false,
        WeightTensor::Nested(items) => items.iter().any(contains_float),
    }
}

/// Cast every leaf of `tensor` to `target`.
fn cast_scalar(tensor: WeightTensor, target: DType, column: usize) -> Result<WeightTensor, LiteralError> {
    match tensor {
        WeightTensor::Nested(items) => items
            .into_iter()
            .map(|t| cast_scalar(t, target, column))
            .collect::<Result<Vec<_>, _>>()
            .map(WeightTensor::Nested),
        leaf => {
            let value = leaf.as_f64().unwrap_or_default();
            match target {
                DType::Float { bits: 64 } => Ok(WeightTensor::Float(value)),
                DType::Float { .. } => {
                    let narrowed = value as f32;
                    if narrowed.is_finite() {
                        Ok(WeightTensor::Float(f64::from(narrowed)))
                    } else {
                        Err(LiteralError::NumberOutOfRange {
                            text: value.to_string(),
                            column,
                        })
                    }
                }
                DType::Int { .. } => {
                    let (min, max) = target.int_range().unwrap_or((i64::MIN, i64::MAX));
                    let truncated = match leaf {
                        WeightTensor::Int(v) => Some(v),
                        _ if value.trunc() >= min as f64 && value.trunc() <= max as f64 => {
                            Some(value.trunc() as i64)
                        }
                        _ => None,
                    };
                    truncated
                        .filter(|v| (min..=max).contains(v))
                        .map(WeightTensor::Int)
                        .ok_or(LiteralError::NumberOutOfRange {
                            text: value.to_string(),
                            column,
                        })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parser::parse_expression;
    use super::*;

    fn eval(text: &str) -> Result<Value, LiteralError> {
        evaluate(&parse_expression(text)?)
    }

    fn tensor(text: &str) -> WeightTensor {
        eval(text).unwrap().into_tensor()
    }

    #[test]
    fn plain_lists_keep_element_types() {
        assert_eq!(
            tensor("[1, 2.5, [3]]"),
            WeightTensor::Nested(vec![
                WeightTensor::Int(1),
                WeightTensor::Float(2.5),
                WeightTensor::Nested(vec![WeightTensor::Int(3)]),
            ])
        );
    }

    #[test]
    fn arrays_promote_mixed_content_to_float() {
        assert_eq!(
            tensor("np.array([1, 0.5])"),
            WeightTensor::Nested(vec![WeightTensor::Float(1.0), WeightTensor::Float(0.5)])
        );
        assert_eq!(
            tensor("np.array([1, 2])"),
            WeightTensor::Nested(vec![WeightTensor::Int(1), WeightTensor::Int(2)])
        );
    }

    #[test]
    fn float32_dtype_rounds_like_tolist() {
        assert_eq!(
            tensor("array([0.1], dtype=float32)"),
            WeightTensor::Nested(vec![WeightTensor::Float(f64::from(0.1f32))])
        );
        assert_eq!(tensor("np.float32(0.1)"), WeightTensor::Float(0.10000000149011612));
    }

    #[test]
    fn int_dtype_truncates_and_checks_range() {
        assert_eq!(
            tensor("np.array([1.9, -1.9], dtype='int8')"),
            WeightTensor::Nested(vec![WeightTensor::Int(1), WeightTensor::Int(-1)])
        );
        assert!(matches!(
            eval("np.array([300], dtype=np.int8)"),
            Err(LiteralError::NumberOutOfRange { .. })
        ));
        assert!(matches!(
            eval("np.uint8(-1)"),
            Err(LiteralError::NumberOutOfRange { .. })
        ));
        assert_eq!(tensor("int(2.7)"), WeightTensor::Int(2));
        assert_eq!(tensor("float(3)"), WeightTensor::Float(3.0));
    }

    #[test]
    fn ragged_arrays_are_rejected() {
        assert_eq!(
            eval("[np.array([[1, 2], [3]])]").unwrap_err(),
            LiteralError::RaggedArray { column: 2 }
        );
    }

    #[test]
    fn unary_operators() {
        assert_eq!(tensor("-3"), WeightTensor::Int(-3));
        assert_eq!(tensor("+-0.5"), WeightTensor::Float(-0.5));
        assert_eq!(
            tensor("-np.array([1, -2])"),
            WeightTensor::Nested(vec![WeightTensor::Int(-1), WeightTensor::Int(2)])
        );
        assert_eq!(
            eval("-[1]").unwrap_err(),
            LiteralError::BadOperand {
                op: '-',
                kind: "list",
                column: 1
            }
        );
    }

    #[test]
    fn scalar_constructor_rejects_sequences() {
        assert!(matches!(
            eval("float([1])"),
            Err(LiteralError::BadArguments { .. })
        ));
    }

    #[test]
    fn top_level_iteration() {
        let collection = eval("([1, 2], 3)").unwrap().into_collection().unwrap();
        assert_eq!(collection.len(), 2);

        let rows = eval("np.array([[1, 2], [3, 4]])").unwrap().into_collection().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows.0[1],
            WeightTensor::Nested(vec![WeightTensor::Int(3), WeightTensor::Int(4)])
        );

        assert_eq!(
            eval("5").unwrap().into_collection().unwrap_err(),
            LiteralError::NotIterable { kind: "int" }
        );
        assert_eq!(
            eval("np.array(5)").unwrap().into_collection().unwrap_err(),
            LiteralError::NotIterable { kind: "0-d array" }
        );
    }
}
