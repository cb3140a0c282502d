//! Literal expression tree.

/// A parsed numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// Element type requested by a constructor or `dtype=` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    /// `float16` is stored at `float32` precision.
    Float { bits: u8 },
    Int { bits: u8, signed: bool },
}

impl DType {
    /// Resolve a dtype spelling: `float32`, `np.float32`, `'float32'`, `'<f4'`, ...
    pub fn parse(name: &str) -> Option<Self> {
        let base = strip_module(name);
        let base = base.trim_start_matches(['<', '=', '|']);
        let dtype = match base {
            "float16" | "half" | "f2" => Self::Float { bits: 16 },
            "float32" | "single" | "f4" => Self::Float { bits: 32 },
            "float64" | "double" | "float" | "f8" => Self::Float { bits: 64 },
            "int8" | "i1" => Self::Int { bits: 8, signed: true },
            "int16" | "i2" => Self::Int { bits: 16, signed: true },
            "int32" | "i4" => Self::Int { bits: 32, signed: true },
            "int64" | "int" | "i8" => Self::Int { bits: 64, signed: true },
            "uint8" | "u1" => Self::Int { bits: 8, signed: false },
            "uint16" | "u2" => Self::Int { bits: 16, signed: false },
            "uint32" | "u4" => Self::Int { bits: 32, signed: false },
            // uint64 values above i64::MAX are rejected when cast
            "uint64" | "u8" => Self::Int { bits: 64, signed: false },
            _ => return None,
        };
        Some(dtype)
    }

    /// Inclusive integer range for `Int` dtypes.
    pub fn int_range(self) -> Option<(i64, i64)> {
        match self {
            Self::Float { .. } => None,
            Self::Int { bits: 64, signed: true } => Some((i64::MIN, i64::MAX)),
            Self::Int { bits: 64, signed: false } => Some((0, i64::MAX)),
            Self::Int { bits, signed: true } => {
                let half = 1i64 << (bits - 1);
                Some((-half, half - 1))
            }
            Self::Int { bits, signed: false } => Some((0, (1i64 << bits) - 1)),
        }
    }
}

/// Call targets the grammar accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constructor {
    /// `array(...)` / `asarray(...)`, bare or under `np.` / `numpy.`.
    Array,
    /// Scalar type call such as `float(...)` or `np.float32(...)`.
    Scalar(DType),
}

impl Constructor {
    pub fn resolve(name: &str) -> Option<Self> {
        let base = strip_module(name);
        let qualified = base.len() != name.len();
        match base {
            "array" | "asarray" => Some(Self::Array),
            // Builtins have no numpy spelling.
            "float" | "int" if !qualified => DType::parse(base).map(Self::Scalar),
            "float16" | "float32" | "float64" | "int8" | "int16" | "int32" | "int64"
            | "uint8" | "uint16" | "uint32" | "uint64" => DType::parse(base).map(Self::Scalar),
            _ => None,
        }
    }
}

fn strip_module(name: &str) -> &str {
    name.strip_prefix("np.")
        .or_else(|| name.strip_prefix("numpy."))
        .unwrap_or(name)
}

/// Expression node. Columns are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Number),
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Unary {
        op: char,
        operand: Box<Expr>,
        column: usize,
    },
    Call {
        name: String,
        constructor: Constructor,
        arg: Box<Expr>,
        dtype: Option<DType>,
        column: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dtype_spellings() {
        assert_eq!(DType::parse("np.float32"), Some(DType::Float { bits: 32 }));
        assert_eq!(DType::parse("<f8"), Some(DType::Float { bits: 64 }));
        assert_eq!(DType::parse("uint8"), Some(DType::Int { bits: 8, signed: false }));
        assert_eq!(DType::parse("complex64"), None);
    }

    #[test]
    fn int_ranges() {
        assert_eq!(DType::Int { bits: 8, signed: true }.int_range(), Some((-128, 127)));
        assert_eq!(DType::Int { bits: 16, signed: false }.int_range(), Some((0, 65535)));
        assert_eq!(DType::Float { bits: 32 }.int_range(), None);
    }

    #[test]
    fn constructor_names() {
        assert_eq!(Constructor::resolve("np.array"), Some(Constructor::Array));
        assert_eq!(Constructor::resolve("array"), Some(Constructor::Array));
        assert_eq!(
            Constructor::resolve("np.float32"),
            Some(Constructor::Scalar(DType::Float { bits: 32 }))
        );
        assert_eq!(
            Constructor::resolve("int"),
            Some(Constructor::Scalar(DType::Int { bits: 64, signed: true }))
        );
        assert_eq!(Constructor::resolve("np.float"), None);
        assert_eq!(Constructor::resolve("f4"), None);
        assert_eq!(Constructor::resolve("model.get_weights"), None);
    }
}
