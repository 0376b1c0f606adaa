//! Typed constant values.

use num_bigint::BigUint;
use rust_decimal::Decimal;

/// Built-in type keywords that parse to [`ConstantValue::Type`].
pub const TYPE_KEYWORDS: [&str; 10] = [
    "string", "object", "int", "long", "double", "float", "decimal", "bool", "char", "byte",
];

/// The static type of a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantType {
    Null,
    Bool,
    Int32,
    Int64,
    UInt32,
    UInt64,
    BigInteger,
    Single,
    Double,
    Decimal,
    String,
    Type,
}

/// A literal value carried by a constant node.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    UInt64(u64),
    /// An unsuffixed integer literal past `u64::MAX`.
    BigInteger(BigUint),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
    String(String),
    /// A reference to a built-in type, e.g. the `string` in `string.Format(..)`.
    Type(String),
}

impl ConstantValue {
    pub fn static_type(&self) -> ConstantType {
        match self {
            ConstantValue::Null => ConstantType::Null,
            ConstantValue::Bool(_) => ConstantType::Bool,
            ConstantValue::Int32(_) => ConstantType::Int32,
            ConstantValue::Int64(_) => ConstantType::Int64,
            ConstantValue::UInt32(_) => ConstantType::UInt32,
            ConstantValue::UInt64(_) => ConstantType::UInt64,
            ConstantValue::BigInteger(_) => ConstantType::BigInteger,
            ConstantValue::Single(_) => ConstantType::Single,
            ConstantValue::Double(_) => ConstantType::Double,
            ConstantValue::Decimal(_) => ConstantType::Decimal,
            ConstantValue::String(_) => ConstantType::String,
            ConstantValue::Type(_) => ConstantType::Type,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstantValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_type_keyword(word: &str) -> bool {
        TYPE_KEYWORDS.contains(&word)
    }
}

impl From<bool> for ConstantValue {
    fn from(v: bool) -> Self {
        ConstantValue::Bool(v)
    }
}

impl From<i32> for ConstantValue {
    fn from(v: i32) -> Self {
        ConstantValue::Int32(v)
    }
}

impl From<i64> for ConstantValue {
    fn from(v: i64) -> Self {
        ConstantValue::Int64(v)
    }
}

impl From<BigUint> for ConstantValue {
    fn from(v: BigUint) -> Self {
        ConstantValue::BigInteger(v)
    }
}

impl From<f64> for ConstantValue {
    fn from(v: f64) -> Self {
        ConstantValue::Double(v)
    }
}

impl From<&str> for ConstantValue {
    fn from(v: &str) -> Self {
        ConstantValue::String(v.to_string())
    }
}

impl From<String> for ConstantValue {
    fn from(v: String) -> Self {
        ConstantValue::String(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_type_follows_value() {
        assert_eq!(ConstantValue::Null.static_type(), ConstantType::Null);
        assert_eq!(ConstantValue::from(1).static_type(), ConstantType::Int32);
        assert_eq!(ConstantValue::from("a").static_type(), ConstantType::String);
        assert_eq!(
            ConstantValue::Decimal(Decimal::new(15, 1)).static_type(),
            ConstantType::Decimal
        );
        assert_eq!(
            ConstantValue::from(BigUint::from(u64::MAX) + 1u32).static_type(),
            ConstantType::BigInteger
        );
    }

    #[test]
    fn test_type_keywords() {
        assert!(ConstantValue::is_type_keyword("string"));
        assert!(!ConstantValue::is_type_keyword("String"));
    }
}
