//! Attribute values stored in a layer's value dictionary.

use std::fmt;

/// A typed attribute value (MVT `Tile.Value`).
///
/// Each variant corresponds to one of the mutually exclusive value fields on
/// the wire, so the declared numeric kind survives a decode/encode cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f32),
    Double(f64),
    Int(i64),
    UInt(u64),
    SInt(i64),
    Bool(bool),
}

/// Canonical lookup key for a [`Value`] in a value dictionary.
///
/// Numeric variants are keyed by their numeric value alone, so `Int(1)`,
/// `UInt(1)` and `Double(1.0)` share one dictionary slot. Strings and bools
/// are namespaced by kind and never collide with numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    /// Any numeric value with no fractional part.
    Integer(i128),
    /// Any other numeric value, by its `f64` bit pattern.
    Number(u64),
    String(String),
    Bool(bool),
}

impl Value {
    /// Returns the dictionary lookup key for this value.
    pub fn key(&self) -> ValueKey {
        match self {
            Value::String(s) => ValueKey::String(s.clone()),
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Int(v) | Value::SInt(v) => ValueKey::Integer(*v as i128),
            Value::UInt(v) => ValueKey::Integer(*v as i128),
            Value::Float(v) => numeric_key(*v as f64),
            Value::Double(v) => numeric_key(*v),
        }
    }

    /// Returns the kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::SInt(_) => "sint",
            Value::Bool(_) => "bool",
        }
    }

}

fn numeric_key(v: f64) -> ValueKey {
    if v.is_nan() {
        return ValueKey::Number(f64::NAN.to_bits());
    }
    // -0.0 lands here too and shares the slot of 0
    if v.fract() == 0.0 && v.abs() < i128::MAX as f64 {
        return ValueKey::Integer(v as i128);
    }
    ValueKey::Number(v.to_bits())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Int(v) | Value::SInt(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_kinds_share_key() {
        assert_eq!(Value::Int(1).key(), Value::Double(1.0).key());
        assert_eq!(Value::UInt(1).key(), Value::Float(1.0).key());
        assert_eq!(Value::SInt(-3).key(), Value::Double(-3.0).key());
        assert_eq!(Value::Double(0.0).key(), Value::Double(-0.0).key());
    }

    #[test]
    fn test_fractional_numbers_keyed_by_bits() {
        assert_eq!(Value::Double(0.5).key(), Value::Float(0.5).key());
        assert_ne!(Value::Double(0.1).key(), Value::Float(0.1).key());
        assert_eq!(Value::Double(f64::NAN).key(), Value::Float(f32::NAN).key());
    }

    #[test]
    fn test_non_numeric_kinds_are_namespaced() {
        assert_ne!(Value::from("1").key(), Value::Int(1).key());
        assert_ne!(Value::Bool(true).key(), Value::Int(1).key());
        assert_ne!(Value::from("true").key(), Value::Bool(true).key());
    }

    #[test]
    fn test_large_integers_stay_exact() {
        let big = (1u64 << 53) + 1;
        assert_ne!(Value::UInt(big).key(), Value::Double((1u64 << 53) as f64).key());
        assert_eq!(Value::UInt(u64::MAX).key(), ValueKey::Integer(u64::MAX as i128));
    }

    #[test]
    fn test_display_and_kind() {
        assert_eq!(Value::from("main").to_string(), "\"main\"");
        assert_eq!(Value::Double(2.5).to_string(), "2.5");
        assert_eq!(Value::SInt(-4).to_string(), "-4");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::UInt(3).kind(), "uint");
        assert_eq!(Value::Float(1.0).kind(), "float");
    }
}
