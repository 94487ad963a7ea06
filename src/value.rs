//! Primitive values produced by context lookups and method calls

use std::fmt;

/// A primitive value resolved from a context
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Whether this value counts as absent for attribute lookups
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Parse a bare method argument.
    ///
    /// Numeric-looking text becomes `Int` (or `Float` when it carries a
    /// decimal point or exponent); anything else stays a string.
    pub fn from_literal(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Value::Str(String::new());
        }
        let is_float = trimmed.contains(&['.', 'e', 'E'][..]);
        if !is_float {
            if let Ok(n) = trimmed.parse::<i64>() {
                return Value::Int(n);
            }
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() && looks_numeric(trimmed) => Value::Float(f),
            _ => Value::Str(trimmed.to_string()),
        }
    }
}

/// Rejects text that `f64::from_str` accepts but is not written as a number
/// ("inf", "NaN", "infinity").
fn looks_numeric(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(true) => write!(f, "1"),
            Value::Bool(false) => Ok(()),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_coercion() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Bool(true).to_string(), "1");
        assert_eq!(Value::Bool(false).to_string(), "");
        assert_eq!(Value::Int(123).to_string(), "123");
        assert_eq!(Value::Float(500.0).to_string(), "500");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::from("John").to_string(), "John");
    }

    #[test]
    fn test_literal_numbers() {
        assert_eq!(Value::from_literal("42"), Value::Int(42));
        assert_eq!(Value::from_literal("-7"), Value::Int(-7));
        assert_eq!(Value::from_literal("3.14"), Value::Float(3.14));
        assert_eq!(Value::from_literal("1e3"), Value::Float(1000.0));
    }

    #[test]
    fn test_literal_strings() {
        assert_eq!(Value::from_literal("Y-m-d"), Value::from("Y-m-d"));
        assert_eq!(Value::from_literal("inf"), Value::from("inf"));
        assert_eq!(Value::from_literal("NaN"), Value::from("NaN"));
        assert_eq!(Value::from_literal(" abc "), Value::from("abc"));
    }
}
