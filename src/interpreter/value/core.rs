use std::{collections::BTreeMap, fmt, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, lexer::Location, value::callable::Callable},
};

/// Represents a runtime value in the interpreter.
///
/// Lists and dicts are shared behind [`Rc`] and copied on the first write
/// through a shared handle, so assigning a container to a second variable
/// never aliases it.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The absence of a value.
    #[default]
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A double precision float.
    Float(f64),
    /// A string of characters.
    String(String),
    /// An ordered sequence of values.
    List(Rc<Vec<Self>>),
    /// A string-keyed mapping, iterated in key order.
    Dict(Rc<BTreeMap<String, Self>>),
    /// A builtin or user function.
    Function(Rc<Callable>),
}

impl Value {
    /// The name of the value's type, as used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
            Self::Function(_) => "function",
        }
    }

    /// Returns the boolean, or `ExpectedBoolean` for any other type.
    ///
    /// There is no implicit truthiness: `0`, `''` and `null` are all errors.
    ///
    /// # Example
    /// ```
    /// use cinder::interpreter::{lexer::Location, value::core::Value};
    ///
    /// let at = Location::default();
    /// assert!(Value::Bool(true).as_bool(&at).unwrap());
    /// assert!(Value::Int(1).as_bool(&at).is_err());
    /// ```
    pub fn as_bool(&self, location: &Location) -> EvalResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(RuntimeError::ExpectedBoolean { found:    other.type_name().to_string(),
                                                         location: location.clone(), }),
        }
    }

    /// Returns the integer, or `TypeMismatch` for any other type.
    pub fn as_int(&self, what: &str, location: &Location) -> EvalResult<i64> {
        match self {
            Self::Int(n) => Ok(*n),
            other => {
                Err(RuntimeError::type_mismatch(format!("{what} must be int, found {}",
                                                        other.type_name()),
                                                location))
            },
        }
    }

    /// Writes the value as it appears inside a list or dict, where strings
    /// are quoted.
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) if s.contains('\'') => write!(f, "\"{s}\""),
            Self::String(s) => write!(f, "'{s}'"),
            other => write!(f, "{other}"),
        }
    }
}

impl PartialEq for Value {
    /// Structural equality without coercion: values of different types are
    /// never equal, so `4 != 4.0` and `4 != '4'`.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Dict(a), Self::Dict(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b) || a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::String(s) => f.write_str(s),
            Self::List(items) => {
                write!(f, "[")?;

                for (index, value) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    value.fmt_nested(f)?;
                }

                write!(f, "]")
            },
            Self::Dict(entries) => {
                write!(f, "{{")?;

                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{key}: ")?;
                    value.fmt_nested(f)?;
                }

                write!(f, "}}")
            },
            Self::Function(callable) => write!(f, "{callable}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(Rc::new(v))
    }
}

impl From<BTreeMap<String, Self>> for Value {
    fn from(v: BTreeMap<String, Self>) -> Self {
        Self::Dict(Rc::new(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_never_coerces() {
        assert_ne!(Value::Int(4), Value::Float(4.0));
        assert_ne!(Value::Int(4), Value::from("4"));
        assert_ne!(Value::Null, Value::Bool(false));
        assert_eq!(Value::from(vec![Value::Int(1), "a".into()]),
                   Value::from(vec![Value::Int(1), "a".into()]));
    }

    #[test]
    fn display_forms() {
        let dict = BTreeMap::from([("b".to_string(), Value::from("it's")),
                                   ("a".to_string(), Value::Float(1.0))]);
        let list = Value::from(vec![Value::Int(1), "x".into(), Value::Null, dict.into()]);

        assert_eq!(list.to_string(), "[1, 'x', null, {a: 1.0, b: \"it's\"}]");
        assert_eq!(Value::from("plain").to_string(), "plain");
        assert_eq!(Value::Float(0.5).to_string(), "0.5");
    }
}
