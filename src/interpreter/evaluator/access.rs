use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, lexer::Location, value::core::Value},
    util::num::checked_index,
};

/// Reads `base[index]`.
///
/// Supported forms:
/// - list subscripted by an int,
/// - dict subscripted by a string,
/// - string subscripted by an int, giving a one-character string.
///
/// # Errors
/// `IndexOutOfBounds` for an index outside the list or string,
/// `KeyNotFound` for a missing dict key, `TypeMismatch` otherwise.
///
/// # Example
/// ```
/// use cinder::interpreter::{evaluator::access::read_index, lexer::Location, value::core::Value};
///
/// let at = Location::default();
/// let word = Value::from("héllo");
///
/// assert_eq!(read_index(&word, &Value::Int(1), &at).unwrap(), Value::from("é"));
/// assert!(read_index(&word, &Value::Int(5), &at).is_err());
/// ```
pub fn read_index(base: &Value, index: &Value, location: &Location) -> EvalResult<Value> {
    match (base, index) {
        (Value::List(items), Value::Int(i)) => {
            Ok(items[checked_index(*i, items.len(), location)?].clone())
        },
        (Value::Dict(_), Value::String(key)) => read_member(base, key, location),
        (Value::String(text), Value::Int(i)) => {
            let len = text.chars().count();
            let position = checked_index(*i, len, location)?;
            Ok(text.chars().nth(position).map(String::from).unwrap_or_default().into())
        },
        _ => Err(RuntimeError::type_mismatch(format!("cannot subscript {} with {}",
                                                     base.type_name(),
                                                     index.type_name()),
                                             location)),
    }
}

/// Reads `base.name` from a dict.
///
/// # Errors
/// `KeyNotFound` if the dict has no such entry, `TypeMismatch` if `base` is
/// not a dict.
pub fn read_member(base: &Value, name: &str, location: &Location) -> EvalResult<Value> {
    match base {
        Value::Dict(entries) => {
            entries.get(name)
                   .cloned()
                   .ok_or_else(|| RuntimeError::KeyNotFound { key:      name.to_string(),
                                                              location: location.clone(), })
        },
        other => Err(RuntimeError::type_mismatch(format!("cannot read member '{name}' of {}",
                                                         other.type_name()),
                                                 location)),
    }
}

/// Extracts the member name from the right side of a member access.
///
/// The parser only ever puts an identifier there.
pub fn member_name(expr: &Expr) -> EvalResult<&str> {
    match expr {
        Expr::Identifier { name, .. } => Ok(name),
        other => Err(RuntimeError::type_mismatch("member name must be an identifier",
                                                 other.location())),
    }
}
