use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{binary::core::operand_mismatch, core::EvalResult},
        lexer::Location,
        operator::Operator,
        value::core::Value,
    },
    util::num::non_negative,
};

/// Evaluates the string and list forms of `+` and `*`.
///
/// - `string + string` and `list + list` concatenate.
/// - `string * int` and `int * string` repeat the string.
///
/// # Errors
/// `InvalidArgument` for a negative repetition count, `Overflow` if the
/// repeated string would not fit in memory, and `TypeMismatch` for any
/// other operand combination.
pub(super) fn eval_sequence(op: Operator,
                            left: &Value,
                            right: &Value,
                            location: &Location)
                            -> EvalResult<Value> {
    match (op, left, right) {
        (Operator::Add, Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
        (Operator::Add, Value::List(a), Value::List(b)) => {
            let mut items = Vec::with_capacity(a.len() + b.len());
            items.extend(a.iter().cloned());
            items.extend(b.iter().cloned());
            Ok(items.into())
        },
        (Operator::Mul, Value::String(text), Value::Int(count))
        | (Operator::Mul, Value::Int(count), Value::String(text)) => {
            let count = non_negative(*count, "repetition count", location)?;
            let overflow = || RuntimeError::Overflow { location: location.clone() };
            let len = text.len()
                          .checked_mul(count)
                          .filter(|&len| len <= isize::MAX as usize)
                          .ok_or_else(overflow)?;
            if len == 0 {
                return Ok(Value::String(String::new()));
            }

            let mut repeated = String::new();
            repeated.try_reserve_exact(len).map_err(|_| overflow())?;
            repeated.extend(std::iter::repeat_n(text.as_str(), count));
            Ok(Value::String(repeated))
        },
        _ => Err(operand_mismatch(op, left, right, location)),
    }
}
