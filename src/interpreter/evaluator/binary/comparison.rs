use crate::interpreter::{
    evaluator::{binary::core::operand_mismatch, core::EvalResult},
    lexer::Location,
    operator::Operator,
    value::core::Value,
};

/// Evaluates `< <= > >=`.
///
/// Both operands must be ints, both floats, or both strings; strings compare
/// lexicographically. Nothing is coerced, so `1 < 2.0` is a type mismatch.
/// Comparisons involving NaN are false.
pub(super) fn eval_ordering(op: Operator,
                            left: &Value,
                            right: &Value,
                            location: &Location)
                            -> EvalResult<Value> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => return Err(operand_mismatch(op, left, right, location)),
    };

    let result = ordering.is_some_and(|ordering| match op {
                             Operator::Less => ordering.is_lt(),
                             Operator::LessEqual => ordering.is_le(),
                             Operator::Greater => ordering.is_gt(),
                             Operator::GreaterEqual => ordering.is_ge(),
                             _ => false,
                         });

    Ok(Value::Bool(result))
}
