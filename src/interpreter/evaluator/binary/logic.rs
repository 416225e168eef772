use crate::interpreter::{
    evaluator::core::EvalResult, lexer::Location, operator::Operator, value::core::Value,
};

/// Evaluates `&&` and `||` on two already evaluated operands.
///
/// Both operands must be booleans.
pub(super) fn eval_logic(op: Operator,
                         left: &Value,
                         right: &Value,
                         location: &Location)
                         -> EvalResult<Value> {
    let a = left.as_bool(location)?;
    let b = right.as_bool(location)?;

    Ok(Value::Bool(if op == Operator::And { a && b } else { a || b }))
}
