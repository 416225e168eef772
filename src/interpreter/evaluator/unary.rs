use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        lexer::Location,
        operator::Operator,
        value::core::Value,
    },
};

impl Context<'_> {
    /// Evaluates a unary expression.
    ///
    /// Increment and decrement go through the modify-and-store routine, since
    /// they write back to their operand. Every other operator evaluates its
    /// operand and applies [`apply_unary`].
    pub(crate) fn eval_unary(&mut self,
                             op: Operator,
                             operand: &Expr,
                             location: &Location)
                             -> EvalResult<Value> {
        let (step, postfix) = match op {
            Operator::PreIncrement => (Operator::Add, false),
            Operator::PostIncrement => (Operator::Add, true),
            Operator::PreDecrement => (Operator::Sub, false),
            Operator::PostDecrement => (Operator::Sub, true),
            _ => {
                let value = self.eval(operand)?;
                return apply_unary(op, &value, location);
            },
        };

        self.modify_and_store(operand, step, None, postfix, location)
    }
}

/// Applies a non-mutating unary operator to a value.
///
/// Supported operators:
/// - `Plus`, `Negate`: ints and floats; negating `i64::MIN` overflows.
/// - `Not`: booleans only.
/// - `BitNot`: ints only.
///
/// # Example
/// ```
/// use cinder::interpreter::{
///     evaluator::unary::apply_unary,
///     lexer::Location,
///     operator::Operator,
///     value::core::Value,
/// };
///
/// let at = Location::default();
/// assert_eq!(apply_unary(Operator::Negate, &Value::Int(3), &at).unwrap(), Value::Int(-3));
/// assert_eq!(apply_unary(Operator::BitNot, &Value::Int(0), &at).unwrap(), Value::Int(-1));
/// assert!(apply_unary(Operator::Not, &Value::Int(0), &at).is_err());
/// ```
pub fn apply_unary(op: Operator, value: &Value, location: &Location) -> EvalResult<Value> {
    match (op, value) {
        (Operator::Plus, Value::Int(_) | Value::Float(_)) => Ok(value.clone()),
        (Operator::Negate, Value::Int(n)) => {
            n.checked_neg()
             .map(Value::Int)
             .ok_or_else(|| RuntimeError::Overflow { location: location.clone() })
        },
        (Operator::Negate, Value::Float(x)) => Ok(Value::Float(-x)),
        (Operator::Not, other) => Ok(Value::Bool(!other.as_bool(location)?)),
        (Operator::BitNot, Value::Int(n)) => Ok(Value::Int(!n)),
        _ => Err(RuntimeError::type_mismatch(format!("cannot apply '{op}' to {}",
                                                     value.type_name()),
                                             location)),
    }
}
