use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::{core::operand_mismatch, sequence},
            core::EvalResult,
        },
        lexer::Location,
        operator::Operator,
        value::core::Value,
    },
    util::num::{i64_to_f64_checked, shift_amount},
};

/// Evaluates `+ - * / %`.
///
/// Two ints stay ints, with overflow reported rather than wrapped. An int
/// meeting a float is promoted to float first. Any other combination is
/// handed to the string and list forms.
///
/// # Errors
/// `DivisionByZero` for a zero divisor of either type, `Overflow` for
/// integer overflow or an int too large to promote exactly.
pub(super) fn eval_arithmetic(op: Operator,
                              left: &Value,
                              right: &Value,
                              location: &Location)
                              -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_arithmetic(op, *a, *b, location).map(Value::Int),
        (Value::Int(a), Value::Float(b)) => {
            float_arithmetic(op, i64_to_f64_checked(*a, location)?, *b, location).map(Value::Float)
        },
        (Value::Float(a), Value::Int(b)) => {
            float_arithmetic(op, *a, i64_to_f64_checked(*b, location)?, location).map(Value::Float)
        },
        (Value::Float(a), Value::Float(b)) => {
            float_arithmetic(op, *a, *b, location).map(Value::Float)
        },
        _ => sequence::eval_sequence(op, left, right, location),
    }
}

/// Integer arithmetic; division truncates toward zero.
fn int_arithmetic(op: Operator, a: i64, b: i64, location: &Location) -> EvalResult<i64> {
    let result = match op {
        Operator::Div | Operator::Mod if b == 0 => {
            return Err(RuntimeError::DivisionByZero { location: location.clone() });
        },
        Operator::Add => a.checked_add(b),
        Operator::Sub => a.checked_sub(b),
        Operator::Mul => a.checked_mul(b),
        Operator::Div => a.checked_div(b),
        Operator::Mod => a.checked_rem(b),
        _ => return Err(operand_mismatch(op, &Value::Int(a), &Value::Int(b), location)),
    };

    result.ok_or_else(|| RuntimeError::Overflow { location: location.clone() })
}

#[allow(clippy::float_cmp)]
fn float_arithmetic(op: Operator, a: f64, b: f64, location: &Location) -> EvalResult<f64> {
    match op {
        Operator::Div | Operator::Mod if b == 0.0 => {
            Err(RuntimeError::DivisionByZero { location: location.clone() })
        },
        Operator::Add => Ok(a + b),
        Operator::Sub => Ok(a - b),
        Operator::Mul => Ok(a * b),
        Operator::Div => Ok(a / b),
        Operator::Mod => Ok(a % b),
        _ => Err(operand_mismatch(op, &Value::Float(a), &Value::Float(b), location)),
    }
}

/// Evaluates `& | ^ << >>` on ints.
///
/// Shifts are arithmetic; the amount must be in `0..64`.
pub(super) fn eval_bitwise(op: Operator,
                           left: &Value,
                           right: &Value,
                           location: &Location)
                           -> EvalResult<Value> {
    let (Value::Int(a), Value::Int(b)) = (left, right) else {
        return Err(operand_mismatch(op, left, right, location));
    };

    let result = match op {
        Operator::BitAnd => a & b,
        Operator::BitOr => a | b,
        Operator::BitXor => a ^ b,
        Operator::Shl => a << shift_amount(*b, location)?,
        Operator::Shr => a >> shift_amount(*b, location)?,
        _ => return Err(operand_mismatch(op, left, right, location)),
    };

    Ok(Value::Int(result))
}
