use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            access::{member_name, read_index, read_member},
            binary::{comparison, logic, scalar},
            core::{Context, EvalResult},
        },
        lexer::Location,
        operator::Operator,
        value::core::Value,
    },
};

impl Context<'_> {
    /// Evaluates a binary expression.
    ///
    /// Assignments write through their left side, subscript and member
    /// access read from it, and the conditional evaluates only the chosen
    /// branch. Every other operator evaluates both operands, left first, and
    /// applies [`apply_binary`]. In particular `&&` and `||` always evaluate
    /// both sides.
    pub(crate) fn eval_binary_expr(&mut self,
                                   op: Operator,
                                   lhs: &Expr,
                                   rhs: &Expr,
                                   location: &Location)
                                   -> EvalResult<Value> {
        if let Some(base) = op.compound_base() {
            return self.modify_and_store(lhs, base, Some(rhs), false, location);
        }

        match op {
            Operator::Assign => self.eval_assignment(lhs, rhs, location),
            Operator::Index => {
                let base = self.eval(lhs)?;
                let index = self.eval(rhs)?;
                read_index(&base, &index, location)
            },
            Operator::Member => {
                let base = self.eval(lhs)?;
                read_member(&base, member_name(rhs)?, location)
            },
            Operator::Ternary => self.eval_conditional(lhs, rhs, location),
            _ => {
                let left = self.eval(lhs)?;
                let right = self.eval(rhs)?;
                apply_binary(op, &left, &right, location)
            },
        }
    }

    /// Evaluates `condition ? then : otherwise`.
    fn eval_conditional(&mut self,
                        condition: &Expr,
                        branches: &Expr,
                        location: &Location)
                        -> EvalResult<Value> {
        let Expr::Pair { then, otherwise, .. } = branches else {
            return Err(RuntimeError::type_mismatch("'?' without matching ':'", location));
        };

        if self.eval(condition)?.as_bool(condition.location())? {
            self.eval(then)
        } else {
            self.eval(otherwise)
        }
    }
}

/// Applies a value-level binary operator to two evaluated operands.
///
/// This function routes the operation to specialized handlers depending on
/// the operator: arithmetic (with string and list forms), bitwise, ordering,
/// equality and logic. Compound assignment reuses it with the plain
/// operator, so `s += 'x'` behaves exactly like `s = s + 'x'`.
///
/// # Example
/// ```
/// use cinder::interpreter::{
///     evaluator::binary::core::apply_binary,
///     lexer::Location,
///     operator::Operator,
///     value::core::Value,
/// };
///
/// let at = Location::default();
/// let sum = apply_binary(Operator::Add, &Value::Int(3), &Value::Int(4), &at).unwrap();
/// assert_eq!(sum, Value::Int(7));
///
/// let text = apply_binary(Operator::Mul, &Value::from("-"), &Value::Int(3), &at).unwrap();
/// assert_eq!(text, Value::from("---"));
/// ```
pub fn apply_binary(op: Operator,
                    left: &Value,
                    right: &Value,
                    location: &Location)
                    -> EvalResult<Value> {
    use Operator::{
        Add, And, BitAnd, BitOr, BitXor, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod,
        Mul, NotEqual, Or, Shl, Shr, Sub,
    };

    match op {
        Add | Sub | Mul | Div | Mod => scalar::eval_arithmetic(op, left, right, location),
        Shl | Shr | BitAnd | BitOr | BitXor => scalar::eval_bitwise(op, left, right, location),
        Less | LessEqual | Greater | GreaterEqual => {
            comparison::eval_ordering(op, left, right, location)
        },
        Equal => Ok(Value::Bool(left == right)),
        NotEqual => Ok(Value::Bool(left != right)),
        And | Or => logic::eval_logic(op, left, right, location),
        _ => Err(RuntimeError::type_mismatch(format!("'{op}' is not a binary operator"),
                                             location)),
    }
}

/// Builds the error for operand types an operator does not support.
pub(super) fn operand_mismatch(op: Operator,
                               left: &Value,
                               right: &Value,
                               location: &Location)
                               -> RuntimeError {
    RuntimeError::type_mismatch(format!("cannot apply '{op}' to {} and {}",
                                        left.type_name(),
                                        right.type_name()),
                                location)
}

