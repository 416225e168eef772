use std::rc::Rc;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            access::{member_name, read_index, read_member},
            binary::core::apply_binary,
            core::{Context, EvalResult},
            scope,
        },
        lexer::Location,
        operator::Operator,
        value::core::Value,
    },
    util::num::checked_index,
};

/// One step from a variable into a nested container.
#[derive(Debug, Clone, PartialEq)]
enum Accessor {
    /// A list element.
    Index(i64),
    /// A dict entry.
    Key(String),
}

/// A resolved assignment target.
///
/// Index expressions are evaluated once, while resolving, so reading and
/// writing the same place never evaluates them twice.
#[derive(Debug, Clone, PartialEq)]
struct Place {
    root: String,
    path: Vec<Accessor>,
}

impl Context<'_> {
    /// Evaluates `target = value` and returns the stored value.
    pub(crate) fn eval_assignment(&mut self,
                                  target: &Expr,
                                  value: &Expr,
                                  location: &Location)
                                  -> EvalResult<Value> {
        let place = self.resolve_place(target)?;
        let value = self.eval(value)?;
        self.store(&place, value.clone(), location)?;
        Ok(value)
    }

    /// The shared routine behind compound assignment, increment and
    /// decrement.
    ///
    /// Reads the current value of `target`, combines it with `rhs` (or with
    /// `1` for increment and decrement, which require an int) using `op`,
    /// and stores the result back. Returns the old value when `postfix` is
    /// set and the new one otherwise.
    pub(crate) fn modify_and_store(&mut self,
                                   target: &Expr,
                                   op: Operator,
                                   rhs: Option<&Expr>,
                                   postfix: bool,
                                   location: &Location)
                                   -> EvalResult<Value> {
        let place = self.resolve_place(target)?;
        let current = self.read_place(&place, location)?;

        let operand = match rhs {
            Some(rhs) => self.eval(rhs)?,
            None => {
                current.as_int("operand of increment or decrement", location)?;
                Value::Int(1)
            },
        };

        let updated = apply_binary(op, &current, &operand, location)?;
        self.store(&place, updated.clone(), location)?;

        Ok(if postfix { current } else { updated })
    }

    /// Turns an lvalue expression into a place.
    ///
    /// Accepted shapes are an identifier, a subscript of an accepted shape,
    /// and a member access on an accepted shape.
    fn resolve_place(&mut self, target: &Expr) -> EvalResult<Place> {
        match target {
            Expr::Identifier { name, .. } => Ok(Place { root: name.clone(),
                                                        path: Vec::new(), }),
            Expr::Binary { op: Operator::Index,
                           lhs,
                           rhs,
                           location, } => {
                let mut place = self.resolve_place(lhs)?;
                let index = self.eval(rhs)?.as_int("list index", location)?;
                place.path.push(Accessor::Index(index));
                Ok(place)
            },
            Expr::Binary { op: Operator::Member,
                           lhs,
                           rhs,
                           .. } => {
                let mut place = self.resolve_place(lhs)?;
                place.path.push(Accessor::Key(member_name(rhs)?.to_string()));
                Ok(place)
            },
            other => {
                Err(RuntimeError::InvalidAssignmentTarget { location: other.location().clone() })
            },
        }
    }

    fn read_place(&self, place: &Place, location: &Location) -> EvalResult<Value> {
        let mut value = scope::lookup(&self.scope, &place.root).ok_or_else(|| {
                            RuntimeError::UnknownVariable { name:     place.root.clone(),
                                                            location: location.clone(), }
                        })?;

        for accessor in &place.path {
            value = match accessor {
                Accessor::Index(index) => read_index(&value, &Value::Int(*index), location)?,
                Accessor::Key(key) => read_member(&value, key, location)?,
            };
        }

        Ok(value)
    }

    /// Writes `value` to `place`.
    ///
    /// A bare variable is bound through the scope chain. A nested place is
    /// written inside the variable's owning scope, copying any container that
    /// is still shared with another value.
    fn store(&self, place: &Place, value: Value, location: &Location) -> EvalResult<()> {
        let Some((last, prefix)) = place.path.split_last() else {
            scope::assign(&self.scope, &place.root, value);
            return Ok(());
        };

        let unknown = || RuntimeError::UnknownVariable { name:     place.root.clone(),
                                                         location: location.clone(), };
        let owner = scope::find_owner(&self.scope, &place.root).ok_or_else(unknown)?;
        let mut owner = owner.borrow_mut();
        let mut slot = owner.get_mut(&place.root).ok_or_else(unknown)?;

        for accessor in prefix {
            slot = descend(slot, accessor, location)?;
        }

        match (last, slot) {
            (Accessor::Index(index), Value::List(items)) => {
                let position = checked_index(*index, items.len(), location)?;
                Rc::make_mut(items)[position] = value;
            },
            (Accessor::Key(key), Value::Dict(entries)) => {
                Rc::make_mut(entries).insert(key.clone(), value);
            },
            (accessor, other) => return Err(not_assignable(accessor, other, location)),
        }

        Ok(())
    }
}

/// Steps into a container for writing.
fn descend<'v>(slot: &'v mut Value,
               accessor: &Accessor,
               location: &Location)
               -> EvalResult<&'v mut Value> {
    match (accessor, slot) {
        (Accessor::Index(index), Value::List(items)) => {
            let position = checked_index(*index, items.len(), location)?;
            Ok(&mut Rc::make_mut(items)[position])
        },
        (Accessor::Key(key), Value::Dict(entries)) => {
            Rc::make_mut(entries).get_mut(key)
                                 .ok_or_else(|| RuntimeError::KeyNotFound { key:      key.clone(),
                                                                            location:
                                                                                location.clone() })
        },
        (accessor, other) => Err(not_assignable(accessor, other, location)),
    }
}

fn not_assignable(accessor: &Accessor, target: &Value, location: &Location) -> RuntimeError {
    let form = match accessor {
        Accessor::Index(_) => "subscript",
        Accessor::Key(_) => "member",
    };
    RuntimeError::type_mismatch(format!("cannot assign to a {form} of {}", target.type_name()),
                                location)
}
