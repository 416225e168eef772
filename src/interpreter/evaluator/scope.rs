use std::{cell::RefCell, rc::Rc};

use rustc_hash::FxHashMap;

use crate::interpreter::value::core::Value;

/// Shared handle to a scope.
///
/// Closures hold one of these for their defining scope, which keeps that
/// scope alive after the call that created it has returned.
pub type ScopeRef = Rc<RefCell<Scope>>;

/// A single scope containing variable bindings.
#[derive(Debug, Default)]
pub struct Scope {
    /// Variable bindings in this scope.
    bindings: FxHashMap<String, Value>,
    /// The lexically enclosing scope.
    parent:   Option<ScopeRef>,
}

impl Scope {
    /// Creates a parentless scope seeded with `bindings`.
    pub fn root(bindings: impl IntoIterator<Item = (String, Value)>) -> ScopeRef {
        Rc::new(RefCell::new(Self { bindings: bindings.into_iter().collect(),
                                    parent:   None, }))
    }

    /// Creates an empty scope whose lookups fall back to `parent`.
    #[must_use]
    pub fn child(parent: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Self { bindings: FxHashMap::default(),
                                    parent:   Some(Rc::clone(parent)), }))
    }

    /// Binds `name` in this scope, replacing any existing binding here.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Looks up `name` in this scope only.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Mutable access to a binding of this scope only.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.bindings.get_mut(name)
    }

    /// All bindings of this scope, in no particular order.
    pub fn bindings(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.bindings.iter()
    }
}

/// Finds the innermost scope in the chain starting at `scope` that binds
/// `name`.
#[must_use]
pub fn find_owner(scope: &ScopeRef, name: &str) -> Option<ScopeRef> {
    let mut current = Rc::clone(scope);
    loop {
        let parent = {
            let borrowed = current.borrow();
            if borrowed.bindings.contains_key(name) {
                return Some(Rc::clone(&current));
            }
            borrowed.parent.clone()
        };
        current = parent?;
    }
}

/// Resolves `name` through the chain starting at `scope`.
///
/// # Example
/// ```
/// use cinder::interpreter::{
///     evaluator::scope::{Scope, lookup},
///     value::core::Value,
/// };
///
/// let root = Scope::root([("x".to_string(), Value::Int(1))]);
/// let inner = Scope::child(&root);
///
/// assert_eq!(lookup(&inner, "x"), Some(Value::Int(1)));
/// assert_eq!(lookup(&inner, "y"), None);
/// ```
#[must_use]
pub fn lookup(scope: &ScopeRef, name: &str) -> Option<Value> {
    find_owner(scope, name).and_then(|owner| owner.borrow().get(name).cloned())
}

/// Writes `value` to `name`.
///
/// An existing binding is updated in the scope that owns it; otherwise a new
/// binding is created in `scope` itself.
pub fn assign(scope: &ScopeRef, name: &str, value: Value) {
    let owner = find_owner(scope, name).unwrap_or_else(|| Rc::clone(scope));
    owner.borrow_mut().define(name, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_updates_the_owning_scope() {
        let root = Scope::root([("x".to_string(), Value::Int(1))]);
        let inner = Scope::child(&root);

        assign(&inner, "x", Value::Int(2));
        assign(&inner, "y", Value::Int(3));

        assert_eq!(root.borrow().get("x"), Some(&Value::Int(2)));
        assert_eq!(root.borrow().get("y"), None);
        assert_eq!(inner.borrow().get("y"), Some(&Value::Int(3)));
    }

    #[test]
    fn inner_definitions_shadow_outer_ones() {
        let root = Scope::root([("x".to_string(), Value::Int(1))]);
        let inner = Scope::child(&root);
        inner.borrow_mut().define("x", Value::Int(9));

        assert_eq!(lookup(&inner, "x"), Some(Value::Int(9)));
        assert_eq!(lookup(&root, "x"), Some(Value::Int(1)));
    }
}
