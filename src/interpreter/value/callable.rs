use std::{fmt, rc::Rc};

use crate::{
    ast::FunctionDef,
    interpreter::evaluator::{function::registry::Builtin, scope::ScopeRef},
};

/// Something that can be invoked with arguments.
#[derive(Clone)]
pub enum Callable {
    /// A native function from the registry.
    Builtin(Builtin),
    /// A user function together with its defining scope.
    Closure {
        /// The parsed function.
        def:   Rc<FunctionDef>,
        /// The scope that was active when the function value was created.
        /// Lookups inside the body continue here, not in the caller.
        scope: ScopeRef,
    },
}

impl Callable {
    /// The name used in diagnostics and display.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(builtin) => builtin.name,
            Self::Closure { def, .. } => def.display_name(),
        }
    }
}

impl fmt::Debug for Callable {
    // The captured scope may contain this very closure, so it is not printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(builtin) => f.debug_tuple("Builtin").field(&builtin.name).finish(),
            Self::Closure { def, .. } => f.debug_struct("Closure")
                                          .field("name", &def.name)
                                          .field("params", &def.params)
                                          .finish_non_exhaustive(),
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name),
            Self::Closure { def, .. } => match &def.name {
                Some(name) => write!(f, "<function {name}>"),
                None => f.write_str("<function>"),
            },
        }
    }
}

impl PartialEq for Callable {
    /// Builtins are equal by name; closures only to themselves.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Builtin(a), Self::Builtin(b)) => a.name == b.name,
            (Self::Closure { def: a, scope: sa }, Self::Closure { def: b, scope: sb }) => {
                Rc::ptr_eq(a, b) && Rc::ptr_eq(sa, sb)
            },
            _ => false,
        }
    }
}
