use std::{fmt, sync::LazyLock};

use rustc_hash::FxHashMap;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            function::{builtin, log},
        },
        lexer::Location,
        output::Output,
        value::core::Value,
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives its already checked arguments, the output sink for
/// anything it prints, and the location of the call for error reporting.
pub type NativeFn = fn(&[Value], &mut Output, &Location) -> EvalResult<Value>;

/// A parameter or return type in a builtin signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    /// Accepts every value.
    Any,
    /// `null`
    Null,
    /// `bool`
    Bool,
    /// `int`
    Int,
    /// `float`
    Float,
    /// `string`
    String,
    /// `list`
    List,
    /// `dict`
    Dict,
    /// `function`
    Function,
}

impl Type {
    /// Returns `true` if `value` has this type.
    #[must_use]
    pub const fn matches(self, value: &Value) -> bool {
        matches!((self, value),
                 (Self::Any, _)
                 | (Self::Null, Value::Null)
                 | (Self::Bool, Value::Bool(_))
                 | (Self::Int, Value::Int(_))
                 | (Self::Float, Value::Float(_))
                 | (Self::String, Value::String(_))
                 | (Self::List, Value::List(_))
                 | (Self::Dict, Value::Dict(_))
                 | (Self::Function, Value::Function(_)))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Any => "any",
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::List => "list",
            Self::Dict => "dict",
            Self::Function => "function",
        };
        f.write_str(name)
    }
}

/// The signature and implementation of a native function.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    /// The name scripts call it by.
    pub name:     &'static str,
    /// Types of the fixed parameters.
    pub params:   &'static [Type],
    /// Whether any number of extra arguments of any type may follow.
    pub variadic: bool,
    /// The type of the result.
    pub returns:  Type,
    /// The implementation.
    pub func:     NativeFn,
}

impl Builtin {
    /// Checks argument count and types against the signature.
    ///
    /// # Errors
    /// `ArgumentCountMismatch` for a wrong count, `TypeMismatch` naming the
    /// first argument of the wrong type.
    pub fn check_arguments(&self, args: &[Value], location: &Location) -> EvalResult<()> {
        let count_ok = if self.variadic {
            args.len() >= self.params.len()
        } else {
            args.len() == self.params.len()
        };
        if !count_ok {
            let expected = if self.variadic {
                format!("at least {}", self.params.len())
            } else {
                self.params.len().to_string()
            };
            return Err(RuntimeError::ArgumentCountMismatch { name: self.name.to_string(),
                                                             expected,
                                                             found: args.len(),
                                                             location: location.clone() });
        }

        for (position, (param, arg)) in self.params.iter().zip(args).enumerate() {
            if !param.matches(arg) {
                return Err(RuntimeError::type_mismatch(format!("argument {} of '{}' must be \
                                                                {param}, found {}",
                                                               position + 1,
                                                               self.name,
                                                               arg.type_name()),
                                                       location));
            }
        }

        Ok(())
    }
}

/// Defines the standard builtins as a table of signature records.
///
/// Each entry provides:
/// - a string name,
/// - the parameter types,
/// - whether extra arguments are accepted,
/// - the return type,
/// - a function pointer implementing the builtin.
///
/// The macro produces `standard_builtins()`, returning the records, and
/// `BUILTIN_FUNCTIONS`, the list of their names.
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                params: [$($param:ident),* $(,)?],
                variadic: $variadic:expr,
                returns: $returns:ident,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        fn standard_builtins() -> Vec<Builtin> {
            vec![
                $(
                    Builtin { name:     $name,
                              params:   &[$(Type::$param),*],
                              variadic: $variadic,
                              returns:  Type::$returns,
                              func:     $func },
                )*
            ]
        }

        /// Names of the builtins every interpreter starts with.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "log"    => { params: [], variadic: true, returns: Null, func: log::log },
    "string" => { params: [Any], variadic: false, returns: String, func: builtin::string },
    "length" => { params: [Any], variadic: false, returns: Int, func: builtin::length },
    "substr" => {
        params: [String, Int, Int],
        variadic: false,
        returns: String,
        func: builtin::substr,
    },
    "getenv" => { params: [String], variadic: false, returns: Any, func: builtin::getenv },
}

/// A name-indexed table of builtins.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    builtins: FxHashMap<&'static str, Builtin>,
}

/// The standard registry, built on first use and never modified.
pub static DEFAULT_REGISTRY: LazyLock<Registry> = LazyLock::new(|| {
    let mut registry = Registry::new();
    for builtin in standard_builtins() {
        registry.register(builtin);
    }
    registry
});

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the standard builtins.
    #[must_use]
    pub fn with_defaults() -> Self {
        DEFAULT_REGISTRY.clone()
    }

    /// Adds `builtin`, returning the entry it replaced, if any.
    pub fn register(&mut self, builtin: Builtin) -> Option<Builtin> {
        self.builtins.insert(builtin.name, builtin)
    }

    /// Finds a builtin by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Builtin> {
        self.builtins.get(name)
    }

    /// Names of all registered builtins, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.builtins.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_holds_the_standard_table() {
        let mut expected = BUILTIN_FUNCTIONS.to_vec();
        expected.sort_unstable();

        assert_eq!(Registry::with_defaults().names(), expected);
    }

    #[test]
    fn signatures_are_checked() {
        let at = Location::default();
        let registry = Registry::with_defaults();
        let substr = registry.lookup("substr").unwrap();

        assert!(substr.check_arguments(&["abc".into(), Value::Int(0), Value::Int(1)], &at)
                      .is_ok());
        assert!(matches!(substr.check_arguments(&["abc".into()], &at),
                         Err(RuntimeError::ArgumentCountMismatch { found: 1, .. })));
        assert!(matches!(substr.check_arguments(&[Value::Int(0), Value::Int(0), Value::Int(1)],
                                                &at),
                         Err(RuntimeError::TypeMismatch { .. })));

        let log = registry.lookup("log").unwrap();
        assert!(log.check_arguments(&[], &at).is_ok());
        assert!(log.check_arguments(&[Value::Null, Value::Int(1)], &at).is_ok());
    }

    #[test]
    fn results_match_declared_return_types() {
        let at = Location::default();
        let registry = Registry::with_defaults();
        let calls: [(&str, Vec<Value>, Type); 5] =
            [("log", vec!["hi".into()], Type::Null),
             ("string", vec![Value::Int(7)], Type::String),
             ("length", vec!["abc".into()], Type::Int),
             ("substr", vec!["abc".into(), Value::Int(1), Value::Int(1)], Type::String),
             ("getenv", vec!["CINDER_SURELY_UNSET".into()], Type::Any)];

        for (name, args, declared) in calls {
            let builtin = registry.lookup(name).unwrap();
            assert_eq!(builtin.returns, declared, "{name}");

            builtin.check_arguments(&args, &at).unwrap();
            let result = (builtin.func)(&args, &mut Output::Silent, &at).unwrap();
            assert!(builtin.returns.matches(&result), "{name} returned {result:?}");
        }
    }
}
