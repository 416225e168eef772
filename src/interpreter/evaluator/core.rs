use std::{collections::BTreeMap, rc::Rc};

use crate::{
    ast::{Expr, FunctionDef},
    config::Config,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            function::registry::Registry,
            scope::{self, ScopeRef},
        },
        lexer::Location,
        output::Output,
        value::{callable::Callable, core::Value},
    },
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state for one run: the active scope,
/// the builtin registry, the output sink, the configured limits, and the
/// counters those limits are checked against.
///
/// ## Usage
///
/// A `Context` is created per run around a root scope. Function calls swap
/// the active scope for a child of the callee's defining scope and restore it
/// afterwards, so once a run ends the active scope is the root again.
pub struct Context<'a> {
    /// The innermost active scope.
    pub(crate) scope:      ScopeRef,
    pub(crate) output:     &'a mut Output,
    pub(crate) registry:   &'a Registry,
    pub(crate) config:     &'a Config,
    /// Number of user function calls currently active.
    pub(crate) call_depth: usize,
    /// Statements and loop iterations executed so far.
    pub(crate) steps:      u64,
}

impl<'a> Context<'a> {
    /// Creates a context that runs in `scope`.
    #[must_use]
    pub const fn new(scope: ScopeRef,
                     registry: &'a Registry,
                     config: &'a Config,
                     output: &'a mut Output)
                     -> Self {
        Self { scope,
               output,
               registry,
               config,
               call_depth: 0,
               steps: 0 }
    }

    /// Returns the scope that is currently active.
    #[must_use]
    pub const fn scope(&self) -> &ScopeRef {
        &self.scope
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. The evaluator
    /// dispatches on the expression variant: literals, identifiers, unary and
    /// binary operations, calls, container literals and function literals.
    ///
    /// # Example
    /// ```
    /// use cinder::{
    ///     config::Config,
    ///     interpreter::{
    ///         evaluator::{core::Context, function::registry::Registry, scope::Scope},
    ///         lexer::tokenize,
    ///         output::Output,
    ///         parser::{core::Parser, utils::Completion},
    ///         value::core::Value,
    ///     },
    /// };
    ///
    /// let tokens = tokenize("1 + 2 * 3 + 4").unwrap();
    /// let (expr, _) = Parser::new(&tokens).parse_expression(Completion::EndOfText).unwrap();
    ///
    /// let (registry, config) = (Registry::with_defaults(), Config::default());
    /// let mut output = Output::Silent;
    /// let mut context = Context::new(Scope::root([]), &registry, &config, &mut output);
    ///
    /// assert_eq!(context.eval(&expr).unwrap(), Value::Int(11));
    /// ```
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        ensure_sufficient_stack(|| self.eval_expr(expr))
    }

    fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Identifier { name, location } => self.eval_identifier(name, location),
            Expr::Int { value, .. } => Ok(Value::Int(*value)),
            Expr::Float { value, .. } => Ok(Value::Float(*value)),
            Expr::Str { value, .. } => Ok(Value::String(value.clone())),
            Expr::Bool { value, .. } => Ok(Value::Bool(*value)),
            Expr::Unary { op, operand, location } => self.eval_unary(*op, operand, location),
            Expr::Binary { op,
                           lhs,
                           rhs,
                           location, } => self.eval_binary_expr(*op, lhs, rhs, location),
            Expr::Call { callee,
                         args,
                         named,
                         location, } => self.eval_call(callee, args, named, location),
            Expr::List { elements, .. } => {
                let values = elements.iter()
                                     .map(|element| self.eval(element))
                                     .collect::<EvalResult<Vec<_>>>()?;
                Ok(values.into())
            },
            Expr::Dict { entries, .. } => {
                let mut map = BTreeMap::new();
                for (key, value) in entries {
                    let value = self.eval(value)?;
                    map.insert(key.clone(), value);
                }
                Ok(map.into())
            },
            Expr::Function(def) => Ok(self.make_closure(def)),
            Expr::Pair { location, .. } => {
                Err(RuntimeError::type_mismatch("conditional branches used outside of '?:'",
                                                location))
            },
        }
    }

    /// Resolves a name through the scope chain, then the builtin registry.
    fn eval_identifier(&self, name: &str, location: &Location) -> EvalResult<Value> {
        if let Some(value) = scope::lookup(&self.scope, name) {
            return Ok(value);
        }
        if let Some(builtin) = self.registry.lookup(name) {
            return Ok(Value::Function(Rc::new(Callable::Builtin(*builtin))));
        }
        Err(RuntimeError::UnknownVariable { name:     name.to_string(),
                                            location: location.clone(), })
    }

    /// Captures the active scope in a new function value.
    pub(crate) fn make_closure(&self, def: &Rc<FunctionDef>) -> Value {
        Value::Function(Rc::new(Callable::Closure { def:   Rc::clone(def),
                                                    scope: Rc::clone(&self.scope), }))
    }

    /// Counts one step against the configured limit.
    pub(crate) fn tick(&mut self, location: &Location) -> EvalResult<()> {
        self.steps += 1;
        match self.config.step_limit {
            Some(limit) if self.steps > limit => {
                Err(RuntimeError::StepLimitExceeded { limit,
                                                      location: location.clone() })
            },
            _ => Ok(()),
        }
    }
}
