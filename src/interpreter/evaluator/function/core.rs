use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::{Expr, FunctionDef},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            scope::{Scope, ScopeRef},
            statement::Flow,
        },
        lexer::Location,
        value::{callable::Callable, core::Value},
    },
};

impl Context<'_> {
    /// Evaluates a call expression.
    ///
    /// The callee is evaluated first, then the positional arguments from left
    /// to right, then the named arguments in the order written.
    pub(crate) fn eval_call(&mut self,
                            callee: &Expr,
                            args: &[Expr],
                            named: &[(String, Expr)],
                            location: &Location)
                            -> EvalResult<Value> {
        let function = self.eval(callee)?;
        let args = args.iter()
                       .map(|arg| self.eval(arg))
                       .collect::<EvalResult<Vec<_>>>()?;
        let mut named_values = Vec::with_capacity(named.len());
        for (name, arg) in named {
            named_values.push((name.clone(), self.eval(arg)?));
        }

        self.invoke(&function, args, named_values, location)
    }

    /// Calls a function value with already evaluated arguments.
    ///
    /// # Errors
    /// - `NotCallable` if `function` is not a function.
    /// - `ArgumentCountMismatch`, `TypeMismatch` or `InvalidArgument` if the
    ///   arguments do not fit the function.
    /// - `CallDepthExceeded` past the configured call depth.
    /// - Any error raised by the body of a user function, wrapped in
    ///   `InFunction`.
    pub fn invoke(&mut self,
                  function: &Value,
                  args: Vec<Value>,
                  named: Vec<(String, Value)>,
                  location: &Location)
                  -> EvalResult<Value> {
        let Value::Function(callable) = function else {
            return Err(RuntimeError::NotCallable { found:    function.type_name().to_string(),
                                                   location: location.clone(), });
        };

        trace!(function = callable.name(), args = args.len(), named = named.len(), "call");

        match callable.as_ref() {
            Callable::Builtin(builtin) => {
                if let Some((name, _)) = named.first() {
                    return Err(RuntimeError::invalid_argument(format!("builtin '{}' takes no \
                                                                       named arguments, found \
                                                                       '{name}'",
                                                                      builtin.name),
                                                              location));
                }
                builtin.check_arguments(&args, location)?;
                (builtin.func)(&args, &mut *self.output, location)
            },
            Callable::Closure { def, scope } => {
                self.call_closure(def, scope, function, args, named, location)
            },
        }
    }

    /// Runs a user function in a fresh scope chained to its defining scope.
    fn call_closure(&mut self,
                    def: &Rc<FunctionDef>,
                    defining_scope: &ScopeRef,
                    function: &Value,
                    args: Vec<Value>,
                    named: Vec<(String, Value)>,
                    location: &Location)
                    -> EvalResult<Value> {
        if self.call_depth >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded { limit:    self.config.max_call_depth,
                                                         location: location.clone(), });
        }

        let call_scope = Scope::child(defining_scope);
        {
            let mut frame = call_scope.borrow_mut();
            if let Some(name) = &def.name {
                frame.define(name.clone(), function.clone());
            }
            bind_arguments(&mut frame, def, args, named, location)?;
        }

        let caller_scope = std::mem::replace(&mut self.scope, call_scope);
        self.call_depth += 1;
        let flow = self.exec_block(&def.body);
        self.call_depth -= 1;
        self.scope = caller_scope;

        let result = match flow {
            Ok(Flow::Return(value)) => Ok(value),
            Ok(Flow::Normal) => Ok(Value::Null),
            Ok(Flow::Break(location)) => Err(RuntimeError::BreakOutsideLoop { location }),
            Ok(Flow::Continue(location)) => Err(RuntimeError::ContinueOutsideLoop { location }),
            Err(e) => Err(e),
        };

        result.map_err(|source| RuntimeError::InFunction { name:     def.display_name()
                                                                        .to_string(),
                                                           location: location.clone(),
                                                           source:   Box::new(source), })
    }
}

/// Binds positional arguments in order, then named arguments by name.
///
/// Every parameter must end up bound exactly once.
fn bind_arguments(frame: &mut Scope,
                  def: &FunctionDef,
                  args: Vec<Value>,
                  named: Vec<(String, Value)>,
                  location: &Location)
                  -> EvalResult<()> {
    let name = def.display_name();
    let expected = def.params.len().to_string();
    let arity_error = |found| RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                                    expected: expected.clone(),
                                                                    found,
                                                                    location: location.clone() };

    let supplied = args.len() + named.len();
    if args.len() > def.params.len() {
        return Err(arity_error(supplied));
    }

    let mut bound = vec![false; def.params.len()];
    for ((param, value), slot) in def.params.iter().zip(args).zip(bound.iter_mut()) {
        frame.define(param.clone(), value);
        *slot = true;
    }

    for (arg_name, value) in named {
        let Some(position) = def.params.iter().position(|param| *param == arg_name) else {
            return Err(RuntimeError::invalid_argument(format!("'{name}' has no parameter \
                                                               named '{arg_name}'"),
                                                      location));
        };
        if bound[position] {
            return Err(RuntimeError::invalid_argument(format!("parameter '{arg_name}' of \
                                                               '{name}' is bound twice"),
                                                      location));
        }
        bound[position] = true;
        frame.define(arg_name, value);
    }

    if bound.contains(&false) {
        return Err(arity_error(supplied));
    }
    Ok(())
}
