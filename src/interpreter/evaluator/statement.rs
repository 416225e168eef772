use tracing::{debug, instrument};

use crate::{
    ast::{Expr, Program, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        lexer::Location,
        value::core::Value,
    },
    util::stack::ensure_sufficient_stack,
};

/// How a statement finished.
///
/// Anything other than `Normal` stops the enclosing statement list and is
/// handed upward until a loop or function absorbs it.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Continue with the next statement.
    Normal,
    /// Leave the innermost loop.
    Break(Location),
    /// Skip to the next iteration of the innermost loop.
    Continue(Location),
    /// Leave the current function with a value.
    Return(Value),
}

impl Context<'_> {
    /// Runs a whole program and returns its result.
    ///
    /// The result is the value of a top-level `return`, otherwise the value
    /// of the last top-level expression statement that ran, otherwise null.
    ///
    /// # Errors
    /// Any runtime error, and `BreakOutsideLoop` or `ContinueOutsideLoop` if
    /// those statements escape to the top level.
    #[instrument(level = "debug", skip_all)]
    pub fn exec_program(&mut self, program: &Program) -> EvalResult<Value> {
        let mut last = Value::Null;

        for statement in &program.statements {
            if let Statement::Expression(expr) = statement {
                self.tick(expr.location())?;
                last = self.eval(expr)?;
                continue;
            }

            match self.exec_statement(statement)? {
                Flow::Normal => {},
                Flow::Return(value) => return Ok(value),
                Flow::Break(location) => return Err(RuntimeError::BreakOutsideLoop { location }),
                Flow::Continue(location) => {
                    return Err(RuntimeError::ContinueOutsideLoop { location });
                },
            }
        }

        debug!(steps = self.steps, "program finished");
        Ok(last)
    }

    /// Runs a statement list, stopping at the first statement that does not
    /// finish normally.
    pub fn exec_block(&mut self, statements: &[Statement]) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| {
            for statement in statements {
                let flow = self.exec_statement(statement)?;
                if flow != Flow::Normal {
                    return Ok(flow);
                }
            }
            Ok(Flow::Normal)
        })
    }

    /// Runs one statement.
    pub fn exec_statement(&mut self, statement: &Statement) -> EvalResult<Flow> {
        self.tick(statement.location())?;

        match statement {
            Statement::Expression(expr) => {
                self.eval(expr)?;
                Ok(Flow::Normal)
            },
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                if self.eval_condition(condition)? {
                    self.exec_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_block(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            },
            Statement::While { condition,
                               body,
                               location, } => {
                self.exec_loop(None, Some(condition), None, body, location)
            },
            Statement::For { init,
                             condition,
                             step,
                             body,
                             location, } => self.exec_loop(init.as_ref(),
                                                           condition.as_ref(),
                                                           step.as_ref(),
                                                           body,
                                                           location),
            Statement::Break { location } => Ok(Flow::Break(location.clone())),
            Statement::Continue { location } => Ok(Flow::Continue(location.clone())),
            Statement::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            },
            Statement::Function(def) => {
                let closure = self.make_closure(def);
                if let Some(name) = &def.name {
                    self.scope.borrow_mut().define(name.clone(), closure);
                }
                Ok(Flow::Normal)
            },
        }
    }

    /// Shared driver for `while` and `for`.
    ///
    /// `continue` still runs the step; `break` leaves the loop; `return` is
    /// passed upward. Every iteration counts as a step, so even an empty body
    /// is bounded by the step limit.
    fn exec_loop(&mut self,
                 init: Option<&Expr>,
                 condition: Option<&Expr>,
                 step: Option<&Expr>,
                 body: &[Statement],
                 location: &Location)
                 -> EvalResult<Flow> {
        if let Some(init) = init {
            self.eval(init)?;
        }

        loop {
            self.tick(location)?;

            if let Some(condition) = condition
               && !self.eval_condition(condition)?
            {
                break;
            }

            match self.exec_block(body)? {
                Flow::Break(_) => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue(_) => {},
            }

            if let Some(step) = step {
                self.eval(step)?;
            }
        }

        Ok(Flow::Normal)
    }

    /// Evaluates a condition, which must be a boolean.
    fn eval_condition(&mut self, condition: &Expr) -> EvalResult<bool> {
        self.eval(condition)?.as_bool(condition.location())
    }
}
