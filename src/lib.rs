//! # cinder
//!
//! cinder is a small, embeddable scripting language with C-like syntax.
//! It tokenizes, parses and runs programs made of expressions, `if`, `while`
//! and `for` statements, and first-class functions with lexical closures,
//! over a dynamically typed value model of numbers, strings, lists and dicts.
//!
//! The host passes variables in and reads them back through a [`Bindings`]
//! map:
//!
//! ```
//! use cinder::{Bindings, interpret_and_execute, interpreter::value::core::Value};
//!
//! let mut bindings = Bindings::new();
//! bindings.insert("a".to_string(), Value::Int(4));
//!
//! let result = interpret_and_execute(Some("b = a++ + 3; b"), &mut bindings).unwrap();
//!
//! assert_eq!(result, Value::Int(7));
//! assert_eq!(bindings["a"], Value::Int(5));
//! assert_eq!(bindings["b"], Value::Int(7));
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::Program,
    config::Config,
    interpreter::{
        evaluator::{
            core::Context,
            function::registry::{Builtin, Registry},
            scope::Scope,
        },
        lexer::tokenize_named,
        output::Output,
        parser::core::parse_with_config,
        value::core::Value,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` enums that represent the
/// syntactic structure of source code as a tree. The AST is built by the
/// parser and walked by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source locations to AST nodes for error reporting.
pub mod ast;
/// Limits for a single run.
pub mod config;
/// Provides unified error types for lexing, parsing and evaluation.
///
/// This module defines all errors that can be raised while running code. It
/// standardizes error reporting and carries the kind of failure, a
/// description and the source location.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches locations to every error.
/// - Links errors raised inside functions to the call that led there.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation and value
/// representations to provide a complete runtime for source code.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion and stack growth.
///
/// # Responsibilities
/// - Convert between `i64`, `usize` and `f64` without silent data loss.
/// - Keep deep recursion in the parser and evaluator off the guard page.
pub mod util;

pub use error::Error;

/// Variables shared between the host and a program.
///
/// They seed the program's global scope, and the global scope's final
/// contents are written back when the run ends.
pub type Bindings = HashMap<String, Value>;

/// A reusable interpreter: limits, builtins and an output sink.
#[derive(Debug, Clone)]
pub struct Interpreter {
    config:   Config,
    output:   Output,
    registry: Registry,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an interpreter with default limits and the standard builtins,
    /// logging to standard output.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an interpreter with the given limits.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self { config,
               output: Output::default(),
               registry: Registry::with_defaults() }
    }

    /// Keeps `log` output in memory instead of printing it.
    #[must_use]
    pub fn capture_output(self) -> Self {
        self.with_output(Output::buffer())
    }

    /// Replaces the output sink.
    #[must_use]
    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Adds a host builtin, returning the one it replaced, if any.
    pub fn register(&mut self, builtin: Builtin) -> Option<Builtin> {
        self.registry.register(builtin)
    }

    /// The configured limits.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Lines captured so far, when output is captured.
    #[must_use]
    pub fn output(&self) -> &[String] {
        self.output.lines()
    }

    /// Removes and returns the captured lines.
    pub fn take_output(&mut self) -> Vec<String> {
        self.output.take()
    }

    /// Runs `source` against `bindings`.
    ///
    /// See [`interpret_and_execute`] for how the result and the bindings are
    /// produced.
    pub fn run(&mut self, source: Option<&str>, bindings: &mut Bindings) -> Result<Value, Error> {
        match source {
            Some(source) if !source.is_empty() => self.execute(source, None, bindings),
            _ => Ok(Value::Null),
        }
    }

    /// Runs `source`, attributing error locations to `file`.
    pub fn run_named(&mut self,
                     source: &str,
                     file: &str,
                     bindings: &mut Bindings)
                     -> Result<Value, Error> {
        self.execute(source, Some(file), bindings)
    }

    /// Tokenizes and parses `source` without running it.
    pub fn parse(&self, source: &str) -> Result<Program, Error> {
        let tokens = tokenize_named(source, None)?;
        Ok(parse_with_config(&tokens, &self.config)?)
    }

    fn execute(&mut self,
               source: &str,
               file: Option<&str>,
               bindings: &mut Bindings)
               -> Result<Value, Error> {
        let tokens = tokenize_named(source, file)?;
        let program = parse_with_config(&tokens, &self.config)?;

        let root = Scope::root(std::mem::take(bindings));
        let result = {
            let mut context =
                Context::new(Rc::clone(&root), &self.registry, &self.config, &mut self.output);
            context.exec_program(&program)
        };

        bindings.extend(root.borrow()
                            .bindings()
                            .map(|(name, value)| (name.clone(), value.clone())));

        match &result {
            Ok(value) => debug!(%value, "run finished"),
            Err(e) => debug!(error = %e, "run failed"),
        }
        Ok(result?)
    }
}

/// Runs a program and returns its result.
///
/// The entries of `bindings` are the program's initial global variables.
/// When the run ends, successfully or with a runtime error, `bindings` holds
/// the final contents of the global scope. A lex or parse error leaves it
/// untouched. A missing or empty source does nothing and returns null.
///
/// The result is the value of a top-level `return`, otherwise the value of
/// the last top-level expression statement, otherwise null.
///
/// # Errors
/// Returns the first lex, parse or runtime error.
///
/// # Examples
/// ```
/// use cinder::{Bindings, Error, interpret_and_execute, interpreter::value::core::Value};
///
/// let mut bindings = Bindings::new();
///
/// let source = "function f(a, b) { return a * b; } x = f(3, 4);";
/// assert_eq!(interpret_and_execute(Some(source), &mut bindings).unwrap(), Value::Int(12));
/// assert_eq!(bindings["x"], Value::Int(12));
///
/// let res = interpret_and_execute(Some("1 / 0"), &mut bindings);
/// assert!(matches!(res, Err(Error::Runtime(_))));
///
/// assert_eq!(interpret_and_execute(None, &mut bindings).unwrap(), Value::Null);
/// ```
pub fn interpret_and_execute(source: Option<&str>,
                             bindings: &mut Bindings)
                             -> Result<Value, Error> {
    Interpreter::new().run(source, bindings)
}

/// Tokenizes and parses `source` with the default limits.
///
/// # Errors
/// Returns the first lex or parse error.
pub fn parse(source: &str) -> Result<Program, Error> {
    Interpreter::new().parse(source)
}
