use thiserror::Error;

/// Lexical errors.
///
/// Raised by the tokenizer when the source text contains a character that
/// starts no token, or a digit run that is not a valid number.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the syntax tree:
/// unexpected tokens, premature end of input, malformed function headers and
/// runaway nesting.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during execution. Runtime
/// errors include unknown variables, type mismatches, division by zero,
/// invalid assignment targets and exceeded limits.
pub mod runtime_error;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any failure produced by one run of the interpreter.
///
/// Every phase of the pipeline has its own error type; this enum lets the
/// host handle them uniformly while still matching on the phase when needed.
#[derive(Debug, Error)]
pub enum Error {
    /// The source text could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The token stream is not a valid program.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The program failed while running.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
