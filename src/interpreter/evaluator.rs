/// Core evaluation logic and context management.
///
/// Contains the runtime [`core::Context`], expression dispatch and name
/// resolution.
pub mod core;

/// The lexical scope chain.
///
/// Scopes hold variable bindings and link to the scope a function was
/// defined in, which is what makes closures work.
pub mod scope;

/// Unary operator evaluation logic.
///
/// Implements negation, logical and bitwise not, and the increment and
/// decrement forms.
pub mod unary;

/// Binary operator evaluation logic.
///
/// Handles arithmetic, bitwise, comparison, equality and logical operators,
/// plus string and list concatenation and repetition.
pub mod binary;

/// Assignment.
///
/// Resolves assignment targets to places and implements plain assignment,
/// compound assignment and increment through one modify-and-store routine.
pub mod assign;

/// Read-only subscript and member access.
pub mod access;

/// Statement execution.
///
/// Runs statement lists, loops and branches, and propagates `break`,
/// `continue` and `return` as a [`statement::Flow`] value.
pub mod statement;

/// Function evaluation.
///
/// Handles user-defined and built-in function calls, argument checking, and
/// return value computation.
pub mod function;
