/// Parser state and cursor handling.
///
/// Defines [`core::Parser`], which walks the token slice, tracks nesting
/// depth, and reports located errors.
pub mod core;
/// The shunting-yard expression parser.
///
/// Turns a run of tokens into one expression tree, honoring precedence and
/// associativity through an explicit operator stack.
///
/// # Responsibilities
/// - Alternates between wanting an operand and having one.
/// - Builds calls, subscripts, member accesses and conditionals.
/// - Stops at the terminator requested by the caller.
pub mod expression;
/// Statement parsing.
///
/// Recursive-descent parsing of control-flow statements, function
/// declarations and expression statements.
pub mod statement;
/// Block parsing.
///
/// Statement lists under the three block policies: a single statement or a
/// braced block, a mandatory braced block, and a whole program.
pub mod block;
/// Shared parser helpers, such as completion modes and comma-separated lists.
pub mod utils;
