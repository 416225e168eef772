/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator walks the syntax tree, evaluates expressions, runs
/// statements, manages the scope chain and calls builtin and user functions.
/// It is the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates expressions and executes statements, including control flow.
/// - Resolves names through lexical scopes and the builtin registry.
/// - Reports runtime errors such as division by zero or invalid operations.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// strings, identifiers, operators, delimiters, and keywords. This is the
/// first stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with type and source
///   location.
/// - Skips whitespace and comments.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The operator table.
///
/// Maps tokens to operators by position and records the precedence and
/// associativity the parser resolves them with.
pub mod operator;
/// Where the `log` builtin writes to.
pub mod output;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of expressions and
/// statements. This enables later phases to execute user code.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements).
/// - Validates grammar, reporting errors with location info.
/// - Bounds nesting so hostile input fails cleanly.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the values a program computes with: null, booleans,
/// integers, floats, strings, lists, dicts and functions.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported value variants.
/// - Implements display, equality and type checks.
/// - Describes builtin and user functions as callable values.
pub mod value;
