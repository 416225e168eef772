/// Calling functions.
///
/// Evaluates call expressions, checks arguments against builtin signatures,
/// and runs closures in a fresh scope chained to their defining scope.
pub mod core;

/// The builtin function registry.
///
/// Defines the signature records for native functions and the process-wide
/// default table.
pub mod registry;

/// Builtin function implementations.
///
/// String conversion, length, substring and environment lookup.
pub mod builtin;

/// The `log` builtin.
///
/// Writes its arguments to the interpreter output.
pub mod log;
