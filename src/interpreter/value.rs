/// Core value types and their behaviour.
///
/// Contains the [`core::Value`] enum, its display form and its equality.
pub mod core;

/// Function values.
///
/// A function is either a native builtin or a user function closed over the
/// scope it was created in.
pub mod callable;
