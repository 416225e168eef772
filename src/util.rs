/// Numeric conversion helpers.
///
/// Conversions between `i64`, `usize`, `u32` and `f64` that fail with a
/// located runtime error instead of wrapping or rounding, plus the index and
/// count checks built on them.
pub mod num;
/// Stack growth guard for deep recursion.
///
/// The parser and the evaluator are recursive. Wrapping each recursive entry
/// point in [`stack::ensure_sufficient_stack`] lets deeply nested but legal
/// programs run without overflowing the native stack.
pub mod stack;
