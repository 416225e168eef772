/// Dispatch of binary expressions to the specialized handlers.
pub mod core;
/// Numeric arithmetic and bitwise operators, with int to float promotion.
pub mod scalar;
/// Concatenation and repetition of strings and lists.
pub mod sequence;
/// Ordering comparisons.
pub mod comparison;
/// Logical `&&` and `||`.
pub mod logic;
