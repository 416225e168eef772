use crate::{error::RuntimeError, interpreter::lexer::Location};

/// Largest integer magnitude exactly representable as an `f64` (`2^53`).
pub const MAX_SAFE_INT: u64 = 1 << 53;

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Overflow` if the magnitude exceeds [`MAX_SAFE_INT`].
///
/// ## Example
/// ```
/// use cinder::{
///     interpreter::lexer::Location,
///     util::num::{MAX_SAFE_INT, i64_to_f64_checked},
/// };
///
/// let at = Location::default();
/// assert_eq!(i64_to_f64_checked(42, &at).unwrap(), 42.0);
///
/// let big = MAX_SAFE_INT as i64 + 1;
/// assert!(i64_to_f64_checked(big, &at).is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn i64_to_f64_checked(value: i64, location: &Location) -> Result<f64, RuntimeError> {
    if value.unsigned_abs() > MAX_SAFE_INT {
        return Err(RuntimeError::Overflow { location: location.clone() });
    }
    Ok(value as f64)
}

/// Converts a length or count to `i64`.
///
/// ## Errors
/// Returns `Overflow` if the value does not fit.
pub fn usize_to_i64_checked(value: usize, location: &Location) -> Result<i64, RuntimeError> {
    i64::try_from(value).map_err(|_| RuntimeError::Overflow { location: location.clone() })
}

/// Resolves an index against a container of length `len`.
///
/// ## Errors
/// Returns `IndexOutOfBounds` for negative indices and indices at or past
/// `len`.
///
/// ## Example
/// ```
/// use cinder::{interpreter::lexer::Location, util::num::checked_index};
///
/// let at = Location::default();
/// assert_eq!(checked_index(2, 3, &at).unwrap(), 2);
/// assert!(checked_index(3, 3, &at).is_err());
/// assert!(checked_index(-1, 3, &at).is_err());
/// ```
pub fn checked_index(index: i64, len: usize, location: &Location) -> Result<usize, RuntimeError> {
    usize::try_from(index).ok()
                          .filter(|&i| i < len)
                          .ok_or_else(|| RuntimeError::IndexOutOfBounds { index,
                                                                          len,
                                                                          location:
                                                                              location.clone() })
}

/// Converts a non-negative count, such as a repetition factor or a
/// substring bound, to `usize`.
///
/// ## Errors
/// Returns `InvalidArgument` naming `what` if the value is negative.
pub fn non_negative(value: i64, what: &str, location: &Location) -> Result<usize, RuntimeError> {
    usize::try_from(value).map_err(|_| {
                              RuntimeError::invalid_argument(format!("{what} must not be \
                                                                      negative, found {value}"),
                                                             location)
                          })
}

/// Converts a shift amount to `u32`, accepting only `0..64`.
///
/// ## Errors
/// Returns `InvalidArgument` for any amount outside that range.
pub fn shift_amount(value: i64, location: &Location) -> Result<u32, RuntimeError> {
    u32::try_from(value).ok().filter(|&v| v < 64).ok_or_else(|| {
        RuntimeError::invalid_argument(format!("shift amount {value} is outside 0..64"), location)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_amount_bounds() {
        let at = Location::default();

        assert_eq!(shift_amount(0, &at).unwrap(), 0);
        assert_eq!(shift_amount(63, &at).unwrap(), 63);
        assert!(shift_amount(64, &at).is_err());
        assert!(shift_amount(-1, &at).is_err());
    }

    #[test]
    fn negative_counts_are_rejected() {
        let at = Location::default();

        assert_eq!(non_negative(5, "count", &at).unwrap(), 5);
        assert!(matches!(non_negative(-2, "count", &at),
                         Err(RuntimeError::InvalidArgument { .. })));
    }
}
