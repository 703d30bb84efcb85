use crate::{ast::Position, error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Converts a host length or index to a language integer.
///
/// ## Errors
/// Returns `RuntimeError::Overflow` if the value does not fit in an `i64`.
///
/// ## Example
/// ```
/// use soul::{ast::Position, util::num::usize_to_i64_checked};
///
/// assert_eq!(usize_to_i64_checked(42, Position::default()).unwrap(), 42);
/// ```
pub fn usize_to_i64_checked(value: usize, position: Position) -> EvalResult<i64> {
    i64::try_from(value).map_err(|_| RuntimeError::Overflow { position })
}

/// Converts a non-negative language integer to a host `usize`.
///
/// ## Errors
/// Returns `RuntimeError::InvalidArgument` for negative values, and
/// `RuntimeError::Overflow` if the value does not fit the host's `usize`.
///
/// ## Example
/// ```
/// use soul::{ast::Position, error::RuntimeError, util::num::i64_to_usize_checked};
///
/// assert_eq!(i64_to_usize_checked(3, Position::default()).unwrap(), 3);
/// assert!(matches!(i64_to_usize_checked(-1, Position::default()),
///                  Err(RuntimeError::InvalidArgument { .. })));
/// ```
pub fn i64_to_usize_checked(value: i64, position: Position) -> EvalResult<usize> {
    if value < 0 {
        return Err(RuntimeError::InvalidArgument { details: format!("expected a non-negative integer, found {value}"),
                                                   position });
    }

    usize::try_from(value).map_err(|_| RuntimeError::Overflow { position })
}

/// Resolves a possibly negative index against a sequence of `length`
/// elements.
///
/// Negative indices count from the end, so `-1` is the last element.
///
/// ## Errors
/// Returns `RuntimeError::IndexOutOfBounds` if the index falls outside the
/// sequence.
///
/// ## Example
/// ```
/// use soul::{ast::Position, util::num::resolve_index};
///
/// assert_eq!(resolve_index(-1, 3, Position::default()).unwrap(), 2);
/// assert!(resolve_index(3, 3, Position::default()).is_err());
/// ```
pub fn resolve_index(index: i64, length: usize, position: Position) -> EvalResult<usize> {
    let out_of_bounds = || RuntimeError::IndexOutOfBounds { index,
                                                            length,
                                                            position };
    let signed_length = i64::try_from(length).map_err(|_| out_of_bounds())?;
    let resolved = if index < 0 { index + signed_length } else { index };

    if resolved < 0 || resolved >= signed_length {
        return Err(out_of_bounds());
    }

    usize::try_from(resolved).map_err(|_| out_of_bounds())
}
