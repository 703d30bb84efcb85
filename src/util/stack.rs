/// Minimum stack space kept free before recursing further.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, first moving to a fresh stack segment if less than the red zone
/// is left.
///
/// Wraps the recursive entry points of the parser, the evaluator and the
/// transpiler, so deeply nested programs grow the host stack instead of
/// overflowing it. Unbounded user recursion is still stopped by the call depth
/// limit in `Config`.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
