/// Integer conversion helpers.
///
/// Checked conversions between the language's `i64` integers and host
/// `usize` lengths and indices. Every helper reports failure as a
/// `RuntimeError` carrying the position of the offending operation.
pub mod num;
/// Host stack growth for deep recursion.
pub mod stack;
