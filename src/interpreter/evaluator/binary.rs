/// Member access, indexing and rebinding through `.` and `=`.
pub mod access;
/// Integer, string and array arithmetic.
pub mod arithmetic;
/// Equality, ordering and membership.
pub mod comparison;
/// Operator dispatch.
pub mod core;
/// Short-circuit `and` and `or`.
pub mod logic;
