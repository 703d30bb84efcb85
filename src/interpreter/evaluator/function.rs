/// Array and dict builtins.
///
/// `append`, `insert`, `remove`, `pop`, `index`, `clear`, `update` and `len`.
pub mod array;
/// The builtin registry.
///
/// Declares the builtin table, arity checking and the `Registry` consulted
/// when a name has no user binding.
pub mod builtin;
/// Calls of user functions, categories and builtins.
pub mod core;
/// File builtins: `open`, `read`, `write` and `close`.
pub mod file;
/// String inspection and conversion builtins.
///
/// `split`, the `is_*` character class tests, `str`, `int` and `type`.
pub mod string;
/// Process and environment builtins: `enum`, `dict`, `env` and `exit`.
pub mod system;
