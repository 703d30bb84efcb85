/// User callables.
///
/// Defines `Closure`, a function or category definition paired with the
/// environment snapshot it captured.
pub mod callable;

/// The runtime value type.
///
/// Declares the `Value` enum with its conversions, truthiness, equality and
/// display rules.
pub mod core;

/// File handles returned by `open`.
pub mod file;
