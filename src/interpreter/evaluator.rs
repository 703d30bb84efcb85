/// Binary operator evaluation logic.
///
/// Handles the execution of all binary operations in expressions: arithmetic,
/// comparisons, membership, short-circuit logic, member access and
/// rebinding.
pub mod binary;

/// Conditional evaluation.
///
/// Implements `if`, `try`/`except`, `match` and `switch`.
pub mod branch;

/// Core evaluation logic and context management.
///
/// Contains the main evaluation engine, the runtime context, the control-flow
/// result type and the interpret/transpile mode switch.
pub mod core;

/// Function evaluation.
///
/// Handles user-defined and built-in function calls, argument checking, and
/// return value computation.
pub mod function;

/// Script inclusion and compilation through `import`.
pub mod import;

/// Evaluation of `while` loops.
pub mod loops;

/// Categories and `init`.
///
/// Builds prototype objects from category bodies and binds `self`.
pub mod object;

/// Utility functions for evaluation.
///
/// Provides helpers and reusable routines shared by evaluation logic.
pub mod utils;
