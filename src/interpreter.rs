/// The environment module holds variable bindings.
///
/// Bindings live in copy-on-write frames chained to their parents, so a
/// function can capture the scope it is defined in without copying it.
pub mod environment;
/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and statements,
/// manages variable state, and produces values. Early exits from functions
/// and loops travel back up the tree as an explicit `Flow` result rather than
/// as errors.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles variables, functions, categories, imports and control flow.
/// - Reports runtime errors such as division by zero or arity mismatches.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens, each
/// corresponding to a meaningful language element such as a number,
/// identifier, operator, delimiter or keyword. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source location.
/// - Handles integer, string and comment literals, identifiers and operators.
/// - Records diagnostics for malformed input instead of failing.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of the program.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes.
/// - Validates grammar, reporting errors with location info.
/// - Resolves operator precedence by tier.
pub mod parser;
/// The transpiler module renders the AST as Nim source.
///
/// It walks the same tree as the evaluator, evaluating only the parts marked
/// for compile time.
pub mod transpiler;
/// The value module defines the runtime data types for evaluation.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported value variants.
/// - Implements truthiness, display and type names.
/// - Wraps user callables and open files.
pub mod value;
