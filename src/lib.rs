//! # soul
//!
//! soul is a small, dynamically typed scripting language written in Rust.
//! Programs are lexed, parsed into one shared syntax tree, and then either
//! interpreted directly or transpiled to Nim source. Parts of a program marked
//! with `$` are evaluated while transpiling and their values spliced into the
//! output.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use crate::{
    config::Config,
    error::Error,
    interpreter::{
        evaluator::core::{Context, Mode, Output},
        value::core::Value,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Node` enum and related types that represent the
/// syntactic structure of a program as a tree. The AST is built by the parser
/// and traversed by both the evaluator and the transpiler.
///
/// # Responsibilities
/// - Defines node types for all language constructs.
/// - Attaches source positions to every node for error reporting.
pub mod ast;
/// Interpreter settings: file extensions, search directory, indentation,
/// recursion limit and toolchain command.
pub mod config;
/// Provides unified error types for lexing, parsing and evaluation.
///
/// This module defines all errors that can be raised while processing a
/// program. Every error carries the position it refers to and renders as a
/// message suitable for the user.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches row and column numbers for context.
/// - Classifies runtime errors for `try`/`except` filters.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, transpilation and
/// value representations.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, transpiler
///   and value types.
/// - Provides entry points for parsing, evaluating and rendering user code.
pub mod interpreter;
/// The interactive read-eval loop.
pub mod repl;
/// Invocation of the external Nim toolchain on generated files.
pub mod toolchain;
/// General utilities for safe numeric conversion and stack growth.
pub mod util;

pub use interpreter::parser::core::parse_source;

/// Parses `source` and runs it against `context` in the given mode.
///
/// Lexical diagnostics are logged as warnings; an unterminated literal also
/// makes the parse fail, so nothing malformed is ever executed. Output
/// written by the program is flushed before returning.
///
/// # Errors
/// Returns the parse error, or the runtime error that stopped the program.
///
/// # Example
/// ```
/// use soul::{
///     config::Config,
///     interpreter::{
///         evaluator::core::{Context, Mode, Output},
///         value::core::Value,
///     },
///     process_source,
/// };
///
/// let mut context = Context::with_io(Config::default(), Box::new(std::io::empty()), Box::new(std::io::sink()));
///
/// let result = process_source(&mut context, "var x = 20; x + 22", Mode::Interpret).unwrap();
/// assert!(matches!(result, Output::Value(Value::Integer(42))));
///
/// let result = process_source(&mut context, "print x", Mode::Transpile).unwrap();
/// assert!(matches!(result, Output::Text(text) if text == "echo x"));
/// ```
pub fn process_source(context: &mut Context, source: &str, mode: Mode) -> Result<Output, Error> {
    let (program, diagnostics) = parse_source(source);
    for diagnostic in &diagnostics {
        tracing::warn!(%diagnostic, "lexical problem in source");
    }

    let result = context.process(&program?, mode);
    context.flush().map_err(|source| Error::Io { path: PathBuf::from("<stdout>"),
                                                 source })?;
    Ok(result?)
}

/// Runs a program with standard input and output and returns the value of
/// its last statement.
///
/// # Errors
/// Returns an error if parsing or evaluation fails, including an `exit`
/// request.
pub fn run_source(source: &str, config: Config) -> Result<Value, Error> {
    let mut context = Context::new(config);
    match process_source(&mut context, source, Mode::Interpret)? {
        Output::Value(value) => Ok(value),
        Output::Text(text) => Ok(Value::Str(text)),
    }
}

/// Transpiles a program to Nim source.
///
/// Compile-time code runs against a fresh context using standard input and
/// output.
///
/// # Errors
/// Returns an error if parsing fails or compile-time evaluation fails.
pub fn transpile_source(source: &str, config: Config) -> Result<String, Error> {
    let mut context = Context::new(config);
    match process_source(&mut context, source, Mode::Transpile)? {
        Output::Text(text) => Ok(text),
        Output::Value(value) => Ok(value.to_string()),
    }
}

/// Outcome of transpiling a script file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    /// The generated file.
    pub target:  PathBuf,
    /// Wall time spent reading, rendering and writing.
    pub elapsed: Duration,
}

impl fmt::Display for CompileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Compiled in: {} seconds", self.elapsed.as_secs_f64())
    }
}

/// Transpiles a script file and writes the result next to it, with the
/// configured target extension.
///
/// # Errors
/// Returns `Error::Io` if the script cannot be read or the target cannot be
/// written, and any error from [`transpile_source`].
pub fn transpile_file(path: &Path, config: Config) -> Result<CompileReport, Error> {
    let start = Instant::now();
    let source = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(),
                                                                       source })?;

    let target = config.target_path(path);
    let mut text = transpile_source(&source, config)?;
    if !text.ends_with('\n') {
        text.push('\n');
    }

    fs::write(&target, text).map_err(|source| Error::Io { path: target.clone(),
                                                          source })?;

    let report = CompileReport { target,
                                 elapsed: start.elapsed() };
    tracing::info!(target = %report.target.display(), elapsed = ?report.elapsed, "compiled script");
    Ok(report)
}
