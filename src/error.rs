use std::path::PathBuf;

/// Lexical diagnostics.
///
/// The lexer never fails hard. Malformed input such as an unterminated string
/// becomes an `Unknown` token plus a `LexError` that callers may report or use
/// to decide that more input is needed.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the AST: unexpected
/// tokens, premature end of input, invalid annotations and assignment targets.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation and
/// transpilation. Each kind has a stable name that `try`/`except` filters match
/// against.
pub mod runtime_error;

pub use lex_error::{LexError, LexErrorKind};
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any failure surfaced by the library's entry points.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The source text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Evaluation or rendering failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// A script or generated file could not be read or written.
    #[error("Failed to access '{}': {source}", path.display())]
    Io {
        /// The file involved.
        path:   PathBuf,
        /// The underlying failure.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns the requested process exit code if this error is an `exit`
    /// request.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Runtime(RuntimeError::Exit { code }) => Some(*code),
            _ => None,
        }
    }
}
