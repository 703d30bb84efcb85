use crate::ast::Position;

/// Represents all errors that can occur during parsing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Found a token other than the one the grammar requires.
    #[error("Error at {position}: Expected {expected}, found {found}.")]
    UnexpectedToken {
        /// What the parser was looking for.
        expected: String,
        /// The token encountered.
        found:    String,
        /// Where the token starts.
        position: Position,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error at {position}: Unexpected end of input, expected {expected}.")]
    UnexpectedEndOfInput {
        /// What the parser was looking for.
        expected: String,
        /// The position of the end of input.
        position: Position,
    },
    /// A function's return type annotation is not a plain type name.
    #[error("Error at {position}: Invalid return type annotation {found}.")]
    InvalidReturnType {
        /// The rejected annotation.
        found:    String,
        /// Where the annotation starts.
        position: Position,
    },
    /// The left side of `=` is not a variable or an element access.
    #[error("Error at {position}: Cannot assign to {target}.")]
    InvalidAssignmentTarget {
        /// A description of the rejected target.
        target:   String,
        /// Position of the `=`.
        position: Position,
    },
    /// Found extra tokens after the program should have ended.
    #[error("Error at {position}: Extra tokens after program. Check your input: {token}")]
    UnexpectedTrailingTokens {
        /// The first extra token.
        token:    String,
        /// Where the token starts.
        position: Position,
    },
}

impl ParseError {
    /// Whether the error was caused by input that ended too early.
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        matches!(self, Self::UnexpectedEndOfInput { .. })
    }

    /// Returns the position the error points at.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnexpectedToken { position, .. }
            | Self::UnexpectedEndOfInput { position, .. }
            | Self::InvalidReturnType { position, .. }
            | Self::InvalidAssignmentTarget { position, .. }
            | Self::UnexpectedTrailingTokens { position, .. } => *position,
        }
    }
}
