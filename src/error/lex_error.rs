use crate::ast::Position;

/// A recoverable problem found while tokenizing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Warning at {position}: {kind}")]
pub struct LexError {
    /// What went wrong.
    pub kind:     LexErrorKind,
    /// Where the offending literal starts.
    pub position: Position,
}

/// The kinds of lexical diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A `"` or `'` string reached the end of input.
    UnterminatedString,
    /// A `|` comment reached the end of input.
    UnterminatedComment,
    /// An integer literal does not fit in 64 bits.
    IntegerTooLarge(String),
}

impl LexError {
    /// Whether the diagnostic means the input stopped inside a literal, so more
    /// input could complete it.
    #[must_use]
    pub const fn is_unterminated(&self) -> bool {
        matches!(self.kind,
                 LexErrorKind::UnterminatedString | LexErrorKind::UnterminatedComment)
    }
}

impl std::fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedString => write!(f, "Missing end of string delimiter!"),
            Self::UnterminatedComment => write!(f, "Missing end of comment delimiter '|'."),
            Self::IntegerTooLarge(literal) => {
                write!(f, "Integer literal {literal} is too large.")
            },
        }
    }
}
