use crate::{ast::Position, error::ParseError};

/// Represents all errors that can occur during evaluation and rendering.
#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
    /// Tried to use an undefined variable.
    #[error("Error at {position}: Unknown variable '{name}'.")]
    UnknownVariable {
        /// The name of the variable.
        name:     String,
        /// Where the variable was referenced.
        position: Position,
    },
    /// The wrong number of arguments was supplied to a callable.
    #[error("Error at {position}: Function '{name}' expects {expected} argument(s), but {found} were given.")]
    ArgumentCountMismatch {
        /// The callable's name.
        name:     String,
        /// The accepted argument count(s).
        expected: String,
        /// The number of arguments supplied.
        found:    usize,
        /// Position of the call.
        position: Position,
    },
    /// Called a value that is not a function.
    #[error("Error at {position}: Value '{name}' of type {type_name} is not callable.")]
    NotCallable {
        /// The rendered value.
        name:      String,
        /// The value's type name.
        type_name: &'static str,
        /// Position of the call.
        position:  Position,
    },
    /// A function returned a value of the wrong declared type.
    #[error("Error at {position}: Function '{function}' must return {expected}, but returned {found}.")]
    TypeReturn {
        /// The function's name.
        function: String,
        /// The declared return type.
        expected: String,
        /// The type actually returned.
        found:    String,
        /// Position of the `return`.
        position: Position,
    },
    /// An element of a typed array has the wrong type.
    #[error("Error at {position}: Array of {declared} cannot hold a value of type {found}.")]
    ArrayType {
        /// The declared element type.
        declared: String,
        /// The offending element's type.
        found:    String,
        /// Position of the array literal.
        position: Position,
    },
    /// A value had an unexpected or incompatible type.
    #[error("Error at {position}: Type error: {details}.")]
    TypeError {
        /// Details about the type mismatch.
        details:  String,
        /// Where the mismatch was detected.
        position: Position,
    },
    /// An argument was invalid or out of range.
    #[error("Error at {position}: Invalid argument: {details}.")]
    InvalidArgument {
        /// Details about why the argument is invalid.
        details:  String,
        /// Position of the call.
        position: Position,
    },
    /// Attempted division by zero.
    #[error("Error at {position}: Division by zero.")]
    DivisionByZero {
        /// Position of the operator.
        position: Position,
    },
    /// Arithmetic operation overflowed.
    #[error("Error at {position}: Integer overflow while trying to compute result.")]
    Overflow {
        /// Position of the operator.
        position: Position,
    },
    /// Tried to access an element outside the sequence.
    #[error("Error at {position}: Index {index} out of bounds for length {length}.")]
    IndexOutOfBounds {
        /// The requested index.
        index:    i64,
        /// The sequence length.
        length:   usize,
        /// Position of the access.
        position: Position,
    },
    /// A dict has no entry for the requested key.
    #[error("Error at {position}: Unknown key '{key}'.")]
    UnknownKey {
        /// The missing key.
        key:      String,
        /// Position of the access.
        position: Position,
    },
    /// An assertion failed during execution.
    #[error("Error at {position}: Assertion failed.")]
    AssertionFailed {
        /// Position of the `assert`.
        position: Position,
    },
    /// A script raised an error with `raise`.
    #[error("Error at {position}: {message}")]
    Raised {
        /// The raised value's text.
        message:  String,
        /// Position of the `raise`.
        position: Position,
    },
    /// `return` escaped the top level.
    #[error("Error at {position}: 'return' outside function.")]
    ReturnOutsideFunction {
        /// Position of the `return`.
        position: Position,
    },
    /// `break` escaped a function body or the top level.
    #[error("Error at {position}: 'break' outside loop.")]
    BreakOutsideLoop {
        /// Position of the `break`.
        position: Position,
    },
    /// Too many nested calls.
    #[error("Error at {position}: Stack exhausted after {depth} nested calls.")]
    StackExhausted {
        /// The depth reached.
        depth:    usize,
        /// Position of the call that exceeded the limit.
        position: Position,
    },
    /// An imported script could not be parsed.
    #[error("Error at {position}: Failed to import '{file}': {source}")]
    Import {
        /// The imported script.
        file:     String,
        /// The parse failure inside it.
        #[source]
        source:   ParseError,
        /// Position of the `import`.
        position: Position,
    },
    /// Reading or writing a file or stream failed.
    #[error("Error at {position}: I/O failure on '{path}': {source}")]
    Io {
        /// The file or stream involved.
        path:     String,
        /// The underlying failure.
        #[source]
        source:   std::io::Error,
        /// Position of the operation.
        position: Position,
    },
    /// The script asked to terminate.
    #[error("Exit requested with code {code}.")]
    Exit {
        /// The requested process exit code.
        code: i32,
    },
}

impl RuntimeError {
    /// Returns the name `except` filters match against.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::UnknownVariable { .. } => "NameError",
            Self::ArgumentCountMismatch { .. } | Self::NotCallable { .. } => "FunctionCallError",
            Self::TypeReturn { .. } => "TypeReturnError",
            Self::ArrayType { .. } => "ArrayTypeError",
            Self::TypeError { .. } => "TypeError",
            Self::InvalidArgument { .. } => "ValueError",
            Self::DivisionByZero { .. } => "ZeroDivisionError",
            Self::Overflow { .. } => "OverflowError",
            Self::IndexOutOfBounds { .. } => "IndexError",
            Self::UnknownKey { .. } => "KeyError",
            Self::AssertionFailed { .. } => "AssertionError",
            Self::Raised { .. } => "Exception",
            Self::ReturnOutsideFunction { .. } | Self::BreakOutsideLoop { .. } => "SyntaxError",
            Self::StackExhausted { .. } => "RecursionError",
            Self::Import { .. } => "ImportError",
            Self::Io { .. } => "IOError",
            Self::Exit { .. } => "Exit",
        }
    }

    /// Whether `try`/`except` may handle this error. Exit requests always
    /// propagate.
    #[must_use]
    pub const fn is_catchable(&self) -> bool {
        !matches!(self, Self::Exit { .. })
    }

    /// Whether an `except` filter names this error, either by kind or, for
    /// raised errors, by the raised text.
    #[must_use]
    pub fn matches_filter(&self, filter: &str) -> bool {
        if self.kind_name() == filter {
            return true;
        }
        matches!(self, Self::Raised { message, .. } if message == filter)
    }
}
