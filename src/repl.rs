use crate::{
    error::Error,
    interpreter::{evaluator::core::Context, parser::core::parse_source, value::core::Value},
};

/// Prompt shown when a new statement is expected.
pub const PROMPT: &str = ">>> ";
/// Prompt shown while an unfinished statement is being continued.
pub const CONTINUATION_PROMPT: &str = "... ";

/// What happened to a line fed to the [`Repl`].
#[derive(Debug)]
pub enum ReplEvent {
    /// The input so far is an unfinished statement; another line is needed.
    Incomplete,
    /// The buffered input ran to completion.
    Evaluated(Value),
    /// The input was malformed or failed at runtime. Bindings made before the
    /// failure are kept.
    Failed(Error),
}

/// A line-oriented read-eval loop over one evaluation context.
///
/// Lines are buffered until they form a complete program, so a block or a
/// string literal may span several lines. Input that ends inside an open
/// block or an unterminated literal asks for more; any other syntax error
/// discards the buffer.
///
/// # Example
/// ```
/// use soul::{
///     config::Config,
///     interpreter::{evaluator::core::Context, value::core::Value},
///     repl::{Repl, ReplEvent},
/// };
///
/// let context = Context::with_io(Config::default(), Box::new(std::io::empty()), Box::new(std::io::sink()));
/// let mut repl = Repl::new(context);
///
/// assert!(matches!(repl.feed("func twice(x) {"), ReplEvent::Incomplete));
/// assert!(matches!(repl.feed("x * 2 }"), ReplEvent::Evaluated(_)));
/// assert!(matches!(repl.feed("twice(21)"), ReplEvent::Evaluated(Value::Integer(42))));
/// ```
pub struct Repl {
    context: Context,
    buffer:  String,
}

impl Repl {
    #[must_use]
    pub const fn new(context: Context) -> Self {
        Self { context,
               buffer: String::new() }
    }

    /// Returns the prompt for the next line.
    #[must_use]
    pub fn prompt(&self) -> &'static str {
        if self.buffer.is_empty() { PROMPT } else { CONTINUATION_PROMPT }
    }

    /// Whether an unfinished statement is buffered.
    #[must_use]
    pub fn is_continuing(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Shows the current prompt and reads the next line from the context's
    /// input. Returns `None` at end of input.
    pub fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let prompt = self.prompt();
        self.context.prompt_line(prompt)
    }

    /// Feeds one line of input.
    ///
    /// # Parameters
    /// - `line`: The line, with or without its line terminator.
    ///
    /// # Returns
    /// Whether the buffered input is still incomplete, and otherwise its
    /// value or the error it produced.
    pub fn feed(&mut self, line: &str) -> ReplEvent {
        self.buffer.push_str(line.trim_end_matches(['\n', '\r']));
        self.buffer.push('\n');

        let (program, diagnostics) = parse_source(&self.buffer);

        if diagnostics.iter().any(|diagnostic| diagnostic.is_unterminated()) {
            tracing::debug!("unterminated literal, reading another line");
            return ReplEvent::Incomplete;
        }

        let program = match program {
            Ok(program) => program,
            Err(error) if error.is_incomplete() => {
                tracing::debug!(%error, "incomplete input, reading another line");
                return ReplEvent::Incomplete;
            },
            Err(error) => {
                self.buffer.clear();
                return ReplEvent::Failed(error.into());
            },
        };

        for diagnostic in &diagnostics {
            tracing::warn!(%diagnostic, "lexical problem in input");
        }

        self.buffer.clear();
        let result = self.context.run(&program);
        if let Err(error) = self.context.flush() {
            tracing::warn!(%error, "failed to flush output");
        }

        match result {
            Ok(value) => ReplEvent::Evaluated(value),
            Err(error) => ReplEvent::Failed(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, error::RuntimeError};

    fn repl() -> Repl {
        Repl::new(Context::with_io(Config::default(), Box::new(std::io::empty()), Box::new(std::io::sink())))
    }

    #[test]
    fn open_blocks_ask_for_more_input() {
        let mut repl = repl();
        assert!(matches!(repl.feed("if True {"), ReplEvent::Incomplete));
        assert_eq!(repl.prompt(), CONTINUATION_PROMPT);
        assert!(matches!(repl.feed("1 }"), ReplEvent::Evaluated(Value::Integer(1))));
        assert_eq!(repl.prompt(), PROMPT);
    }

    #[test]
    fn unterminated_strings_span_lines() {
        let mut repl = repl();
        assert!(matches!(repl.feed("var s = 'first"), ReplEvent::Incomplete));
        assert!(matches!(repl.feed("second'"), ReplEvent::Evaluated(Value::None)));
        assert!(matches!(repl.feed("len(s)"), ReplEvent::Evaluated(Value::Integer(12))));
    }

    #[test]
    fn malformed_input_discards_the_buffer() {
        let mut repl = repl();
        assert!(matches!(repl.feed("1 2"), ReplEvent::Failed(Error::Parse(_))));
        assert!(!repl.is_continuing());
        assert!(matches!(repl.feed("3"), ReplEvent::Evaluated(Value::Integer(3))));
    }

    #[test]
    fn lines_are_read_from_the_context_input() {
        let input = std::io::Cursor::new("var n = 4\nn * n\n");
        let mut repl = Repl::new(Context::with_io(Config::default(), Box::new(input), Box::new(std::io::sink())));

        let mut last = None;
        while let Some(line) = repl.read_line().unwrap() {
            last = Some(repl.feed(&line));
        }
        assert!(matches!(last, Some(ReplEvent::Evaluated(Value::Integer(16)))));
    }

    #[test]
    fn runtime_errors_keep_bindings() {
        let mut repl = repl();
        assert!(matches!(repl.feed("var x = 10"), ReplEvent::Evaluated(Value::None)));
        assert!(matches!(repl.feed("x / 0"),
                         ReplEvent::Failed(Error::Runtime(RuntimeError::DivisionByZero { .. }))));
        assert!(matches!(repl.feed("x"), ReplEvent::Evaluated(Value::Integer(10))));
    }
}
