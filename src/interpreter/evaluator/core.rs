use std::io::{self, BufRead, Write};

use crate::{
    ast::{Node, Position},
    config::Config,
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::{function::builtin::Registry, utils::check_element_types},
        value::core::Value,
    },
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The outcome of evaluating a node.
///
/// `return` and `break` do not unwind through errors: they produce a
/// non-normal flow that every enclosing node hands straight back until a
/// function call or a loop consumes it. The position of the originating
/// keyword is kept so an escape from the top level can be reported.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Evaluation completed with a value.
    Normal(Value),
    /// A `return` is unwinding to the nearest function call.
    Return(Value, Position),
    /// A `break` is unwinding to the nearest loop.
    Break(Value, Position),
}

/// Unwraps a normal flow, returning any other flow from the enclosing
/// function.
///
/// # Example
/// ```ignore
/// let value = flow!(self.eval(node));
/// ```
macro_rules! flow {
    ($flow:expr) => {
        match $flow? {
            $crate::interpreter::evaluator::core::Flow::Normal(value) => value,
            other => return Ok(other),
        }
    };
}

pub(crate) use flow;

/// Selects which walker [`Context::process`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Execute the program.
    Interpret,
    /// Render the program as Nim source.
    Transpile,
}

/// What [`Context::process`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// The value of the last statement.
    Value(Value),
    /// Generated source text.
    Text(String),
}

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the current environment, the
/// builtin registry consulted when a name is not bound, the configuration and
/// the streams `print` and `input` use.
///
/// ## Usage
///
/// `Context` is created once and reused for every program or REPL line that
/// should share state. Both walkers, [`eval`](Self::eval) and
/// [`render`](Self::render), run against the same context so that
/// compile-time code sees the bindings made before it.
pub struct Context {
    /// The current scope. Replaced for the duration of a call.
    pub env:  Environment,
    builtins: Registry,
    config:   Config,
    depth:    usize,
    input:    Box<dyn BufRead>,
    output:   Box<dyn Write>,
}

impl Context {
    /// Creates a context reading from stdin and writing to stdout.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_io(config, Box::new(io::BufReader::new(io::stdin())), Box::new(io::stdout()))
    }

    /// Creates a context with explicit input and output streams.
    ///
    /// # Parameters
    /// - `config`: Interpreter settings.
    /// - `input`: Source of lines for `input`.
    /// - `output`: Sink for `print` and `input` prompts.
    #[must_use]
    pub fn with_io(config: Config, input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        Self { env: Environment::new(),
               builtins: Registry::standard(),
               config,
               depth: 0,
               input,
               output }
    }

    /// Replaces the builtin registry.
    #[must_use]
    pub fn with_builtins(mut self, builtins: Registry) -> Self {
        self.builtins = builtins;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the builtin registry.
    #[must_use]
    pub const fn builtins(&self) -> &Registry {
        &self.builtins
    }

    /// Returns the current user call depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Runs `node` in the given mode.
    ///
    /// This is the single entry point shared by the interpreter and the
    /// transpiler; it is what the CLI and the REPL call.
    pub fn process(&mut self, node: &Node, mode: Mode) -> EvalResult<Output> {
        match mode {
            Mode::Interpret => self.run(node).map(Output::Value),
            Mode::Transpile => self.render_program(node).map(Output::Text),
        }
    }

    /// Evaluates a whole program.
    ///
    /// A `return` or `break` that reaches the top level is an error here,
    /// since nothing is left to consume it.
    ///
    /// # Returns
    /// The value of the last statement.
    pub fn run(&mut self, node: &Node) -> EvalResult<Value> {
        match self.eval(node)? {
            Flow::Normal(value) => Ok(value),
            Flow::Return(_, position) => Err(RuntimeError::ReturnOutsideFunction { position }),
            Flow::Break(_, position) => Err(RuntimeError::BreakOutsideLoop { position }),
        }
    }

    /// Evaluates a node and returns its control-flow outcome.
    ///
    /// This is the recursive entry point of the interpreter. The evaluator
    /// dispatches on the node variant: literals, variables, declarations,
    /// calls, operators, conditionals, loops, jumps, imports and categories.
    ///
    /// # Parameters
    /// - `node`: The node to evaluate.
    ///
    /// # Returns
    /// `Flow::Normal` with the node's value, or the `return`/`break` flow
    /// still looking for its target.
    pub fn eval(&mut self, node: &Node) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| self.eval_node(node))
    }

    fn eval_node(&mut self, node: &Node) -> EvalResult<Flow> {
        match node {
            Node::Sequence { statements, .. } => {
                let mut last = Value::None;
                for statement in statements {
                    last = flow!(self.eval(statement));
                }
                Ok(Flow::Normal(last))
            },
            Node::Assign { name, value, .. } => {
                let value = flow!(self.eval(value));
                self.env.bind(name.clone(), value);
                Ok(Flow::Normal(Value::None))
            },
            Node::Integer { value, .. } => Ok(Flow::Normal(Value::Integer(*value))),
            Node::Str { value, .. } => Ok(Flow::Normal(Value::Str(value.clone()))),
            Node::Bool { value, .. } => Ok(Flow::Normal(Value::Bool(*value))),
            Node::NoneLiteral { .. } | Node::Comment { .. } => Ok(Flow::Normal(Value::None)),
            Node::Print { value, position } => {
                let value = flow!(self.eval(value));
                if !value.is_none() {
                    self.write_line(&value.to_string(), *position)?;
                }
                Ok(Flow::Normal(Value::None))
            },
            Node::Echo { value, .. } => self.eval(value),
            Node::Break { value, position } => {
                let value = self.eval_optional(value.as_deref())?;
                Ok(match value {
                    Flow::Normal(value) => Flow::Break(value, *position),
                    other => other,
                })
            },
            Node::Return { value, position } => {
                let value = self.eval_optional(value.as_deref())?;
                Ok(match value {
                    Flow::Normal(value) => Flow::Return(value, *position),
                    other => other,
                })
            },
            Node::Function(def) => Ok(Flow::Normal(self.define_function(def))),
            Node::Call { callee,
                         arguments,
                         position, } => self.eval_call(callee, arguments, *position),
            Node::Input { prompt, position } => {
                let prompt = flow!(self.eval(prompt));
                let line = self.read_line(&prompt.to_string(), *position)?;
                Ok(Flow::Normal(Value::Str(line)))
            },
            Node::Variable { name, position } | Node::AlgebraicCall { name, position } => {
                self.lookup(name, *position).map(Flow::Normal)
            },
            Node::Run { file, mode, position } => self.eval_run(file, *mode, *position),
            Node::If { condition,
                       then,
                       otherwise,
                       .. } => self.eval_if(condition, then, otherwise.as_deref()),
            Node::While { condition,
                          body,
                          collect,
                          .. } => self.eval_while(condition, body, *collect),
            Node::Assert { value, position } => {
                if !flow!(self.eval(value)).is_truthy() {
                    return Err(RuntimeError::AssertionFailed { position: *position });
                }
                Ok(Flow::Normal(Value::None))
            },
            Node::Raise { value, position } => {
                let value = flow!(self.eval(value));
                Err(RuntimeError::Raised { message:  value.to_string(),
                                           position: *position, })
            },
            Node::TryExcept { body,
                              filter,
                              handler,
                              .. } => self.eval_try(body, filter.as_deref(), handler),
            Node::Init { value, position } => self.eval_init(value, *position),
            Node::Match { subject, cases, .. } | Node::Switch { subject, cases, .. } => {
                self.eval_cases(subject, cases)
            },
            Node::Array { element_type,
                          elements,
                          position, } => self.eval_array(element_type, elements, *position),
            Node::BinaryOp { left,
                             op,
                             right,
                             position, } => self.eval_binary_op(left, *op, right, *position),
            Node::Category(def) => self.eval_category(def),
            Node::AlgebraicVariable { name, .. } => {
                self.env.bind(name.clone(), Value::None);
                Ok(Flow::Normal(Value::None))
            },
            Node::CompileTime { inner, .. } => self.eval(inner),
        }
    }

    /// Resolves a name: user bindings first, then the builtin registry.
    ///
    /// # Errors
    /// `UnknownVariable` if neither tier knows the name.
    pub fn lookup(&self, name: &str, position: Position) -> EvalResult<Value> {
        if let Some(value) = self.env.lookup(name) {
            return Ok(value.clone());
        }

        self.builtins
            .get(name)
            .map(Value::Builtin)
            .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string(),
                                                           position })
    }

    /// Runs `f` with `scope` as the current environment, one call level
    /// deeper.
    ///
    /// The previous environment and depth are restored whether or not `f`
    /// succeeds.
    ///
    /// # Returns
    /// The result of `f` together with the scope as `f` left it.
    ///
    /// # Errors
    /// `StackExhausted` if the call would exceed `Config::max_call_depth`.
    pub(crate) fn enter_scope<T>(&mut self,
                                 scope: Environment,
                                 position: Position,
                                 f: impl FnOnce(&mut Self) -> EvalResult<T>)
                                 -> EvalResult<(T, Environment)> {
        let saved = std::mem::replace(&mut self.env, scope);
        let result = self.descend(position, f);
        let scope = std::mem::replace(&mut self.env, saved);

        result.map(|value| (value, scope))
    }

    /// Runs `f` one nesting level deeper in the current environment.
    ///
    /// Imports nest through this so that a script including itself stops at
    /// the same limit as runaway recursion.
    ///
    /// # Errors
    /// `StackExhausted` if the nesting would exceed `Config::max_call_depth`.
    pub(crate) fn descend<T>(&mut self,
                             position: Position,
                             f: impl FnOnce(&mut Self) -> EvalResult<T>)
                             -> EvalResult<T> {
        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::StackExhausted { depth: self.depth,
                                                      position });
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Writes `text` and a newline to the output stream.
    pub(crate) fn write_line(&mut self, text: &str, position: Position) -> EvalResult<()> {
        writeln!(self.output, "{text}").map_err(|source| RuntimeError::Io { path: "<stdout>".to_string(),
                                                                            source,
                                                                            position })
    }

    /// Writes `prompt`, then reads one line from the input stream without its
    /// line terminator. End of input reads as an empty string.
    pub(crate) fn read_line(&mut self, prompt: &str, position: Position) -> EvalResult<String> {
        let stdout_error = |source| RuntimeError::Io { path: "<stdout>".to_string(),
                                                       source,
                                                       position };
        write!(self.output, "{prompt}").map_err(stdout_error)?;
        self.output.flush().map_err(stdout_error)?;

        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .map_err(|source| RuntimeError::Io { path: "<stdin>".to_string(),
                                                 source,
                                                 position })?;

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// Flushes the output stream.
    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }

    /// Writes `prompt` and reads the next raw line of input, terminator
    /// included. Returns `None` at end of input.
    ///
    /// Used by the REPL, which shares the input stream with `input`.
    pub fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn eval_array(&mut self, element_type: &str, elements: &[Node], position: Position) -> EvalResult<Flow> {
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            values.push(flow!(self.eval(element)));
        }

        check_element_types(element_type, &values, position)?;
        Ok(Flow::Normal(Value::from(values)))
    }

    fn eval_optional(&mut self, node: Option<&Node>) -> EvalResult<Flow> {
        match node {
            Some(node) => self.eval(node),
            None => Ok(Flow::Normal(Value::None)),
        }
    }
}
