use std::rc::Rc;

/// A location in the source text.
///
/// Rows and columns are both 1-based. Every token and every AST node carries a
/// `Position` so that parse and runtime errors can point at the offending
/// code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Position {
    /// The source line, starting at 1.
    pub row:    usize,
    /// The character column within the line, starting at 1.
    pub column: usize,
}

impl Position {
    /// Creates a position from a row and a column.
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}, column {}", self.row, self.column)
    }
}

/// An abstract syntax tree (AST) node.
///
/// `Node` is the single node set shared by the evaluator and the transpiler:
/// every variant can be executed by `Context::eval` and rendered by
/// `Context::render`. Statements and expressions are not distinguished; a
/// statement is simply a node evaluated for its effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Statements executed in source order; the value is the last one's.
    ///
    /// Kept flat so that long programs do not nest, which would make
    /// dropping or cloning the tree recurse once per statement.
    Sequence {
        /// The statements, at least two.
        statements: Vec<Self>,
        /// Position of the first statement.
        position:   Position,
    },
    /// `var name = value`
    Assign {
        /// Name of the variable being bound.
        name:     String,
        /// The bound expression.
        value:    Box<Self>,
        /// Position of the `var` keyword.
        position: Position,
    },
    /// An integer literal.
    Integer {
        /// The literal value.
        value:    i64,
        /// Position of the literal.
        position: Position,
    },
    /// A string literal.
    Str {
        /// The raw contents between the delimiters.
        value:    String,
        /// Position of the literal.
        position: Position,
    },
    /// `True` or `False`.
    Bool {
        /// The literal value.
        value:    bool,
        /// Position of the literal.
        position: Position,
    },
    /// `None`
    NoneLiteral {
        /// Position of the literal.
        position: Position,
    },
    /// A `|comment|`. Evaluates to none.
    Comment {
        /// The comment text.
        text:     String,
        /// Position of the comment.
        position: Position,
    },
    /// `print value`
    Print {
        /// The printed expression.
        value:    Box<Self>,
        /// Position of the keyword.
        position: Position,
    },
    /// `echo value`
    Echo {
        /// The echoed expression.
        value:    Box<Self>,
        /// Position of the keyword.
        position: Position,
    },
    /// `break [value]`
    Break {
        /// The optional loop result.
        value:    Option<Box<Self>>,
        /// Position of the keyword.
        position: Position,
    },
    /// `return [value]`
    Return {
        /// The optional returned expression.
        value:    Option<Box<Self>>,
        /// Position of the keyword.
        position: Position,
    },
    /// `func name(params) [type] { body }`
    Function(Rc<FunctionDef>),
    /// `callee(arguments)`
    Call {
        /// The called expression.
        callee:    Box<Self>,
        /// Positional arguments.
        arguments: Vec<Self>,
        /// Position of the callee.
        position:  Position,
    },
    /// `input prompt`
    Input {
        /// The prompt written before reading a line.
        prompt:   Box<Self>,
        /// Position of the keyword.
        position: Position,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name:     String,
        /// Position of the identifier.
        position: Position,
    },
    /// `import [-c] [-r] name`
    Run {
        /// Script name without extension.
        file:     String,
        /// Whether to include or compile the script.
        mode:     RunMode,
        /// Position of the keyword.
        position: Position,
    },
    /// `if condition { then } [else otherwise]`
    If {
        /// The tested expression.
        condition: Box<Self>,
        /// The block run when the condition is truthy.
        then:      Box<Self>,
        /// The optional alternative.
        otherwise: Option<Box<Self>>,
        /// Position of the keyword.
        position:  Position,
    },
    /// `while [ret] condition { body }`
    While {
        /// The tested expression.
        condition: Box<Self>,
        /// The loop body.
        body:      Box<Self>,
        /// Whether the loop yields the list of per-iteration values.
        collect:   bool,
        /// Position of the keyword.
        position:  Position,
    },
    /// `assert value`
    Assert {
        /// The checked expression.
        value:    Box<Self>,
        /// Position of the keyword.
        position: Position,
    },
    /// `raise value`
    Raise {
        /// The raised expression; its text becomes the error message.
        value:    Box<Self>,
        /// Position of the keyword.
        position: Position,
    },
    /// `try { body } except [Filter] { handler }`
    TryExcept {
        /// The guarded block.
        body:     Box<Self>,
        /// Optional error kind or message to catch.
        filter:   Option<String>,
        /// The block run when an error is caught.
        handler:  Box<Self>,
        /// Position of the keyword.
        position: Position,
    },
    /// `init: value` or `init { block }`
    Init {
        /// The value bound to `self`.
        value:    Box<Self>,
        /// Position of the keyword.
        position: Position,
    },
    /// `match subject with { key: result, ... }`
    Match {
        /// The matched expression.
        subject:  Box<Self>,
        /// Key and result pairs, in source order.
        cases:    Vec<Case>,
        /// Position of the keyword.
        position: Position,
    },
    /// `switch subject { case key { block }, ... }`
    Switch {
        /// The matched expression.
        subject:  Box<Self>,
        /// Key and block pairs, in source order.
        cases:    Vec<Case>,
        /// Position of the keyword.
        position: Position,
    },
    /// `Type -> [elements]` or `[elements]`
    Array {
        /// Declared element type name, `any` when untyped.
        element_type: String,
        /// Element expressions.
        elements:     Vec<Self>,
        /// Position of the array.
        position:     Position,
    },
    /// A binary operation.
    BinaryOp {
        /// Left operand.
        left:     Box<Self>,
        /// The operator.
        op:       BinaryOperator,
        /// Right operand.
        right:    Box<Self>,
        /// Position of the operator.
        position: Position,
    },
    /// `cat Name { body }`
    Category(Rc<CategoryDef>),
    /// `alg name`
    AlgebraicVariable {
        /// Name of the placeholder.
        name:     String,
        /// Position of the keyword.
        position: Position,
    },
    /// `@name`
    AlgebraicCall {
        /// Name of the placeholder.
        name:     String,
        /// Position of the `@`.
        position: Position,
    },
    /// `$ node`: evaluated while transpiling, its value spliced into the
    /// output.
    CompileTime {
        /// The wrapped node.
        inner:    Box<Self>,
        /// Position of the `$`.
        position: Position,
    },
}

impl Node {
    /// Returns the source position of this node.
    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Self::Function(def) => def.position,
            Self::Category(def) => def.position,
            Self::Sequence { position, .. }
            | Self::Assign { position, .. }
            | Self::Integer { position, .. }
            | Self::Str { position, .. }
            | Self::Bool { position, .. }
            | Self::NoneLiteral { position }
            | Self::Comment { position, .. }
            | Self::Print { position, .. }
            | Self::Echo { position, .. }
            | Self::Break { position, .. }
            | Self::Return { position, .. }
            | Self::Call { position, .. }
            | Self::Input { position, .. }
            | Self::Variable { position, .. }
            | Self::Run { position, .. }
            | Self::If { position, .. }
            | Self::While { position, .. }
            | Self::Assert { position, .. }
            | Self::Raise { position, .. }
            | Self::TryExcept { position, .. }
            | Self::Init { position, .. }
            | Self::Match { position, .. }
            | Self::Switch { position, .. }
            | Self::Array { position, .. }
            | Self::BinaryOp { position, .. }
            | Self::AlgebraicVariable { position, .. }
            | Self::AlgebraicCall { position, .. }
            | Self::CompileTime { position, .. } => *position,
        }
    }
}

/// A user function definition.
///
/// Definitions are shared between the AST and every closure created from
/// them, so they live behind an `Rc`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The function name, also bound inside the body for recursion.
    pub name:        String,
    /// Ordered parameters.
    pub params:      Vec<Param>,
    /// Declared return type name, `any` when omitted.
    pub return_type: String,
    /// The function body.
    pub body:        Node,
    /// Position of the `func` keyword.
    pub position:    Position,
}

/// A single function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name.
    pub name:          String,
    /// Declared type name, `any` when omitted.
    pub declared_type: String,
}

/// A category (prototype object) definition.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDef {
    /// The category name.
    pub name:     String,
    /// The body whose bindings become the object's fields.
    pub body:     Node,
    /// Position of the `cat` keyword.
    pub position: Position,
}

/// One arm of a `match` or `switch`.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    /// The key compared against the subject.
    pub key:    Node,
    /// The result expression (`match`) or block (`switch`).
    pub result: Node,
}

/// How an `import` statement treats its script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Parse the script and evaluate it in the current environment.
    Include,
    /// Transpile the script to a sibling file.
    Compile {
        /// Also hand the generated file to the external toolchain.
        execute: bool,
    },
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Equal to (`==` or `is`)
    Equal,
    /// Not equal to (`!=` or `not`)
    NotEqual,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=` or `le`)
    LessEqual,
    /// Greater than or equal (`>=` or `ge`)
    GreaterEqual,
    /// Membership (`in`)
    In,
    /// Logical and (`and`)
    And,
    /// Logical or (`or`)
    Or,
    /// Attribute or index access (`.`)
    Dot,
    /// Rebinding (`=`)
    Assign,
}

impl BinaryOperator {
    /// Returns the binding tier of the operator. Higher tiers bind tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Equal
            | Self::NotEqual
            | Self::Less
            | Self::Greater
            | Self::LessEqual
            | Self::GreaterEqual
            | Self::In => 3,
            Self::Dot | Self::Assign | Self::And | Self::Or => 4,
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::In => "in",
            Self::And => "and",
            Self::Or => "or",
            Self::Dot => ".",
            Self::Assign => "=",
        };
        write!(f, "{operator}")
    }
}
