use crate::{
    ast::{BinaryOperator, Case, CategoryDef, FunctionDef, Node, Position, RunMode},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        transpiler::nim,
    },
    util::stack::ensure_sufficient_stack,
};

impl Context {
    /// Renders a whole program as Nim source.
    pub fn render_program(&mut self, node: &Node) -> EvalResult<String> {
        tracing::debug!("rendering program");
        self.render(node, 0)
    }

    /// Renders a node as Nim source at the given indentation level.
    ///
    /// This is the recursive entry point of the transpiler and mirrors
    /// [`eval`](Self::eval): statements become indented lines, expressions
    /// are rendered inline. Compile-time nodes are evaluated on the spot and
    /// their value spliced into the output; `init` is evaluated and renders
    /// nothing, and so do algebraic placeholders. Given the same tree,
    /// environment and indentation the output is always the same.
    ///
    /// # Parameters
    /// - `node`: The node to render.
    /// - `indent`: Indentation level; one level is `Config::indent_width`
    ///   spaces.
    ///
    /// # Returns
    /// The rendered lines, without a trailing newline. Nodes with no Nim
    /// counterpart render as an empty string.
    pub fn render(&mut self, node: &Node, indent: usize) -> EvalResult<String> {
        ensure_sufficient_stack(|| self.render_node(node, indent))
    }

    fn render_node(&mut self, node: &Node, indent: usize) -> EvalResult<String> {
        let pad = self.config().indentation(indent);

        match node {
            Node::Sequence { statements, .. } => {
                let lines = statements.iter()
                                      .map(|statement| self.render(statement, indent))
                                      .collect::<EvalResult<Vec<_>>>()?;
                Ok(join_lines(lines))
            },
            Node::Assign { name, value, .. } => Ok(format!("{pad}var {name} = {}", self.render_expr(value)?)),
            Node::Comment { text, .. } => {
                if text.trim().is_empty() {
                    return Ok(format!("{pad}#"));
                }
                let lines: Vec<String> = text.lines().map(|line| format!("{pad}# {}", line.trim())).collect();
                Ok(lines.join("\n"))
            },
            Node::Print { value, .. } | Node::Echo { value, .. } => {
                Ok(format!("{pad}echo {}", self.render_expr(value)?))
            },
            Node::Break { .. } => Ok(format!("{pad}break")),
            Node::Return { value, .. } => match value {
                Some(value) => Ok(format!("{pad}return {}", self.render_expr(value)?)),
                None => Ok(format!("{pad}return")),
            },
            Node::Function(def) => self.render_function(def, indent),
            Node::Run { file, mode, position } => self.render_run(file, *mode, *position, indent),
            Node::If { condition,
                       then,
                       otherwise,
                       .. } => {
                let mut out = format!("{pad}if {}:\n{}",
                                      self.render_expr(condition)?,
                                      self.render_block(then, indent + 1)?);
                if let Some(otherwise) = otherwise {
                    out.push_str(&format!("\n{pad}else:\n{}", self.render_block(otherwise, indent + 1)?));
                }
                Ok(out)
            },
            Node::While { condition,
                          body,
                          collect,
                          .. } => self.render_while(condition, body, *collect, indent),
            Node::Assert { value, .. } => Ok(format!("{pad}assert {}", self.render_expr(value)?)),
            Node::Raise { value, .. } => {
                Ok(format!("{pad}raise newException(CatchableError, $({}))", self.render_expr(value)?))
            },
            Node::TryExcept { body,
                              filter,
                              handler,
                              .. } => {
                let filter = filter.as_ref().map_or_else(String::new, |filter| format!(" {filter}"));
                Ok(format!("{pad}try:\n{}\n{pad}except{filter}:\n{}",
                           self.render_block(body, indent + 1)?,
                           self.render_block(handler, indent + 1)?))
            },
            Node::Init { .. } => {
                self.run(node)?;
                Ok(String::new())
            },
            Node::Match { subject, cases, .. } | Node::Switch { subject, cases, .. } => {
                self.render_cases(subject, cases, indent)
            },
            Node::Category(def) => self.render_category(def, indent),
            Node::AlgebraicVariable { .. } | Node::AlgebraicCall { .. } => Ok(String::new()),
            Node::CompileTime { inner, .. } => {
                let value = self.run(inner)?;
                let text = nim::splice(&value);
                Ok(if text.is_empty() { text } else { format!("{pad}{text}") })
            },
            Node::Integer { .. }
            | Node::Str { .. }
            | Node::Bool { .. }
            | Node::NoneLiteral { .. }
            | Node::Call { .. }
            | Node::Input { .. }
            | Node::Variable { .. }
            | Node::Array { .. }
            | Node::BinaryOp { .. } => Ok(format!("{pad}{}", self.render_expr(node)?)),
        }
    }

    /// Renders a node in expression position, without indentation.
    fn render_expr(&mut self, node: &Node) -> EvalResult<String> {
        match node {
            Node::Integer { value, .. } => Ok(value.to_string()),
            Node::Str { value, .. } => Ok(nim::quote(value)),
            Node::Bool { value, .. } => Ok(value.to_string()),
            Node::NoneLiteral { .. } => Ok("nil".to_string()),
            Node::Variable { name, .. } => Ok(name.clone()),
            Node::Echo { value, .. } => self.render_expr(value),
            Node::Call { callee, arguments, .. } => {
                let callee = self.render_operand(callee)?;
                let arguments = self.render_list(arguments)?;
                Ok(format!("{callee}({arguments})"))
            },
            Node::Input { prompt, .. } => {
                Ok(format!("(stdout.write({}); stdin.readLine())", self.render_expr(prompt)?))
            },
            Node::Array { elements, .. } => Ok(format!("@[{}]", self.render_list(elements)?)),
            Node::BinaryOp { left, op, right, .. } => {
                let operator = nim::operator(*op, left, right);
                let left = self.render_operand(left)?;
                let right = self.render_operand(right)?;
                if *op == BinaryOperator::Dot {
                    Ok(format!("{left}.{right}"))
                } else {
                    Ok(format!("{left} {operator} {right}"))
                }
            },
            Node::CompileTime { inner, .. } => {
                let value = self.run(inner)?;
                Ok(nim::splice(&value))
            },
            other => self.render(other, 0),
        }
    }

    /// Renders an operand, parenthesizing nested operators so the grouping
    /// of the tree survives Nim's own precedence rules.
    fn render_operand(&mut self, node: &Node) -> EvalResult<String> {
        match node {
            Node::BinaryOp { op, .. } if *op != BinaryOperator::Dot => {
                Ok(format!("({})", self.render_expr(node)?))
            },
            _ => self.render_expr(node),
        }
    }

    fn render_list(&mut self, nodes: &[Node]) -> EvalResult<String> {
        let mut parts = Vec::with_capacity(nodes.len());
        for node in nodes {
            parts.push(self.render_expr(node)?);
        }
        Ok(parts.join(", "))
    }

    /// Renders the body of a compound statement. Nim needs at least one
    /// statement there, so an empty body becomes `discard`.
    fn render_block(&mut self, node: &Node, indent: usize) -> EvalResult<String> {
        let text = match node {
            Node::NoneLiteral { .. } => String::new(),
            _ => self.render(node, indent)?,
        };
        if text.trim().is_empty() {
            return Ok(format!("{}discard", self.config().indentation(indent)));
        }
        Ok(text)
    }

    fn render_function(&mut self, def: &FunctionDef, indent: usize) -> EvalResult<String> {
        let pad = self.config().indentation(indent);
        let params: Vec<String> = def.params
                                     .iter()
                                     .map(|param| format!("{}: {}", param.name, nim::map_type(&param.declared_type)))
                                     .collect();

        Ok(format!("{pad}proc {}({}): {} =\n{}",
                   def.name,
                   params.join(", "),
                   nim::map_type(&def.return_type),
                   self.render_block(&def.body, indent + 1)?))
    }

    /// Renders `while`. In `ret` mode the values of the body's last
    /// expression are collected, as strings, into a `ret` sequence declared
    /// before the loop.
    fn render_while(&mut self, condition: &Node, body: &Node, collect: bool, indent: usize) -> EvalResult<String> {
        let pad = self.config().indentation(indent);
        let header = format!("{pad}while {}:", self.render_expr(condition)?);

        if !collect {
            return Ok(format!("{header}\n{}", self.render_block(body, indent + 1)?));
        }

        let statements = flatten(body);
        let mut lines = vec![format!("{pad}var ret: seq[string] = @[]"), header];
        let inner = self.config().indentation(indent + 1);

        if let Some((last, rest)) = statements.split_last() {
            for statement in rest {
                lines.push(self.render(statement, indent + 1)?);
            }
            if is_expression(last) {
                lines.push(format!("{inner}ret.add($({}))", self.render_expr(last)?));
            } else {
                lines.push(self.render_block(last, indent + 1)?);
            }
        }

        Ok(join_lines(lines))
    }

    fn render_cases(&mut self, subject: &Node, cases: &[Case], indent: usize) -> EvalResult<String> {
        let pad = self.config().indentation(indent);
        let mut lines = vec![format!("{pad}case {}", self.render_expr(subject)?)];

        for case in cases {
            lines.push(format!("{pad}of {}:", self.render_expr(&case.key)?));
            lines.push(self.render_block(&case.result, indent + 1)?);
        }

        lines.push(format!("{pad}else:\n{}discard", self.config().indentation(indent + 1)));
        Ok(join_lines(lines))
    }

    /// Renders a category as a constructor proc returning a named tuple of
    /// the fields its body declares.
    fn render_category(&mut self, def: &CategoryDef, indent: usize) -> EvalResult<String> {
        let pad = self.config().indentation(indent);
        let inner = self.config().indentation(indent + 1);

        let fields: Vec<String> = flatten(&def.body).into_iter()
                                                    .filter_map(|statement| match statement {
                                                        Node::Assign { name, .. } => Some(format!("{name}: {name}")),
                                                        _ => None,
                                                    })
                                                    .collect();

        let mut lines = vec![format!("{pad}proc {}(): auto =", def.name)];
        let body = match &def.body {
            Node::NoneLiteral { .. } => String::new(),
            body => self.render(body, indent + 1)?,
        };
        if fields.is_empty() && body.trim().is_empty() {
            lines.push(format!("{inner}discard"));
        }
        lines.push(body);
        if !fields.is_empty() {
            lines.push(format!("{inner}({})", fields.join(", ")));
        }

        Ok(join_lines(lines))
    }

    /// Renders `import`. An included script is rendered inline; a compiled
    /// one is written to its own file and referenced with Nim's `include`.
    fn render_run(&mut self, file: &str, mode: RunMode, position: Position, indent: usize) -> EvalResult<String> {
        match mode {
            RunMode::Include => {
                let program = self.load_script(file, position)?;
                self.descend(position, |context| context.render(&program, indent))
            },
            RunMode::Compile { execute } => {
                self.descend(position, |context| context.compile_script(file, execute, position))?;
                Ok(format!("{}include {file}", self.config().indentation(indent)))
            },
        }
    }
}

/// Joins rendered lines, skipping the empty renderings of nodes without
/// output.
fn join_lines(lines: impl IntoIterator<Item = String>) -> String {
    lines.into_iter()
         .filter(|line| !line.is_empty())
         .collect::<Vec<_>>()
         .join("\n")
}

/// Lists the statements of a sequence in source order.
fn flatten(node: &Node) -> Vec<&Node> {
    match node {
        Node::Sequence { statements, .. } => statements.iter().collect(),
        other => vec![other],
    }
}

/// Whether a node produces a value Nim can use in an expression.
const fn is_expression(node: &Node) -> bool {
    match node {
        Node::BinaryOp { op, .. } => !matches!(op, BinaryOperator::Assign),
        Node::Integer { .. }
        | Node::Str { .. }
        | Node::Bool { .. }
        | Node::Call { .. }
        | Node::Input { .. }
        | Node::Variable { .. }
        | Node::Array { .. } => true,
        _ => false,
    }
}
