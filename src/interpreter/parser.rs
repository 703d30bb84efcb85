/// Binary expression parsing.
///
/// Implements precedence climbing over the four operator tiers.
pub mod binary;

/// Block parsing.
///
/// Parses braced blocks and the constructs built around them: conditionals,
/// loops, functions, categories, `try`/`except`, `match` and `switch`.
pub mod block;

/// Core parser entry points.
///
/// Program and statement-list parsing, plus the recursive expression entry.
pub mod core;

/// Keyword statement parsing.
///
/// Dispatches on the leading token and parses declarations, I/O keywords,
/// jumps, imports and compile-time markers.
pub mod statement;

/// Term parsing.
///
/// Literals, variables, arrays, parenthesized expressions and call suffixes.
pub mod term;

/// Utility functions for parsing.
///
/// Token probing and consumption helpers shared by the parser modules.
pub mod utils;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        ast::{BinaryOperator, Node, RunMode},
        error::ParseError,
        interpreter::{lexer::Lexer, parser::core::parse_program},
    };

    fn parse(source: &str) -> Result<Node, ParseError> {
        let tokens: Vec<_> = Lexer::new(source).collect();
        parse_program(&mut tokens.iter().peekable())
    }

    fn shape(node: &Node) -> String {
        match node {
            Node::Integer { value, .. } => value.to_string(),
            Node::Variable { name, .. } => name.clone(),
            Node::BinaryOp { left, op, right, .. } => {
                format!("({} {op} {})", shape(left), shape(right))
            },
            Node::Sequence { statements, .. } => {
                let statements: Vec<String> = statements.iter().map(shape).collect();
                statements.join("; ")
            },
            Node::Call { callee, arguments, .. } => {
                let arguments: Vec<String> = arguments.iter().map(shape).collect();
                format!("{}({})", shape(callee), arguments.join(", "))
            },
            other => format!("{other:?}"),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(shape(&parse("1 + 2 * 3").unwrap()), "(1 + (2 * 3))");
        assert_eq!(shape(&parse("1 * 2 + 3").unwrap()), "((1 * 2) + 3)");
    }

    #[test]
    fn equal_tiers_fold_left() {
        assert_eq!(shape(&parse("1 - 2 - 3").unwrap()), "((1 - 2) - 3)");
        assert_eq!(shape(&parse("8 / 4 * 2").unwrap()), "((8 / 4) * 2)");
    }

    #[test]
    fn comparison_binds_tighter_than_arithmetic() {
        assert_eq!(shape(&parse("a + 1 == 3").unwrap()), "(a + (1 == 3))");
        assert_eq!(shape(&parse("(a + 1) == 3").unwrap()), "((a + 1) == 3)");
    }

    #[test]
    fn dot_chains_and_calls() {
        assert_eq!(shape(&parse("a.b.c").unwrap()), "((a . b) . c)");
        assert_eq!(shape(&parse("p.move(1, 2)").unwrap()), "(p . move(1, 2))");
        assert_eq!(shape(&parse("f(1)(2)").unwrap()), "f(1)(2)");
    }

    #[test]
    fn statements_sequence_in_order() {
        assert_eq!(shape(&parse("a; b; c;").unwrap()), "a; b; c");
    }

    #[test]
    fn function_definition_defaults() {
        let Node::Function(def) = parse("func f(a, b: int) { a }").unwrap() else {
            panic!("expected function");
        };
        assert_eq!(def.params[0].declared_type, "any");
        assert_eq!(def.params[1].declared_type, "int");
        assert_eq!(def.return_type, "any");

        let Node::Function(def) = parse("func g() str { 'x' }").unwrap() else {
            panic!("expected function");
        };
        assert_eq!(def.return_type, "str");
    }

    #[test]
    fn import_flags() {
        let Node::Run { file, mode, .. } = parse("import -c -r lib").unwrap() else {
            panic!("expected import");
        };
        assert_eq!(file, "lib");
        assert_eq!(mode, RunMode::Compile { execute: true });

        let Node::Run { mode, .. } = parse("soul lib").unwrap() else {
            panic!("expected import");
        };
        assert_eq!(mode, RunMode::Include);
        assert!(parse("import -x lib").is_err());
    }

    #[test]
    fn arrays_typed_and_bare() {
        let Node::Array { element_type, elements, .. } = parse("int -> [1, 2 3]").unwrap() else {
            panic!("expected array");
        };
        assert_eq!(element_type, "int");
        assert_eq!(elements.len(), 3);

        let Node::Array { element_type, elements, .. } = parse("[[1], []]").unwrap() else {
            panic!("expected array");
        };
        assert_eq!(element_type, "any");
        assert_eq!(elements.len(), 2);
    }

    #[test]
    fn compile_time_wraps_statement() {
        assert!(matches!(parse("$ var x = 1").unwrap(), Node::CompileTime { .. }));
    }

    #[test]
    fn jumps_take_optional_values() {
        let Node::Break { value, .. } = parse("break").unwrap() else {
            panic!("expected break");
        };
        assert!(value.is_none());
        let Node::Return { value, .. } = parse("return 1 + 2").unwrap() else {
            panic!("expected return");
        };
        assert!(value.is_some());
    }

    #[test]
    fn reports_unexpected_token_with_position() {
        let error = parse("var = 1").unwrap_err();
        assert!(matches!(error, ParseError::UnexpectedToken { .. }));
        assert_eq!(error.position().row, 1);
        assert_eq!(error.position().column, 5);
    }

    #[test]
    fn unfinished_block_is_incomplete() {
        assert!(parse("if x {").unwrap_err().is_incomplete());
        assert!(parse("func f(a) {").unwrap_err().is_incomplete());
    }

    #[test]
    fn rejects_invalid_assignment_target() {
        assert!(matches!(parse("1 = 2"), Err(ParseError::InvalidAssignmentTarget { .. })));
        assert!(matches!(parse("x = 2").unwrap(),
                         Node::BinaryOp { op: BinaryOperator::Assign, .. }));
    }

    #[test]
    fn rejects_trailing_tokens() {
        assert!(matches!(parse("1 2"), Err(ParseError::UnexpectedTrailingTokens { .. })));
    }

    #[test]
    fn empty_program_is_none() {
        assert!(matches!(parse("").unwrap(), Node::NoneLiteral { .. }));
    }
}
