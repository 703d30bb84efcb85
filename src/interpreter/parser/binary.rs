use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Node, Position},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{core::ParseResult, term::parse_term},
    },
};

/// Parses an operator expression by precedence climbing.
///
/// Operators bind by tier, higher binding tighter:
///
/// | tier | operators                         |
/// |------|-----------------------------------|
/// | 1    | `+` `-`                           |
/// | 2    | `*` `/`                           |
/// | 3    | `==` `!=` `<` `>` `<=` `>=` `in`  |
/// | 4    | `.` `=` `and` `or`                |
///
/// Operators of equal tier associate to the left.
///
/// Grammar: `binary := term (operator term)*`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the first operand.
///
/// # Returns
/// The operand itself, or a `Node::BinaryOp` tree.
pub fn parse_binary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let left = parse_term(tokens)?;
    parse_binary_rhs(tokens, left, 1)
}

/// Folds operators of at least `min_precedence` onto `left`.
///
/// When the operator after a right operand binds strictly tighter than the
/// current one, the right operand is extended first; otherwise the current
/// operation is folded and the loop continues to the left.
fn parse_binary_rhs<'a, I>(tokens: &mut Peekable<I>,
                           mut left: Node,
                           min_precedence: u8)
                           -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    while let Some((op, position)) = peek_operator(tokens)
          && op.precedence() >= min_precedence
    {
        tokens.next();
        let mut right = parse_term(tokens)?;

        while let Some((next, _)) = peek_operator(tokens)
              && next.precedence() > op.precedence()
        {
            right = parse_binary_rhs(tokens, right, op.precedence() + 1)?;
        }

        left = make_binary(left, op, right, position)?;
    }

    Ok(left)
}

fn make_binary(left: Node, op: BinaryOperator, right: Node, position: Position) -> ParseResult<Node> {
    if op == BinaryOperator::Assign && !is_assignable(&left) {
        return Err(ParseError::InvalidAssignmentTarget { target: describe_target(&left),
                                                         position });
    }

    Ok(Node::BinaryOp { left: Box::new(left),
                        op,
                        right: Box::new(right),
                        position })
}

/// Whether `node` may appear on the left of `=`: a variable or an element
/// access such as `obj.field` or `xs.0`.
fn is_assignable(node: &Node) -> bool {
    matches!(node,
             Node::Variable { .. }
             | Node::BinaryOp { op: BinaryOperator::Dot,
                                .. })
}

fn describe_target(node: &Node) -> String {
    match node {
        Node::Integer { value, .. } => format!("integer {value}"),
        Node::Str { value, .. } => format!("string \"{value}\""),
        Node::Call { .. } => "a call".to_string(),
        Node::BinaryOp { op, .. } => format!("a '{op}' expression"),
        _ => "this expression".to_string(),
    }
}

/// Returns the binary operator at the front of the stream, if any.
fn peek_operator<'a, I>(tokens: &mut Peekable<I>) -> Option<(BinaryOperator, Position)>
    where I: Iterator<Item = &'a Token>
{
    let token = tokens.peek()?;
    token_to_binary_operator(token.kind).map(|op| (op, token.position()))
}

/// Maps a token kind to its binary operator.
#[must_use]
pub const fn token_to_binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Sub),
        TokenKind::Mul => Some(BinaryOperator::Mul),
        TokenKind::Div => Some(BinaryOperator::Div),
        TokenKind::Eq => Some(BinaryOperator::Equal),
        TokenKind::Neq => Some(BinaryOperator::NotEqual),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::Great => Some(BinaryOperator::Greater),
        TokenKind::Le => Some(BinaryOperator::LessEqual),
        TokenKind::Ge => Some(BinaryOperator::GreaterEqual),
        TokenKind::In => Some(BinaryOperator::In),
        TokenKind::And => Some(BinaryOperator::And),
        TokenKind::Or => Some(BinaryOperator::Or),
        TokenKind::Dot => Some(BinaryOperator::Dot),
        TokenKind::Assign => Some(BinaryOperator::Assign),
        _ => None,
    }
}
