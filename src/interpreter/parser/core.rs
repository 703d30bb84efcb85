use std::iter::Peekable;

use crate::{
    ast::Node,
    error::{LexError, ParseError},
    interpreter::{
        lexer::{Lexer, Token, TokenKind},
        parser::{
            statement::parse_statement,
            utils::{accept, peek_kind, peek_position},
        },
    },
    util::stack::ensure_sufficient_stack,
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a complete program.
///
/// The whole token stream must be consumed: anything left after the last
/// statement is reported as `UnexpectedTrailingTokens`. An empty program
/// parses to a `None` literal.
///
/// Grammar: `program := statements? EOF`
///
/// # Parameters
/// - `tokens`: Token iterator over the full program, ending with `Eof`.
///
/// # Returns
/// The root node of the program.
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    if peek_kind(tokens) == TokenKind::Eof {
        return Ok(Node::NoneLiteral { position: peek_position(tokens) });
    }

    let program = parse_statements(tokens)?;

    match tokens.next() {
        None => Ok(program),
        Some(token) if token.kind == TokenKind::Eof => Ok(program),
        Some(token) => Err(ParseError::UnexpectedTrailingTokens { token:    token.to_string(),
                                                                  position: token.position(), }),
    }
}

/// Parses `;`-separated statements.
///
/// Statements are folded left into `Sequence` nodes, so they execute in
/// source order and the value of the whole is the value of the last one. A
/// trailing `;` before `}` or the end of input is accepted.
///
/// Grammar: `statements := expression (";" expression)* ";"?`
pub fn parse_statements<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let first = parse_expression(tokens)?;
    let position = first.position();
    let mut statements = vec![first];

    while accept(tokens, TokenKind::EndLn) {
        if matches!(peek_kind(tokens), TokenKind::BlockEnd | TokenKind::Eof) {
            break;
        }
        statements.push(parse_expression(tokens)?);
    }

    if statements.len() == 1 {
        return Ok(statements.remove(0));
    }
    Ok(Node::Sequence { statements, position })
}

/// Parses a single statement or expression.
///
/// This is the recursive entry point of the grammar; nesting depth is bounded
/// only by the input, so the host stack is grown on demand.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    ensure_sufficient_stack(|| parse_statement(tokens))
}

/// Lexes and parses a whole source text.
///
/// Lexical diagnostics are returned alongside the parse result rather than
/// failing it: an unterminated literal already surfaces as an `Unknown` token
/// the parser rejects, and callers such as the REPL use the diagnostics to
/// tell incomplete input from malformed input.
#[must_use]
pub fn parse_source(source: &str) -> (ParseResult<Node>, Vec<LexError>) {
    let mut lexer = Lexer::new(source);
    let tokens: Vec<Token> = lexer.by_ref().collect();
    let program = parse_program(&mut tokens.iter().peekable());

    (program, lexer.into_diagnostics())
}
