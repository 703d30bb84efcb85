use std::iter::Peekable;

use crate::{
    ast::Position,
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::core::ParseResult,
    },
};

/// Returns the kind of the next token without consuming it.
///
/// An exhausted stream reads as `Eof`.
pub(in crate::interpreter::parser) fn peek_kind<'a, I>(tokens: &mut Peekable<I>) -> TokenKind
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().map_or(TokenKind::Eof, |token| token.kind)
}

/// Returns the position of the next token without consuming it.
pub(in crate::interpreter::parser) fn peek_position<'a, I>(tokens: &mut Peekable<I>) -> Position
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().map_or_else(Position::default, |token| token.position())
}

/// Builds the error for a token that does not fit the grammar.
///
/// `Eof` (or an exhausted stream) becomes `UnexpectedEndOfInput`, which the
/// REPL treats as a request for more input.
///
/// # Parameters
/// - `found`: The offending token, if any.
/// - `expected`: A description of what the grammar required.
pub(in crate::interpreter::parser) fn unexpected(found: Option<&Token>,
                                                 expected: impl Into<String>)
                                                 -> ParseError {
    match found {
        Some(token) if token.kind != TokenKind::Eof => {
            ParseError::UnexpectedToken { expected: expected.into(),
                                          found:    token.to_string(),
                                          position: token.position(), }
        },
        Some(token) => ParseError::UnexpectedEndOfInput { expected: expected.into(),
                                                          position: token.position(), },
        None => ParseError::UnexpectedEndOfInput { expected: expected.into(),
                                                   position: Position::default(), },
    }
}

/// Consumes the next token if it has the given kind, failing otherwise.
///
/// # Parameters
/// - `tokens`: Token iterator.
/// - `kind`: The required token kind.
///
/// # Returns
/// The consumed token.
///
/// # Errors
/// Returns `UnexpectedToken` naming both kinds, or `UnexpectedEndOfInput` if
/// the stream is at its end.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    kind: TokenKind)
                                                    -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    if let Some(token) = tokens.next_if(|token| token.kind == kind) {
        return Ok(token);
    }
    Err(unexpected(tokens.peek().copied(), kind.to_string()))
}

/// Consumes the next token if it has the given kind.
///
/// # Returns
/// Whether a token was consumed.
pub(in crate::interpreter::parser) fn accept<'a, I>(tokens: &mut Peekable<I>,
                                                    kind: TokenKind)
                                                    -> bool
    where I: Iterator<Item = &'a Token>
{
    tokens.next_if(|token| token.kind == kind).is_some()
}

/// Parses a plain identifier and returns its name and position.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<(String, Position)>
    where I: Iterator<Item = &'a Token>
{
    let token = expect(tokens, TokenKind::Ident)?;
    Ok((token.text().unwrap_or_default().to_string(), token.position()))
}

/// Whether the next token ends the current statement.
///
/// Used for the optional values of `return` and `break`.
pub(in crate::interpreter::parser) fn at_statement_end<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a Token>
{
    matches!(peek_kind(tokens),
             TokenKind::EndLn | TokenKind::BlockEnd | TokenKind::Eof | TokenKind::Comma)
}
