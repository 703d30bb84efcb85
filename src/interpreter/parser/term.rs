use std::iter::Peekable;

use crate::{
    ast::{Node, Position},
    interpreter::{
        lexer::{Token, TokenData, TokenKind},
        parser::{
            core::{ParseResult, parse_expression},
            utils::{accept, expect, peek_kind, unexpected},
        },
    },
};

/// Parses a term followed by any number of call suffixes.
///
/// Grammar: `term := primary ("(" arguments ")")*`
///
/// Calls chain, so `make()(1)` calls the result of `make()`.
///
/// # Parameters
/// - `tokens`: Token stream positioned at the start of a term.
///
/// # Returns
/// The primary node, wrapped in one `Node::Call` per suffix.
pub fn parse_term<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut term = parse_primary(tokens)?;

    while accept(tokens, TokenKind::LParen) {
        let arguments = parse_until(tokens, TokenKind::RParen)?;
        let position = term.position();
        term = Node::Call { callee: Box::new(term),
                            arguments,
                            position };
    }

    Ok(term)
}

/// Parses a primary term: a literal, a variable, an array, or a parenthesized
/// expression.
///
/// # Errors
/// Returns `UnexpectedToken` (or `UnexpectedEndOfInput`) when the next token
/// cannot start a term.
fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(token) = tokens.next() else {
        return Err(unexpected(None, "expression"));
    };
    let position = token.position();

    match (token.kind, &token.data) {
        (TokenKind::Ident, TokenData::Text(name)) => {
            if accept(tokens, TokenKind::RArrow) {
                expect(tokens, TokenKind::LBrack)?;
                return parse_array(tokens, name.clone(), position);
            }
            Ok(Node::Variable { name: name.clone(),
                                position })
        },
        (TokenKind::Int, TokenData::Integer(value)) => Ok(Node::Integer { value: *value,
                                                                          position }),
        (TokenKind::Minus, _) if peek_kind(tokens) == TokenKind::Int => {
            let literal = expect(tokens, TokenKind::Int)?;
            match literal.data {
                TokenData::Integer(value) => Ok(Node::Integer { value: -value,
                                                                position }),
                _ => Err(unexpected(Some(literal), "integer")),
            }
        },
        (TokenKind::Str, TokenData::Text(value)) => Ok(Node::Str { value: value.clone(),
                                                                   position }),
        (TokenKind::Comment, TokenData::Text(text)) => Ok(Node::Comment { text: text.clone(),
                                                                          position }),
        (TokenKind::True, _) => Ok(Node::Bool { value: true,
                                                position }),
        (TokenKind::False, _) => Ok(Node::Bool { value: false,
                                                 position }),
        (TokenKind::None, _) => Ok(Node::NoneLiteral { position }),
        (TokenKind::Newline, _) => Ok(Node::Str { value: "\n".to_string(),
                                                  position }),
        (TokenKind::LBrack, _) => parse_array(tokens, "any".to_string(), position),
        (TokenKind::LParen, _) => {
            let inner = parse_expression(tokens)?;
            expect(tokens, TokenKind::RParen)?;
            Ok(inner)
        },
        _ => Err(unexpected(Some(token), "expression")),
    }
}

/// Parses the elements of an array literal after its opening `[`.
///
/// Grammar: `array := (IDENT "->")? "[" (expression ","?)* "]"`; the bare
/// form has element type `any`.
fn parse_array<'a, I>(tokens: &mut Peekable<I>,
                      element_type: String,
                      position: Position)
                      -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let elements = parse_until(tokens, TokenKind::RBrack)?;

    Ok(Node::Array { element_type,
                     elements,
                     position })
}

/// Parses expressions up to and including `closing`.
///
/// Commas between items are optional.
///
/// Grammar (simplified): `list := (expression ","?)* closing`
fn parse_until<'a, I>(tokens: &mut Peekable<I>, closing: TokenKind) -> ParseResult<Vec<Node>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut items = Vec::new();
    while !accept(tokens, closing) {
        items.push(parse_expression(tokens)?);
        accept(tokens, TokenKind::Comma);
    }
    Ok(items)
}
