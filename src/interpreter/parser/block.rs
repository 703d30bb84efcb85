use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{Case, CategoryDef, FunctionDef, Node, Param},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::{ParseResult, parse_expression, parse_statements},
            term::parse_term,
            utils::{accept, expect, parse_identifier, peek_kind, peek_position, unexpected},
        },
    },
};

/// Parses a block delimited by braces.
///
/// Grammar: `block := "{" statements? "}"`
///
/// An empty block parses to a `None` literal.
///
/// # Parameters
/// - `tokens`: Token stream positioned at the opening brace.
///
/// # Returns
/// The block's statements as a single (possibly sequenced) node.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, TokenKind::Then)?.position();

    if accept(tokens, TokenKind::BlockEnd) {
        return Ok(Node::NoneLiteral { position });
    }

    let body = parse_statements(tokens)?;
    expect(tokens, TokenKind::BlockEnd)?;

    Ok(body)
}

/// Parses an `if` statement with an optional `else`.
///
/// Syntax:
/// ```text
///     if <condition> { <then> }
///     if <condition> { <then> } else { <otherwise> }
///     if <condition> { <then> } else <expression>
/// ```
/// The expression form is what makes `else if` chains work.
///
/// # Returns
/// A `Node::If`.
pub fn parse_if<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, TokenKind::If)?.position();
    let condition = parse_expression(tokens)?;
    let then = parse_block(tokens)?;

    let otherwise = if accept(tokens, TokenKind::Else) {
        let branch = if peek_kind(tokens) == TokenKind::Then {
            parse_block(tokens)?
        } else {
            parse_expression(tokens)?
        };
        Some(Box::new(branch))
    } else {
        None
    };

    Ok(Node::If { condition: Box::new(condition),
                  then: Box::new(then),
                  otherwise,
                  position })
}

/// Parses a `while` loop.
///
/// Grammar: `while := "while" "ret"? expression block`
///
/// With `ret`, the loop evaluates to the list of its per-iteration values.
pub fn parse_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, TokenKind::While)?.position();
    let collect = accept(tokens, TokenKind::Ret);
    let condition = parse_expression(tokens)?;
    let body = parse_block(tokens)?;

    Ok(Node::While { condition: Box::new(condition),
                     body: Box::new(body),
                     collect,
                     position })
}

/// Parses a function definition.
///
/// Syntax:
/// ```text
///     func name(a, b: int) { ... }
///     func name(a, b: int) int { ... }
/// ```
/// Parameters without an annotation and a missing return type both default to
/// `any`. Commas between parameters are optional.
///
/// # Errors
/// - `InvalidReturnType` if the annotation is not a type name or `None`.
/// - Any error from the parameter list or body.
pub fn parse_function<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, TokenKind::Func)?.position();
    let (name, _) = parse_identifier(tokens)?;
    expect(tokens, TokenKind::LParen)?;

    let mut params = Vec::new();
    while peek_kind(tokens) == TokenKind::Ident {
        let (param, _) = parse_identifier(tokens)?;
        let declared_type = if accept(tokens, TokenKind::Colon) {
            parse_identifier(tokens)?.0
        } else {
            "any".to_string()
        };
        params.push(Param { name: param,
                            declared_type });
        accept(tokens, TokenKind::Comma);
    }
    expect(tokens, TokenKind::RParen)?;

    let return_type = parse_return_type(tokens)?;
    let body = parse_block(tokens)?;

    Ok(Node::Function(Rc::new(FunctionDef { name,
                                            params,
                                            return_type,
                                            body,
                                            position })))
}

fn parse_return_type<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<String>
    where I: Iterator<Item = &'a Token> + Clone
{
    match peek_kind(tokens) {
        TokenKind::Then => Ok("any".to_string()),
        TokenKind::None => {
            tokens.next();
            Ok("none".to_string())
        },
        TokenKind::Ident => Ok(parse_identifier(tokens)?.0),
        TokenKind::Eof => Err(unexpected(tokens.peek().copied(), "'{'")),
        _ => {
            let position = peek_position(tokens);
            let found = tokens.peek().map(ToString::to_string).unwrap_or_default();
            parse_term(tokens)?;
            Err(ParseError::InvalidReturnType { found, position })
        },
    }
}

/// Parses a category definition.
///
/// Grammar: `category := ("cat" | "category") IDENT (":" term)? block`
///
/// The term after the colon is accepted for compatibility and ignored.
pub fn parse_category<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, TokenKind::Cat)?.position();
    let (name, _) = parse_identifier(tokens)?;
    if accept(tokens, TokenKind::Colon) {
        parse_term(tokens)?;
    }
    let body = parse_block(tokens)?;

    Ok(Node::Category(Rc::new(CategoryDef { name, body, position })))
}

/// Parses `try { body } except [Filter] { handler }`.
pub fn parse_try_except<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, TokenKind::Try)?.position();
    let body = parse_block(tokens)?;
    expect(tokens, TokenKind::Except)?;
    let filter = if peek_kind(tokens) == TokenKind::Ident {
        Some(parse_identifier(tokens)?.0)
    } else {
        None
    };
    let handler = parse_block(tokens)?;

    Ok(Node::TryExcept { body: Box::new(body),
                         filter,
                         handler: Box::new(handler),
                         position })
}

/// Parses `match subject with { key: result, ... }`.
///
/// Commas between arms are optional. Arms keep their source order.
pub fn parse_match<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, TokenKind::Match)?.position();
    let subject = parse_expression(tokens)?;
    expect(tokens, TokenKind::With)?;
    expect(tokens, TokenKind::Then)?;

    let mut cases = Vec::new();
    while !accept(tokens, TokenKind::BlockEnd) {
        let key = parse_expression(tokens)?;
        expect(tokens, TokenKind::Colon)?;
        let result = parse_expression(tokens)?;
        cases.push(Case { key, result });
        accept(tokens, TokenKind::Comma);
    }

    Ok(Node::Match { subject: Box::new(subject),
                     cases,
                     position })
}

/// Parses `switch subject { case key { block }, ... }`.
pub fn parse_switch<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, TokenKind::Switch)?.position();
    let subject = parse_expression(tokens)?;
    expect(tokens, TokenKind::Then)?;

    let mut cases = Vec::new();
    while !accept(tokens, TokenKind::BlockEnd) {
        expect(tokens, TokenKind::Case)?;
        let key = parse_expression(tokens)?;
        let result = parse_block(tokens)?;
        cases.push(Case { key, result });
        accept(tokens, TokenKind::Comma);
    }

    Ok(Node::Switch { subject: Box::new(subject),
                      cases,
                      position })
}
