use std::iter::Peekable;

use crate::{
    ast::{Node, RunMode},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            binary::parse_binary,
            block::{
                parse_block, parse_category, parse_function, parse_if, parse_match, parse_switch,
                parse_try_except, parse_while,
            },
            core::{ParseResult, parse_expression},
            utils::{accept, at_statement_end, expect, parse_identifier, peek_kind, unexpected},
        },
    },
};

/// Parses a single statement.
///
/// The next token's kind selects the construct: keyword statements and block
/// forms are dispatched to their parsers, everything else is parsed as an
/// operator expression.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of a statement.
///
/// # Returns
/// The parsed node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    match peek_kind(tokens) {
        TokenKind::If => parse_if(tokens),
        TokenKind::While => parse_while(tokens),
        TokenKind::Func => parse_function(tokens),
        TokenKind::Cat => parse_category(tokens),
        TokenKind::Try => parse_try_except(tokens),
        TokenKind::Match => parse_match(tokens),
        TokenKind::Switch => parse_switch(tokens),
        TokenKind::Print
        | TokenKind::Echo
        | TokenKind::Input
        | TokenKind::Raise
        | TokenKind::Assert => parse_keyword_operand(tokens),
        TokenKind::Var => parse_assignment(tokens),
        TokenKind::Return | TokenKind::Break => parse_jump(tokens),
        TokenKind::Run => parse_run(tokens),
        TokenKind::Init => parse_init(tokens),
        TokenKind::Algebra => {
            expect(tokens, TokenKind::Algebra)?;
            let (name, position) = parse_identifier(tokens)?;
            Ok(Node::AlgebraicVariable { name, position })
        },
        TokenKind::Alc => {
            let position = expect(tokens, TokenKind::Alc)?.position();
            let (name, _) = parse_identifier(tokens)?;
            Ok(Node::AlgebraicCall { name, position })
        },
        TokenKind::Cmpt => {
            let position = expect(tokens, TokenKind::Cmpt)?.position();
            let inner = parse_expression(tokens)?;
            Ok(Node::CompileTime { inner: Box::new(inner),
                                   position })
        },
        _ => parse_binary(tokens),
    }
}

/// Parses the keywords that take one operand: `print`, `echo`, `input`,
/// `raise` and `assert`.
///
/// `assert` takes an operator expression; the others take a full statement
/// form so that e.g. `print if c { 1 } else { 2 }` works.
fn parse_keyword_operand<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(keyword) = tokens.next() else {
        return Err(unexpected(None, "statement"));
    };
    let position = keyword.position();

    if keyword.kind == TokenKind::Assert {
        let value = Box::new(parse_binary(tokens)?);
        return Ok(Node::Assert { value, position });
    }

    let value = Box::new(parse_expression(tokens)?);
    match keyword.kind {
        TokenKind::Print => Ok(Node::Print { value, position }),
        TokenKind::Echo => Ok(Node::Echo { value, position }),
        TokenKind::Input => Ok(Node::Input { prompt: value,
                                             position }),
        TokenKind::Raise => Ok(Node::Raise { value, position }),
        _ => Err(unexpected(Some(keyword), "statement")),
    }
}

/// Parses a variable declaration.
///
/// Grammar: `assignment := "var" IDENT "=" expression`
fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, TokenKind::Var)?.position();
    let (name, _) = parse_identifier(tokens)?;
    expect(tokens, TokenKind::Assign)?;
    let value = parse_expression(tokens)?;

    Ok(Node::Assign { name,
                      value: Box::new(value),
                      position })
}

/// Parses `return [value]` and `break [value]`.
///
/// The value is omitted when the statement ends right after the keyword.
fn parse_jump<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(keyword) = tokens.next() else {
        return Err(unexpected(None, "statement"));
    };
    let position = keyword.position();

    let value = if at_statement_end(tokens) {
        None
    } else {
        Some(Box::new(parse_binary(tokens)?))
    };

    if keyword.kind == TokenKind::Return {
        Ok(Node::Return { value, position })
    } else {
        Ok(Node::Break { value, position })
    }
}

/// Parses an `import` statement.
///
/// Grammar: `run := ("import" | "soul") ("-" ("c" | "r"))* IDENT`
///
/// `-c` transpiles the script instead of including it; `-r` additionally runs
/// the generated file and implies `-c`.
fn parse_run<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, TokenKind::Run)?.position();
    let mut compile = false;
    let mut execute = false;

    while accept(tokens, TokenKind::Minus) {
        let flag = tokens.next_if(|token| token.kind == TokenKind::Ident
                                          && matches!(token.text(), Some("c" | "r")));
        match flag.and_then(Token::text) {
            Some("c") => compile = true,
            Some(_) => execute = true,
            None => return Err(unexpected(tokens.peek().copied(), "'c' or 'r'")),
        }
    }

    let (file, _) = parse_identifier(tokens)?;
    let mode = if compile || execute {
        RunMode::Compile { execute }
    } else {
        RunMode::Include
    };

    Ok(Node::Run { file, mode, position })
}

/// Parses `init: expression` or `init { block }`.
fn parse_init<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, TokenKind::Init)?.position();
    let value = if accept(tokens, TokenKind::Colon) {
        parse_expression(tokens)?
    } else {
        parse_block(tokens)?
    };

    Ok(Node::Init { value: Box::new(value),
                    position })
}
