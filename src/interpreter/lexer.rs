use logos::Logos;

use crate::{
    ast::Position,
    error::{LexError, LexErrorKind},
};

/// The kind of a lexical token.
///
/// Keywords, aliases and operator symbols are all resolved through
/// [`KEYWORDS`]; anything that is not in the table is an identifier (for
/// words) or `Unknown` (for symbols).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A variable, function or type name.
    Ident,
    /// An integer literal.
    Int,
    /// A string literal.
    Str,
    /// A `|comment|`.
    Comment,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `==`, `is`
    Eq,
    /// `!=`, `not`
    Neq,
    /// `<`
    Less,
    /// `>`
    Great,
    /// `<=`, `le`
    Le,
    /// `>=`, `ge`
    Ge,
    /// `in`
    In,
    /// `and`
    And,
    /// `or`
    Or,
    /// `=`
    Assign,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `;`
    EndLn,
    /// `{`
    Then,
    /// `}`
    BlockEnd,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBrack,
    /// `]`
    RBrack,
    /// `->`
    RArrow,
    /// `$`
    Cmpt,
    /// `@`
    Alc,
    /// `!`
    Bang,
    /// `if`
    If,
    /// `else`
    Else,
    /// `print`
    Print,
    /// `echo`
    Echo,
    /// `var`
    Var,
    /// `input`
    Input,
    /// `func`
    Func,
    /// `return`
    Return,
    /// `import`, `soul`
    Run,
    /// `alg`
    Algebra,
    /// `while`
    While,
    /// `ret`
    Ret,
    /// `break`
    Break,
    /// `assert`
    Assert,
    /// `try`
    Try,
    /// `except`
    Except,
    /// `raise`
    Raise,
    /// `True`
    True,
    /// `False`
    False,
    /// `None`
    None,
    /// `init`
    Init,
    /// `nl`
    Newline,
    /// `match`
    Match,
    /// `with`
    With,
    /// `switch`
    Switch,
    /// `case`
    Case,
    /// `cat`, `category`
    Cat,
    /// `lambda`
    Lambda,
    /// `next`
    Next,
    /// Unrecognized or malformed input.
    Unknown,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns a human readable description used in syntax errors.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Ident => "identifier",
            Self::Int => "integer",
            Self::Str => "string",
            Self::Comment => "comment",
            Self::Unknown => "unknown token",
            Self::Eof => "end of input",
            kind => KEYWORDS.iter()
                            .find(|(_, candidate)| *candidate == kind)
                            .map_or("token", |(text, _)| *text),
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ident
            | Self::Int
            | Self::Str
            | Self::Comment
            | Self::Unknown
            | Self::Eof => write!(f, "{}", self.describe()),
            _ => write!(f, "'{}'", self.describe()),
        }
    }
}

/// Keyword, alias and operator table.
///
/// The first spelling listed for a kind is the one used in error messages.
pub const KEYWORDS: &[(&str, TokenKind)] = &[("+", TokenKind::Plus),
                                             ("-", TokenKind::Minus),
                                             ("*", TokenKind::Mul),
                                             ("/", TokenKind::Div),
                                             ("==", TokenKind::Eq),
                                             ("is", TokenKind::Eq),
                                             ("!=", TokenKind::Neq),
                                             ("not", TokenKind::Neq),
                                             ("<", TokenKind::Less),
                                             (">", TokenKind::Great),
                                             ("<=", TokenKind::Le),
                                             ("le", TokenKind::Le),
                                             (">=", TokenKind::Ge),
                                             ("ge", TokenKind::Ge),
                                             ("in", TokenKind::In),
                                             ("and", TokenKind::And),
                                             ("or", TokenKind::Or),
                                             ("=", TokenKind::Assign),
                                             (".", TokenKind::Dot),
                                             (",", TokenKind::Comma),
                                             (":", TokenKind::Colon),
                                             (";", TokenKind::EndLn),
                                             ("{", TokenKind::Then),
                                             ("}", TokenKind::BlockEnd),
                                             ("(", TokenKind::LParen),
                                             (")", TokenKind::RParen),
                                             ("[", TokenKind::LBrack),
                                             ("]", TokenKind::RBrack),
                                             ("->", TokenKind::RArrow),
                                             ("$", TokenKind::Cmpt),
                                             ("@", TokenKind::Alc),
                                             ("!", TokenKind::Bang),
                                             ("if", TokenKind::If),
                                             ("else", TokenKind::Else),
                                             ("print", TokenKind::Print),
                                             ("echo", TokenKind::Echo),
                                             ("var", TokenKind::Var),
                                             ("input", TokenKind::Input),
                                             ("func", TokenKind::Func),
                                             ("return", TokenKind::Return),
                                             ("import", TokenKind::Run),
                                             ("soul", TokenKind::Run),
                                             ("alg", TokenKind::Algebra),
                                             ("while", TokenKind::While),
                                             ("ret", TokenKind::Ret),
                                             ("break", TokenKind::Break),
                                             ("assert", TokenKind::Assert),
                                             ("try", TokenKind::Try),
                                             ("except", TokenKind::Except),
                                             ("raise", TokenKind::Raise),
                                             ("True", TokenKind::True),
                                             ("False", TokenKind::False),
                                             ("None", TokenKind::None),
                                             ("init", TokenKind::Init),
                                             ("nl", TokenKind::Newline),
                                             ("match", TokenKind::Match),
                                             ("with", TokenKind::With),
                                             ("switch", TokenKind::Switch),
                                             ("case", TokenKind::Case),
                                             ("cat", TokenKind::Cat),
                                             ("category", TokenKind::Cat),
                                             ("lambda", TokenKind::Lambda),
                                             ("next", TokenKind::Next)];

/// Looks a spelling up in [`KEYWORDS`].
#[must_use]
pub fn lookup_keyword(text: &str) -> Option<TokenKind> {
    KEYWORDS.iter()
            .find(|(spelling, _)| *spelling == text)
            .map(|(_, kind)| *kind)
}

/// The payload carried by a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenData {
    /// No payload.
    Empty,
    /// The value of an integer literal.
    Integer(i64),
    /// Identifier text, literal contents, or the matched characters.
    Text(String),
}

/// A lexical token with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Line of the first character, starting at 1.
    pub row:    usize,
    /// Column of the first character, starting at 1.
    pub column: usize,
    /// What the token is.
    pub kind:   TokenKind,
    /// The token's payload.
    pub data:   TokenData,
}

impl Token {
    /// Creates a token at `position`.
    #[must_use]
    pub const fn new(position: Position, kind: TokenKind, data: TokenData) -> Self {
        Self { row: position.row,
               column: position.column,
               kind,
               data }
    }

    /// Returns the token's location.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.row, self.column)
    }

    /// Returns the textual payload, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.data {
            TokenData::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.data) {
            (TokenKind::Ident, TokenData::Text(text)) => write!(f, "identifier '{text}'"),
            (TokenKind::Int, TokenData::Integer(value)) => write!(f, "integer {value}"),
            (TokenKind::Str, TokenData::Text(text)) => write!(f, "string \"{text}\""),
            (TokenKind::Unknown, TokenData::Text(text)) => write!(f, "unknown token '{text}'"),
            (kind, _) => write!(f, "{kind}"),
        }
    }
}

/// The body of a delimited literal as scanned by the raw lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Delimited {
    text:       String,
    terminated: bool,
}

/// Raw tokens recognized by logos before keyword resolution and position
/// tracking.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(skip r"[ \t\f\x0B]+")]
enum RawToken {
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,
    #[regex(r"[0-9]+")]
    Digits,
    #[token("\"", |lex| scan_delimited(lex, '"'))]
    #[token("'", |lex| scan_delimited(lex, '\''))]
    Quoted(Delimited),
    #[token("|", |lex| scan_delimited(lex, '|'))]
    Comment(Delimited),
    #[regex(r"==|!=|>=|<=|->")]
    Compound,
    #[regex(r"[{}()+\-*/=;,!<>:\[\].@$]")]
    Symbol,
    #[regex(r"\r\n|\r|\n")]
    Newline,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current row and the byte offset where it starts, from which
/// token columns are derived.
#[derive(Debug)]
pub struct LexerExtras {
    /// The current line number, starting at 1.
    pub row:        usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { row:        1,
               line_start: 0, }
    }
}

impl LexerExtras {
    fn start_line(&mut self, line_start: usize) {
        self.row += 1;
        self.line_start = line_start;
    }

    /// Accounts for the line breaks inside a multi-line literal starting at
    /// byte `offset`.
    fn track_newlines(&mut self, text: &str, offset: usize) {
        let mut chars = text.char_indices().peekable();
        while let Some((index, character)) = chars.next() {
            match character {
                '\r' if matches!(chars.peek(), Some((_, '\n'))) => {},
                '\r' | '\n' => self.start_line(offset + index + 1),
                _ => {},
            }
        }
    }
}

/// Scans up to and including the closing `delimiter`.
///
/// When the delimiter never appears, the rest of the input is consumed and the
/// literal is marked unterminated.
fn scan_delimited(lex: &mut logos::Lexer<RawToken>, delimiter: char) -> Delimited {
    let remainder = lex.remainder();
    if let Some(end) = remainder.find(delimiter) {
        let text = remainder[..end].to_string();
        lex.bump(end + delimiter.len_utf8());
        Delimited { text,
                    terminated: true }
    } else {
        let text = remainder.to_string();
        lex.bump(remainder.len());
        Delimited { text,
                    terminated: false }
    }
}

/// A pull-based tokenizer.
///
/// Yields tokens lazily and finishes with exactly one `Eof` token. Malformed
/// input never stops the stream: it becomes an `Unknown` token, and for
/// unterminated literals and oversized integers a [`LexError`] is recorded in
/// [`Lexer::diagnostics`].
///
/// # Examples
/// ```
/// use soul::interpreter::lexer::{Lexer, TokenKind};
///
/// let kinds: Vec<TokenKind> = Lexer::new("var x = 1").map(|token| token.kind).collect();
/// assert_eq!(kinds,
///            vec![TokenKind::Var, TokenKind::Ident, TokenKind::Assign, TokenKind::Int,
///                 TokenKind::Eof]);
/// ```
pub struct Lexer<'src> {
    inner:       logos::Lexer<'src, RawToken>,
    diagnostics: Vec<LexError>,
    finished:    bool,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer over `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { inner:       RawToken::lexer_with_extras(source, LexerExtras::default()),
               diagnostics: Vec::new(),
               finished:    false, }
    }

    /// Returns the diagnostics recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[LexError] {
        &self.diagnostics
    }

    /// Consumes the lexer, returning its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<LexError> {
        self.diagnostics
    }

    fn position_of(&self, offset: usize) -> Position {
        let extras = &self.inner.extras;
        let source = self.inner.source();
        let start = extras.line_start.min(offset);
        let column = source[start..offset].chars().count() + 1;
        Position::new(extras.row, column)
    }

    fn diagnose(&mut self, kind: LexErrorKind, position: Position) {
        let diagnostic = LexError { kind, position };
        tracing::debug!(%diagnostic, "lexer diagnostic");
        self.diagnostics.push(diagnostic);
    }

    fn delimited(&mut self,
                 literal: Delimited,
                 span_start: usize,
                 position: Position,
                 kind: TokenKind,
                 unterminated: LexErrorKind)
                 -> Token {
        let slice = self.inner.slice();
        self.inner.extras.track_newlines(slice, span_start);
        if literal.terminated {
            Token::new(position, kind, TokenData::Text(literal.text))
        } else {
            self.diagnose(unterminated, position);
            Token::new(position, TokenKind::Unknown, TokenData::Text(literal.text))
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        loop {
            let Some(raw) = self.inner.next() else {
                self.finished = true;
                let end = self.inner.source().len();
                return Some(Token::new(self.position_of(end), TokenKind::Eof, TokenData::Empty));
            };

            let span = self.inner.span();
            let slice = self.inner.slice();
            let position = self.position_of(span.start);

            let token = match raw {
                Ok(RawToken::Word) => {
                    let kind = lookup_keyword(slice).unwrap_or(TokenKind::Ident);
                    Token::new(position, kind, TokenData::Text(slice.to_string()))
                },
                Ok(RawToken::Digits) => {
                    if let Ok(value) = slice.parse::<i64>() {
                        Token::new(position, TokenKind::Int, TokenData::Integer(value))
                    } else {
                        self.diagnose(LexErrorKind::IntegerTooLarge(slice.to_string()), position);
                        Token::new(position, TokenKind::Unknown, TokenData::Text(slice.to_string()))
                    }
                },
                Ok(RawToken::Quoted(literal)) => self.delimited(literal,
                                                                span.start,
                                                                position,
                                                                TokenKind::Str,
                                                                LexErrorKind::UnterminatedString),
                Ok(RawToken::Comment(literal)) => self.delimited(literal,
                                                                 span.start,
                                                                 position,
                                                                 TokenKind::Comment,
                                                                 LexErrorKind::UnterminatedComment),
                Ok(RawToken::Compound | RawToken::Symbol) => {
                    let kind = lookup_keyword(slice).unwrap_or(TokenKind::Unknown);
                    Token::new(position, kind, TokenData::Text(slice.to_string()))
                },
                Ok(RawToken::Newline) => {
                    self.inner.extras.start_line(span.end);
                    continue;
                },
                Err(()) => Token::new(position, TokenKind::Unknown, TokenData::Text(slice.to_string())),
            };

            return Some(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).map(|token| token.kind).collect()
    }

    #[test]
    fn resolves_keywords_and_aliases() {
        assert_eq!(kinds("if x is 1 and y not 2"),
                   vec![TokenKind::If,
                        TokenKind::Ident,
                        TokenKind::Eq,
                        TokenKind::Int,
                        TokenKind::And,
                        TokenKind::Ident,
                        TokenKind::Neq,
                        TokenKind::Int,
                        TokenKind::Eof]);
        assert_eq!(kinds("import category nl"),
                   vec![TokenKind::Run, TokenKind::Cat, TokenKind::Newline, TokenKind::Eof]);
    }

    #[test]
    fn prefers_two_character_operators() {
        assert_eq!(kinds("a == b >= c <= d != e -> f"),
                   vec![TokenKind::Ident,
                        TokenKind::Eq,
                        TokenKind::Ident,
                        TokenKind::Ge,
                        TokenKind::Ident,
                        TokenKind::Le,
                        TokenKind::Ident,
                        TokenKind::Neq,
                        TokenKind::Ident,
                        TokenKind::RArrow,
                        TokenKind::Ident,
                        TokenKind::Eof]);
    }

    #[test]
    fn failed_companion_keeps_lookahead() {
        assert_eq!(kinds("=>"), vec![TokenKind::Assign, TokenKind::Great, TokenKind::Eof]);
        assert_eq!(kinds("-1"), vec![TokenKind::Minus, TokenKind::Int, TokenKind::Eof]);
    }

    #[test]
    fn tracks_rows_and_columns() {
        let tokens: Vec<Token> = Lexer::new("var x\r\n  print x\ry").collect();
        let positions: Vec<(usize, usize)> =
            tokens.iter().map(|token| (token.row, token.column)).collect();
        assert_eq!(positions, vec![(1, 1), (1, 5), (2, 3), (2, 9), (3, 1), (3, 2)]);
    }

    #[test]
    fn blank_lines_only_advance_rows() {
        let source = format!("a{}\t b", " \n".repeat(50_000));
        let tokens: Vec<Token> = Lexer::new(&source).collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].position(), Position::new(50_001, 3));
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn strings_keep_raw_contents() {
        let tokens: Vec<Token> = Lexer::new("\"a b\" 'c\"d'").collect();
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].text(), Some("a b"));
        assert_eq!(tokens[1].text(), Some("c\"d"));
        assert_eq!(tokens[1].column, 7);
    }

    #[test]
    fn multi_line_string_advances_rows() {
        let tokens: Vec<Token> = Lexer::new("'a\nb' x").collect();
        assert_eq!(tokens[0].position(), Position::new(1, 1));
        assert_eq!(tokens[1].position(), Position::new(2, 4));
    }

    #[test]
    fn unterminated_string_is_recoverable() {
        let mut lexer = Lexer::new("\"abc");
        let token = lexer.next().unwrap();
        assert_eq!(token.kind, TokenKind::Unknown);
        assert_eq!(token.text(), Some("abc"));
        assert_eq!(lexer.next().map(|token| token.kind), Some(TokenKind::Eof));
        assert_eq!(lexer.next(), None);
        assert_eq!(lexer.diagnostics().len(), 1);
        assert!(lexer.diagnostics()[0].is_unterminated());
    }

    #[test]
    fn comments_are_tokens() {
        let tokens: Vec<Token> = Lexer::new("|note| 1").collect();
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text(), Some("note"));

        let mut lexer = Lexer::new("| open");
        assert_eq!(lexer.next().map(|token| token.kind), Some(TokenKind::Unknown));
        assert_eq!(lexer.diagnostics()[0].kind, LexErrorKind::UnterminatedComment);
    }

    #[test]
    fn oversized_integer_is_unknown() {
        let mut lexer = Lexer::new("99999999999999999999");
        assert_eq!(lexer.next().map(|token| token.kind), Some(TokenKind::Unknown));
        assert!(matches!(lexer.diagnostics()[0].kind, LexErrorKind::IntegerTooLarge(_)));
    }

    #[test]
    fn unrecognized_character_is_unknown() {
        let tokens: Vec<Token> = Lexer::new("x # y").collect();
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(tokens[1].text(), Some("#"));
        assert_eq!(tokens[2].kind, TokenKind::Ident);
    }
}
