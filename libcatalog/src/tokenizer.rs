//! Token stream over catalog text.
//!
//! The parser reads tokens through the [`TokenSource`] trait, one at a time,
//! and may push the most recent token back once. [`Tokenizer`] is the
//! in-memory implementation over a `&str`:
//! - `#` starts a comment running to the end of the line
//! - Numbers: optional sign, digits with an optional fraction, optional exponent
//! - Strings: double-quoted, with `\\ \" \n \t \r \uXXXX` escapes
//! - Names: an ASCII letter or `_`, then letters, digits and `_`
//! - Punctuation: `[ ]` arrays, `{ }` records, `< >` units sections

use crate::error::{ParseContext, ParseError, Result};

/// Token type produced by a [`TokenSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    String,
    Name,
    BeginArray,
    EndArray,
    BeginRecord,
    EndRecord,
    BeginUnits,
    EndUnits,
    /// End of input. Repeats on every further read.
    End,
}

/// A forward-only token stream with a single token of undo.
pub trait TokenSource {
    /// Advance to the next token and return its kind.
    fn next_token(&mut self) -> Result<TokenKind>;

    /// Make the next call to [`next_token`](Self::next_token) return the
    /// current token again. Only one token can be pushed back.
    fn push_back(&mut self);

    /// Value of the current `Number` token.
    fn number_value(&self) -> f64;

    /// Contents of the current `String` token, escapes resolved.
    fn string_value(&self) -> &str;

    /// Text of the current `Name` token.
    fn name_value(&self) -> &str;

    /// Zero-based line and column of the current token.
    fn location(&self) -> (usize, usize);
}

/// A single token with its position.
#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    text: String,
    number: f64,
    line: usize,
    col: usize,
}

impl Token {
    fn new(kind: TokenKind, line: usize, col: usize) -> Self {
        Self {
            kind,
            text: String::new(),
            number: 0.0,
            line,
            col,
        }
    }
}

/// Lexer over catalog source text.
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    ctx: ParseContext,
    current: Token,
    pushed_back: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self::with_context(src, ParseContext::default())
    }

    /// Create a tokenizer whose errors carry the context's filename.
    pub fn with_context(src: &'a str, ctx: ParseContext) -> Self {
        Self {
            src,
            pos: 0,
            line: 0,
            col: 0,
            ctx,
            current: Token::new(TokenKind::End, 0, 0),
            pushed_back: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut n = 0;
        while self.peek().is_some_and(&pred) {
            self.bump();
            n += 1;
        }
        n
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    self.bump_while(|c| c != '\n');
                }
                _ => return,
            }
        }
    }

    fn error(&self, err: ParseError, line: usize, col: usize) -> ParseError {
        err.with_location(&self.ctx, line, col)
    }

    fn lex_number(&mut self, token: &mut Token) -> Result<()> {
        let start = self.pos;
        if matches!(self.peek(), Some('+' | '-')) {
            self.bump();
        }
        let mut digits = self.bump_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') {
            self.bump();
            digits += self.bump_while(|c| c.is_ascii_digit());
        }
        if digits == 0 {
            return Err(self.error(
                ParseError::InvalidNumber(String::new()),
                token.line,
                token.col,
            ));
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.bump_while(|c| c.is_ascii_digit()) == 0 {
                return Err(self.error(
                    ParseError::InvalidNumber(String::new()),
                    token.line,
                    token.col,
                ));
            }
        }
        let text = &self.src[start..self.pos];
        token.number = match text.parse::<f64>() {
            Ok(n) if n.is_finite() => n,
            _ => {
                return Err(self.error(
                    ParseError::InvalidNumber(String::new()),
                    token.line,
                    token.col,
                ))
            }
        };
        token.kind = TokenKind::Number;
        Ok(())
    }

    fn lex_string(&mut self, token: &mut Token) -> Result<()> {
        self.bump(); // opening quote
        let mut out = String::new();
        loop {
            let (line, col) = (self.line, self.col);
            match self.bump() {
                None => {
                    return Err(self.error(
                        ParseError::UnterminatedString(String::new()),
                        token.line,
                        token.col,
                    ))
                }
                Some('"') => break,
                Some('\\') => {
                    let c = self.lex_escape().ok_or_else(|| {
                        self.error(ParseError::BadEscapedChar(String::new()), line, col)
                    })?;
                    out.push(c);
                }
                Some(c) => out.push(c),
            }
        }
        token.kind = TokenKind::String;
        token.text = out;
        Ok(())
    }

    /// Resolve the escape after a backslash.
    fn lex_escape(&mut self) -> Option<char> {
        match self.bump()? {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            '"' => Some('"'),
            '\\' => Some('\\'),
            'u' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    code = code * 16 + self.bump()?.to_digit(16)?;
                }
                char::from_u32(code)
            }
            _ => None,
        }
    }

    fn lex_name(&mut self, token: &mut Token) {
        let start = self.pos;
        self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
        token.kind = TokenKind::Name;
        token.text = self.src[start..self.pos].to_string();
    }
}

impl TokenSource for Tokenizer<'_> {
    fn next_token(&mut self) -> Result<TokenKind> {
        if self.pushed_back {
            self.pushed_back = false;
            return Ok(self.current.kind);
        }

        self.skip_trivia();
        let mut token = Token::new(TokenKind::End, self.line, self.col);

        if let Some(c) = self.peek() {
            let punct = match c {
                '[' => Some(TokenKind::BeginArray),
                ']' => Some(TokenKind::EndArray),
                '{' => Some(TokenKind::BeginRecord),
                '}' => Some(TokenKind::EndRecord),
                '<' => Some(TokenKind::BeginUnits),
                '>' => Some(TokenKind::EndUnits),
                _ => None,
            };
            if let Some(kind) = punct {
                self.bump();
                token.kind = kind;
            } else if c == '"' {
                self.lex_string(&mut token)?;
            } else if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') {
                self.lex_number(&mut token)?;
            } else if c.is_ascii_alphabetic() || c == '_' {
                self.lex_name(&mut token);
            } else {
                return Err(self.error(
                    ParseError::UnexpectedChar(c, String::new()),
                    token.line,
                    token.col,
                ));
            }
        }

        self.current = token;
        Ok(self.current.kind)
    }

    fn push_back(&mut self) {
        debug_assert!(!self.pushed_back, "only one token can be pushed back");
        self.pushed_back = true;
    }

    fn number_value(&self) -> f64 {
        self.current.number
    }

    fn string_value(&self) -> &str {
        &self.current.text
    }

    fn name_value(&self) -> &str {
        &self.current.text
    }

    fn location(&self) -> (usize, usize) {
        (self.current.line, self.current.col)
    }
}

/// Whether `s` lexes as a single name token.
pub(crate) fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
