//! Lexical analysis
use crate::{constants::MAX_INT, error::LexError};

use super::{
    cursor::Cursor,
    tokens::{Keyword, Span, Symbol, Token, TokenKind},
};

/// Tokenizer with a single current token.
///
/// The tokenizer starts without a current token. Each call to
/// [`advance`](Tokenizer::advance) scans the next token and makes it
/// current; the accessors then classify it.
pub struct Tokenizer<'a> {
    /// Character scanner
    cursor: Cursor<'a>,
    /// Keep reference to the source so the accessors can
    /// slice fragments from it.
    original: &'a str,
    /// Position of the first character of the token being scanned.
    start: Span,
    current: Option<Token>,
    /// Error found while looking ahead in [`has_more`](Tokenizer::has_more),
    /// reported by the next [`advance`](Tokenizer::advance).
    pending: Option<LexError>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source_code: &'a str) -> Self {
        let mut cursor = Cursor::new(source_code);

        // Initial state of the cursor is a non-existant EOF char,
        // but the tokenizer expects to sit on the first character
        // of the remaining source.
        cursor.next();

        Self {
            cursor,
            original: source_code,
            start: Span::default(),
            current: None,
            pending: None,
        }
    }

    /// Original source code that was passed in during construction.
    pub fn source_code(&self) -> &'a str {
        self.original
    }

    /// Indicates whether another token follows, after skipping
    /// whitespace and comments.
    ///
    /// Also returns `true` when skipping hits a lexical error, such as an
    /// unterminated comment, so the next [`advance`](Tokenizer::advance)
    /// can report it.
    pub fn has_more(&mut self) -> bool {
        if self.pending.is_some() {
            return true;
        }

        match self.skip_trivia() {
            Ok(()) => !self.cursor.at_end(),
            Err(err) => {
                self.pending = Some(err);
                true
            }
        }
    }

    /// Scan the next token and make it the current token.
    ///
    /// Each call starts with the cursor on the first character of the
    /// remaining source, and finishes with the cursor on the first character
    /// after the token.
    pub fn advance(&mut self) -> Result<(), LexError> {
        if let Some(err) = self.pending.take() {
            return Err(err);
        }

        self.skip_trivia()?;

        if self.cursor.at_end() {
            return Err(LexError::EndOfInput);
        }

        self.start_token();

        let kind = match self.cursor.current() {
            '"' => self.consume_string()?,
            c if is_digit(c) => self.consume_number()?,
            c if is_letter(c) => self.consume_ident(),
            c => match Symbol::parse(c) {
                Some(symbol) => TokenKind::Symbol(symbol),
                None => {
                    return Err(LexError::UnknownCharacter {
                        c,
                        span: self.make_span(),
                    })
                }
            },
        };

        let token = self.make_token(kind);
        log::trace!("token {:?} {:?}", token.kind, token.span.fragment(self.original));
        self.current = Some(token);

        Ok(())
    }

    /// The current token, or `None` before the first advance.
    #[inline]
    pub fn token(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    #[inline]
    pub fn kind(&self) -> Option<TokenKind> {
        self.current.as_ref().map(|token| token.kind)
    }

    #[inline]
    pub fn span(&self) -> Option<Span> {
        self.current.as_ref().map(|token| token.span)
    }

    /// Source text of the current token.
    pub fn lexeme(&self) -> &'a str {
        match &self.current {
            Some(token) => token.span.fragment(self.original),
            None => "",
        }
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind()? {
            TokenKind::Keyword(keyword) => Some(keyword),
            _ => None,
        }
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self.kind()? {
            TokenKind::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn identifier(&self) -> Option<&'a str> {
        match self.kind()? {
            TokenKind::Ident => Some(self.lexeme()),
            _ => None,
        }
    }

    pub fn int_val(&self) -> Option<u16> {
        match self.kind()? {
            TokenKind::Int(value) => Some(value),
            _ => None,
        }
    }

    /// Contents of the current string constant, without the enclosing quotes.
    pub fn string_val(&self) -> Option<&'a str> {
        match self.kind()? {
            TokenKind::Str => {
                let lexeme = self.lexeme();
                Some(&lexeme[1..lexeme.len() - 1])
            }
            _ => None,
        }
    }

    /// Primes the tokenizer to record a new token.
    fn start_token(&mut self) {
        self.start = Span {
            index: self.cursor.offset() as u32,
            size: 0,
            line: self.cursor.line(),
            column: self.cursor.column(),
        };
    }

    /// Span from the start of the current token up to and including
    /// the cursor's current character.
    fn make_span(&mut self) -> Span {
        let end = self.cursor.peek_offset() as u32;
        debug_assert!(end >= self.start.index);

        Span {
            size: end - self.start.index,
            ..self.start
        }
    }

    /// Build a token ending at the cursor's current character, and move
    /// the cursor to the first character of whatever follows.
    fn make_token(&mut self, kind: TokenKind) -> Token {
        let token = Token {
            span: self.make_span(),
            kind,
        };

        self.cursor.next();
        debug_assert_eq!(self.cursor.offset() as u32, token.span.end());

        token
    }
}

/// Trivia and specialised tokens.
impl<'a> Tokenizer<'a> {
    /// Erase whitespace and comments up to the next token, or the end of source.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            if self.cursor.at_end() {
                return Ok(());
            }

            match (self.cursor.current(), self.cursor.peek()) {
                (c, _) if is_whitespace(c) => {
                    self.cursor.next();
                }
                ('/', '/') => self.erase_line_comment(),
                ('/', '*') => self.erase_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    /// Erase comment line up to, but not including, the trailing newline.
    fn erase_line_comment(&mut self) {
        debug_assert_eq!(self.cursor.current(), '/');

        while !self.cursor.at_end() && !is_newline(self.cursor.current()) {
            self.cursor.next();
        }
    }

    /// Erase a `/* */` or `/** */` comment, including the closing `*/`.
    fn erase_block_comment(&mut self) -> Result<(), LexError> {
        debug_assert_eq!(self.cursor.current(), '/');

        self.start_token();
        let span = Span { size: 2, ..self.start };

        // Opening `/*`
        self.cursor.next();
        self.cursor.next();

        loop {
            if self.cursor.at_end() {
                return Err(LexError::UnterminatedComment { span });
            }

            if self.cursor.current() == '*' && self.cursor.peek() == '/' {
                self.cursor.next();
                self.cursor.next();
                return Ok(());
            }

            self.cursor.next();
        }
    }

    fn consume_ident(&mut self) -> TokenKind {
        debug_assert!(is_letter(self.cursor.current()));

        while is_ident_char(self.cursor.peek()) {
            self.cursor.next();
        }

        // A reserved word is a keyword, never a user defined identifier.
        let fragment = self.make_span().fragment(self.original);
        match Keyword::parse(fragment) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Ident,
        }
    }

    /// Scan a decimal literal and check it fits in a positive machine word.
    fn consume_number(&mut self) -> Result<TokenKind, LexError> {
        debug_assert!(is_digit(self.cursor.current()));

        while is_digit(self.cursor.peek()) {
            self.cursor.next();
        }

        let span = self.make_span();
        let fragment = span.fragment(self.original);

        match fragment.parse::<u16>() {
            Ok(value) if value <= MAX_INT => Ok(TokenKind::Int(value)),
            _ => Err(LexError::IntegerOverflow {
                literal: fragment.into(),
                span,
            }),
        }
    }

    /// Scan a string literal, leaving the cursor on the closing quote.
    fn consume_string(&mut self) -> Result<TokenKind, LexError> {
        debug_assert_eq!(self.cursor.current(), '"');

        let span = Span { size: 1, ..self.start };

        loop {
            self.cursor.next();

            if self.cursor.at_end() {
                return Err(LexError::UnterminatedString { span });
            }

            if self.cursor.current() == '"' {
                return Ok(TokenKind::Str);
            }
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0020}' // space
            | '\u{0009}' // tab
            | '\u{000A}' // line feed
            | '\u{000D}' // carriage return
            | '\u{000C}' // form feed
            | '\u{00A0}' // no-break space
            | '\u{FEFF}' // zero width no-break space
    )
}

fn is_newline(c: char) -> bool {
    matches!(c, '\r' | '\n')
}

#[allow(clippy::manual_is_ascii_check)] // consistency with other functions
fn is_digit(c: char) -> bool {
    matches!(c, '0'..='9')
}

fn is_letter(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z')
}

fn is_ident_char(c: char) -> bool {
    is_letter(c) || is_digit(c) || c == '_'
}

impl<'a> IntoIterator for Tokenizer<'a> {
    type Item = Result<Token, LexError>;
    type IntoIter = TokenizerIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        TokenizerIter {
            tokenizer: self,
            done: false,
        }
    }
}

/// Convenience iterator that wraps the tokenizer.
///
/// Stops after the last token, or after the first error.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct TokenizerIter<'a> {
    done: bool,
    tokenizer: Tokenizer<'a>,
}

impl<'a> TokenizerIter<'a> {
    pub fn source_code(&self) -> &'a str {
        self.tokenizer.source_code()
    }
}

impl<'a> Iterator for TokenizerIter<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || !self.tokenizer.has_more() {
            return None;
        }

        match self.tokenizer.advance() {
            Ok(()) => self.tokenizer.token().cloned().map(Ok),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
