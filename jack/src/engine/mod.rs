//! Compilation engine.
//!
//! A recursive-descent parser that emits stack machine code as it goes.
//! There is no syntax tree; each grammar rule consumes its tokens and
//! writes its instructions in a single pass.
//!
//! Every rule is entered with the tokenizer's current token being the first
//! token of the construct, and returns with the current token being the
//! first token after it.
mod class;
mod expressions;
mod statements;

use smol_str::SmolStr;

use crate::{
    conf::{JackConf, Runtime},
    error::{Expected, GrammarError, JackError, JackResult, SymbolError},
    symbols::SymbolTable,
    tokenizer::{Keyword, Symbol, TokenKind, Tokenizer},
    vm::{CodeEmitter, Segment},
};

/// Compiles one class from source text into the given emitter.
///
/// An engine is good for exactly one class, and holds all the
/// state for it. Separate files need separate engines.
pub struct Engine<'a, E> {
    tokenizer: Tokenizer<'a>,
    symbols: SymbolTable,
    out: E,
    runtime: Runtime,
    class_name: SmolStr,
    /// Numbering of `if` labels, restarted for each subroutine.
    if_counter: u32,
    /// Numbering of `while` labels, restarted for each subroutine.
    while_counter: u32,
}

impl<'a, E: CodeEmitter> Engine<'a, E> {
    pub fn new(source_code: &'a str, out: E, conf: &JackConf) -> Self {
        Self {
            tokenizer: Tokenizer::new(source_code),
            symbols: SymbolTable::new(),
            out,
            runtime: conf.runtime.clone(),
            class_name: SmolStr::default(),
            if_counter: 0,
            while_counter: 0,
        }
    }

    /// Compile the whole source as a single class.
    ///
    /// Returns the emitter on success. On failure the emitter is dropped
    /// along with whatever partial output it received.
    pub fn compile_class(mut self) -> JackResult<E> {
        self.class()?;
        Ok(self.out)
    }
}

/// Token helpers
impl<'a, E: CodeEmitter> Engine<'a, E> {
    #[inline]
    fn advance(&mut self) -> JackResult<()> {
        self.tokenizer.advance().map_err(JackError::from)
    }

    #[inline]
    fn is_keyword(&self, keyword: Keyword) -> bool {
        self.tokenizer.keyword() == Some(keyword)
    }

    #[inline]
    fn is_symbol(&self, symbol: Symbol) -> bool {
        self.tokenizer.symbol() == Some(symbol)
    }

    /// Check that the current token is one of the given keywords, and return it.
    fn expect_keyword(&self, keywords: &[Keyword]) -> JackResult<Keyword> {
        match self.tokenizer.keyword() {
            Some(keyword) if keywords.contains(&keyword) => Ok(keyword),
            _ => Err(self.error(Expected::Keywords(keywords.to_vec()))),
        }
    }

    fn expect_symbol(&self, symbol: Symbol) -> JackResult<()> {
        if self.is_symbol(symbol) {
            Ok(())
        } else {
            Err(self.error(Expected::Symbols(vec![symbol])))
        }
    }

    fn expect_identifier(&self) -> JackResult<SmolStr> {
        self.tokenizer
            .identifier()
            .map(SmolStr::from)
            .ok_or_else(|| self.error(Expected::Identifier))
    }

    /// Variable type, either a primitive keyword or a class name.
    fn expect_type(&self) -> JackResult<SmolStr> {
        match self.tokenizer.kind() {
            Some(TokenKind::Keyword(keyword @ (Keyword::Int | Keyword::Char | Keyword::Boolean))) => {
                Ok(SmolStr::from(keyword.as_str()))
            }
            Some(TokenKind::Ident) => Ok(SmolStr::from(self.tokenizer.lexeme())),
            _ => Err(self.error(Expected::Type)),
        }
    }

    /// Resolve a variable to the segment and index it lives at.
    fn resolve(&self, name: &str) -> JackResult<(Segment, u16)> {
        match self.symbols.lookup(name) {
            Some(symbol) => Ok((symbol.kind.segment(), symbol.index)),
            None => Err(SymbolError::Undefined { name: name.into() }.into()),
        }
    }

    #[inline(never)]
    #[cold]
    fn error(&self, expected: Expected) -> JackError {
        GrammarError {
            expected,
            found: self.describe_token(),
            span: self.tokenizer.span(),
        }
        .into()
    }

    fn describe_token(&self) -> String {
        match self.tokenizer.kind() {
            Some(TokenKind::Str) => format!("string constant {}", self.tokenizer.lexeme()),
            Some(kind) => format!("{} '{}'", kind.class_name(), self.tokenizer.lexeme()),
            None => "start of input".to_string(),
        }
    }
}
