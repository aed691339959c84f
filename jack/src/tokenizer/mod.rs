//! Tokenizer
mod cursor;
mod lexer;
mod tokens;

pub use self::{
    lexer::{Tokenizer, TokenizerIter},
    tokens::{Keyword, Span, Symbol, Token, TokenKind},
};
