//! Result and errors.
use std::{
    fmt::{self, Display, Formatter},
    io,
    string::FromUtf8Error,
};

use itertools::Itertools;
use smol_str::SmolStr;

use crate::{
    constants::MAX_INT,
    symbols::Scope,
    tokenizer::{Keyword, Span, Symbol},
};

pub type JackResult<T> = std::result::Result<T, JackError>;

#[derive(Debug)]
pub enum JackError {
    Lex(LexError),
    Grammar(GrammarError),
    Symbol(SymbolError),
    /// Instruction that the emitter refuses to produce.
    Emit(&'static str),
    Io(io::Error),
    Utf8(FromUtf8Error),
}

impl Display for JackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(err) => write!(f, "lexical error: {}", err),
            Self::Grammar(err) => write!(f, "syntax error: {}", err),
            Self::Symbol(err) => write!(f, "symbol error: {}", err),
            Self::Emit(msg) => write!(f, "code generation error: {}", msg),
            Self::Io(err) => write!(f, "{}", err),
            Self::Utf8(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for JackError {}

impl From<LexError> for JackError {
    fn from(err: LexError) -> Self {
        JackError::Lex(err)
    }
}

impl From<GrammarError> for JackError {
    fn from(err: GrammarError) -> Self {
        JackError::Grammar(err)
    }
}

impl From<SymbolError> for JackError {
    fn from(err: SymbolError) -> Self {
        JackError::Symbol(err)
    }
}

impl From<io::Error> for JackError {
    fn from(err: io::Error) -> Self {
        JackError::Io(err)
    }
}

impl From<FromUtf8Error> for JackError {
    fn from(err: FromUtf8Error) -> Self {
        JackError::Utf8(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    UnknownCharacter { c: char, span: Span },
    UnterminatedString { span: Span },
    UnterminatedComment { span: Span },
    /// Integer literal that does not fit in the 15 bits of a positive machine word.
    IntegerOverflow { literal: SmolStr, span: Span },
    /// Attempt to advance past the last token.
    EndOfInput,
}

impl Display for LexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCharacter { c, span } => {
                write!(f, "{}: unknown character {:?}", span, c)
            }
            Self::UnterminatedString { span } => {
                write!(f, "{}: unterminated string constant", span)
            }
            Self::UnterminatedComment { span } => {
                write!(f, "{}: unterminated comment", span)
            }
            Self::IntegerOverflow { literal, span } => write!(
                f,
                "{}: integer constant {} exceeds maximum {}",
                span, literal, MAX_INT
            ),
            Self::EndOfInput => write!(f, "unexpected end of input"),
        }
    }
}

impl std::error::Error for LexError {}

/// Error returned when the current token does not fit the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarError {
    pub expected: Expected,
    /// Description of the encountered token.
    pub found: String,
    pub span: Option<Span>,
}

/// Set of constructs the parser was prepared to accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    Keywords(Vec<Keyword>),
    Symbols(Vec<Symbol>),
    Identifier,
    /// `int`, `char`, `boolean` or a class name.
    Type,
    Term,
    /// `(` or `.` following the name of a subroutine call.
    Call,
    EndOfInput,
}

impl Display for Expected {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keywords(keywords) => write_one_of(f, "keyword", keywords),
            Self::Symbols(symbols) => write_one_of(f, "symbol", symbols),
            Self::Identifier => write!(f, "identifier"),
            Self::Type => write!(f, "type"),
            Self::Term => write!(f, "term"),
            Self::Call => write!(f, "subroutine call"),
            Self::EndOfInput => write!(f, "end of input"),
        }
    }
}

fn write_one_of<T: Display>(f: &mut Formatter<'_>, what: &str, items: &[T]) -> fmt::Result {
    let quoted = items.iter().map(|item| format!("'{}'", item)).join(", ");
    if items.len() == 1 {
        write!(f, "{} {}", what, quoted)
    } else {
        write!(f, "one of {}s {}", what, quoted)
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(span) = self.span {
            write!(f, "{}: ", span)?;
        }
        write!(f, "expected {}, found {}", self.expected, self.found)
    }
}

impl std::error::Error for GrammarError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    /// Name already defined in the same scope.
    Duplicate { name: SmolStr, scope: Scope },
    /// Reference to a name that is not a variable in either scope.
    Undefined { name: SmolStr },
}

impl Display for SymbolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { name, scope } => {
                write!(f, "'{}' is already defined in {} scope", name, scope)
            }
            Self::Undefined { name } => write!(f, "undefined variable '{}'", name),
        }
    }
}

impl std::error::Error for SymbolError {}
