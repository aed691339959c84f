//! Character scanner.
use std::{iter::Peekable, str::CharIndices};

/// Stand-in character returned once the source is exhausted.
///
/// Source text may contain actual null characters, so
/// [`Cursor::at_end`] is the authority on whether the end
/// has been reached.
pub(crate) const EOF_CHAR: char = '\0';

pub(crate) struct Cursor<'a> {
    chars: Peekable<CharIndices<'a>>,
    /// Number of bytes in the source.
    len: usize,
    /// Byte position and value of the current character.
    current: (usize, char),
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            len: source.len(),
            current: (0, EOF_CHAR),
            line: 1,
            column: 0,
        }
    }

    /// Advance the cursor and return the new current character.
    pub(crate) fn next(&mut self) -> char {
        let prev = self.current.1;

        match self.chars.next() {
            Some((index, c)) => {
                if prev == '\n' {
                    self.line += 1;
                    self.column = 1;
                } else {
                    self.column += 1;
                }
                self.current = (index, c);
            }
            None => {
                // There is no end-of-file character in the source,
                // so the position is set one past the last byte.
                self.current = (self.len, EOF_CHAR);
            }
        }

        self.current.1
    }

    #[inline]
    pub(crate) fn current(&self) -> char {
        self.current.1
    }

    /// Character after the current one, without advancing.
    #[inline]
    pub(crate) fn peek(&mut self) -> char {
        self.chars.peek().map(|(_, c)| *c).unwrap_or(EOF_CHAR)
    }

    /// Byte offset of the current character.
    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.current.0
    }

    /// Byte offset of the character after the current one.
    #[inline]
    pub(crate) fn peek_offset(&mut self) -> usize {
        self.chars.peek().map(|(i, _)| *i).unwrap_or(self.len)
    }

    #[inline]
    pub(crate) fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub(crate) fn column(&self) -> u32 {
        self.column
    }

    #[inline]
    pub(crate) fn at_end(&self) -> bool {
        self.current.0 >= self.len
    }
}
