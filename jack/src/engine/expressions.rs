//! Expressions, terms and subroutine calls.
use smol_str::SmolStr;

use super::Engine;
use crate::{
    conf::Runtime,
    constants::{POINTER_THAT, POINTER_THIS},
    error::{Expected, JackError, JackResult},
    tokenizer::{Keyword, Symbol, TokenKind},
    vm::{ArithmeticOp, CodeEmitter, Instr, Segment, UnaryOp},
};

impl<'a, E: CodeEmitter> Engine<'a, E> {
    /// `term (op term)*`
    ///
    /// Operators have no precedence and are applied strictly left to right.
    pub(super) fn expression(&mut self) -> JackResult<()> {
        self.term()?;

        while let Some(op) = self.tokenizer.symbol().filter(Symbol::is_binary_op) {
            self.advance()?;
            self.term()?;
            self.out.emit(binary_op(op, &self.runtime)?)?;
        }

        Ok(())
    }

    fn term(&mut self) -> JackResult<()> {
        match self.tokenizer.kind() {
            Some(TokenKind::Int(value)) => {
                self.out.push(Segment::Constant, value)?;
                self.advance()
            }
            Some(TokenKind::Str) => {
                let text = self.tokenizer.string_val().unwrap_or_default();
                self.out.string_literal(text, &self.runtime)?;
                self.advance()
            }
            Some(TokenKind::Keyword(keyword)) => self.keyword_constant(keyword),
            Some(TokenKind::Ident) => self.identifier_term(),
            Some(TokenKind::Symbol(Symbol::LeftParen)) => {
                self.advance()?;
                self.expression()?;
                self.expect_symbol(Symbol::RightParen)?;
                self.advance()
            }
            Some(TokenKind::Symbol(Symbol::Minus)) => {
                self.advance()?;
                self.term()?;
                self.out.unary(UnaryOp::Neg)
            }
            Some(TokenKind::Symbol(Symbol::Tilde)) => {
                self.advance()?;
                self.term()?;
                self.out.unary(UnaryOp::Not)
            }
            _ => Err(self.error(Expected::Term)),
        }
    }

    /// `true | false | null | this`
    fn keyword_constant(&mut self, keyword: Keyword) -> JackResult<()> {
        match keyword {
            Keyword::True => {
                // All bits set.
                self.out.push(Segment::Constant, 0)?;
                self.out.unary(UnaryOp::Not)?;
            }
            Keyword::False | Keyword::Null => {
                self.out.push(Segment::Constant, 0)?;
            }
            Keyword::This => {
                self.out.push(Segment::Pointer, POINTER_THIS)?;
            }
            _ => return Err(self.error(Expected::Term)),
        }

        self.advance()
    }

    /// A term starting with a name needs one token of lookahead
    /// to tell variables, array elements and calls apart.
    fn identifier_term(&mut self) -> JackResult<()> {
        let name = self.expect_identifier()?;
        self.advance()?;

        match self.tokenizer.symbol() {
            Some(Symbol::LeftParen | Symbol::Dot) => self.subroutine_call(&name),
            Some(Symbol::LeftBracket) => {
                let (segment, index) = self.resolve(&name)?;

                self.advance()?;
                self.expression()?;
                self.expect_symbol(Symbol::RightBracket)?;

                self.out.push(segment, index)?;
                self.out.arithmetic(ArithmeticOp::Add)?;
                self.out.pop(Segment::Pointer, POINTER_THAT)?;
                self.out.push(Segment::That, 0)?;
                self.advance()
            }
            _ => {
                let (segment, index) = self.resolve(&name)?;
                self.out.push(segment, index)
            }
        }
    }

    /// Compile a call, given the name already consumed before it.
    ///
    /// The current token must be the `(` of a call on the current
    /// object, or the `.` of a qualified call.
    pub(super) fn subroutine_call(&mut self, name: &str) -> JackResult<()> {
        match self.tokenizer.symbol() {
            Some(Symbol::LeftParen) => {
                // Implicit receiver is the current object.
                self.out.push(Segment::Pointer, POINTER_THIS)?;
                let args = self.call_arguments()?;
                self.out
                    .call(format!("{}.{}", self.class_name, name), args + 1)
            }
            Some(Symbol::Dot) => {
                self.advance()?;
                let subroutine = self.expect_identifier()?;
                self.advance()?;

                // A known variable is an object receiver, anything
                // else is taken to be a class name.
                let (class, receiver) = match self.symbols.lookup(name) {
                    Some(symbol) => (symbol.ty.clone(), Some((symbol.kind.segment(), symbol.index))),
                    None => (SmolStr::from(name), None),
                };

                if let Some((segment, index)) = receiver {
                    self.out.push(segment, index)?;
                }

                let args = self.call_arguments()? + u16::from(receiver.is_some());
                self.out.call(format!("{}.{}", class, subroutine), args)
            }
            _ => Err(self.error(Expected::Call)),
        }
    }

    /// `( expressionList )`, returning the number of arguments.
    fn call_arguments(&mut self) -> JackResult<u16> {
        self.expect_symbol(Symbol::LeftParen)?;
        self.advance()?;
        let count = self.expression_list()?;
        self.expect_symbol(Symbol::RightParen)?;
        self.advance()?;
        Ok(count)
    }

    /// `(expression (, expression)*)?`
    fn expression_list(&mut self) -> JackResult<u16> {
        if self.is_symbol(Symbol::RightParen) {
            return Ok(0);
        }

        let mut count = 0;
        loop {
            self.expression()?;
            count += 1;

            if !self.is_symbol(Symbol::Comma) {
                return Ok(count);
            }
            self.advance()?;
        }
    }
}

/// Instruction implementing a binary operator.
///
/// Multiplication and division are left to the runtime.
fn binary_op(op: Symbol, runtime: &Runtime) -> JackResult<Instr> {
    let instr = match op {
        Symbol::Plus => Instr::Arithmetic(ArithmeticOp::Add),
        Symbol::Minus => Instr::Arithmetic(ArithmeticOp::Sub),
        Symbol::Amp => Instr::Arithmetic(ArithmeticOp::And),
        Symbol::Pipe => Instr::Arithmetic(ArithmeticOp::Or),
        Symbol::Less => Instr::Arithmetic(ArithmeticOp::Lt),
        Symbol::Greater => Instr::Arithmetic(ArithmeticOp::Gt),
        Symbol::Eq => Instr::Arithmetic(ArithmeticOp::Eq),
        Symbol::Star => Instr::Call(runtime.multiply.clone(), 2),
        Symbol::Slash => Instr::Call(runtime.divide.clone(), 2),
        _ => return Err(JackError::Emit("not a binary operator")),
    };

    Ok(instr)
}
