//! Statements.
use smol_str::SmolStr;

use super::Engine;
use crate::{
    constants::{POINTER_THAT, TEMP_SCRATCH},
    error::JackResult,
    tokenizer::{Keyword, Symbol},
    vm::{ArithmeticOp, CodeEmitter, Segment, UnaryOp},
};

impl<'a, E: CodeEmitter> Engine<'a, E> {
    /// Zero or more statements, ending at the first token that
    /// does not start a statement.
    pub(super) fn statements(&mut self) -> JackResult<()> {
        loop {
            match self.tokenizer.keyword() {
                Some(Keyword::Let) => self.let_statement()?,
                Some(Keyword::If) => self.if_statement()?,
                Some(Keyword::While) => self.while_statement()?,
                Some(Keyword::Do) => self.do_statement()?,
                Some(Keyword::Return) => self.return_statement()?,
                _ => return Ok(()),
            }
        }
    }

    /// `let name ([ expression ])? = expression ;`
    fn let_statement(&mut self) -> JackResult<()> {
        self.advance()?;
        let name = self.expect_identifier()?;
        let (segment, index) = self.resolve(&name)?;

        self.advance()?;
        let is_array = self.is_symbol(Symbol::LeftBracket);
        if is_array {
            self.advance()?;
            self.expression()?;
            self.expect_symbol(Symbol::RightBracket)?;

            // Target address stays on the stack while the value is computed.
            self.out.push(segment, index)?;
            self.out.arithmetic(ArithmeticOp::Add)?;
            self.advance()?;
        }

        self.expect_symbol(Symbol::Eq)?;
        self.advance()?;
        self.expression()?;
        self.expect_symbol(Symbol::Semicolon)?;
        self.advance()?;

        if is_array {
            // The value may itself have used `that`, so the
            // target address is only loaded once it's computed.
            self.out.pop(Segment::Temp, TEMP_SCRATCH)?;
            self.out.pop(Segment::Pointer, POINTER_THAT)?;
            self.out.push(Segment::Temp, TEMP_SCRATCH)?;
            self.out.pop(Segment::That, 0)
        } else {
            self.out.pop(segment, index)
        }
    }

    /// `if ( expression ) { statements } (else { statements })?`
    fn if_statement(&mut self) -> JackResult<()> {
        let n = self.if_counter;
        self.if_counter += 1;

        let true_label = SmolStr::from(format!("IF_TRUE_{}", n));
        let false_label = SmolStr::from(format!("IF_FALSE_{}", n));

        self.advance()?;
        self.condition()?;

        self.out.if_goto(true_label.clone())?;
        self.out.goto(false_label.clone())?;
        self.out.label(true_label)?;

        self.block()?;

        if self.is_keyword(Keyword::Else) {
            let end_label = SmolStr::from(format!("IF_END_{}", n));
            self.out.goto(end_label.clone())?;
            self.out.label(false_label)?;

            self.advance()?;
            self.block()?;

            self.out.label(end_label)
        } else {
            self.out.label(false_label)
        }
    }

    /// `while ( expression ) { statements }`
    fn while_statement(&mut self) -> JackResult<()> {
        let n = self.while_counter;
        self.while_counter += 1;

        let exp_label = SmolStr::from(format!("WHILE_EXP_{}", n));
        let end_label = SmolStr::from(format!("WHILE_END_{}", n));

        self.out.label(exp_label.clone())?;

        self.advance()?;
        self.condition()?;

        self.out.unary(UnaryOp::Not)?;
        self.out.if_goto(end_label.clone())?;

        self.block()?;

        self.out.goto(exp_label)?;
        self.out.label(end_label)
    }

    /// `do subroutineCall ;`
    fn do_statement(&mut self) -> JackResult<()> {
        self.advance()?;
        let name = self.expect_identifier()?;

        self.advance()?;
        self.subroutine_call(&name)?;

        self.expect_symbol(Symbol::Semicolon)?;
        self.advance()?;

        // Every call leaves a value, even a void one.
        self.out.pop(Segment::Temp, TEMP_SCRATCH)
    }

    /// `return expression? ;`
    fn return_statement(&mut self) -> JackResult<()> {
        self.advance()?;

        if self.is_symbol(Symbol::Semicolon) {
            self.out.push(Segment::Constant, 0)?;
        } else {
            self.expression()?;
            self.expect_symbol(Symbol::Semicolon)?;
        }

        self.advance()?;
        self.out.ret()
    }

    /// `( expression )`
    fn condition(&mut self) -> JackResult<()> {
        self.expect_symbol(Symbol::LeftParen)?;
        self.advance()?;
        self.expression()?;
        self.expect_symbol(Symbol::RightParen)?;
        self.advance()
    }

    /// `{ statements }`
    fn block(&mut self) -> JackResult<()> {
        self.expect_symbol(Symbol::LeftBrace)?;
        self.advance()?;
        self.statements()?;
        self.expect_symbol(Symbol::RightBrace)?;
        self.advance()
    }
}
