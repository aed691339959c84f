//! Class and subroutine declarations.
use smol_str::SmolStr;

use super::Engine;
use crate::{
    constants::POINTER_THIS,
    error::{Expected, JackResult},
    symbols::Kind,
    tokenizer::{Keyword, Symbol},
    vm::{CodeEmitter, Segment},
};

impl<'a, E: CodeEmitter> Engine<'a, E> {
    /// `class Name { classVarDec* subroutineDec* }`
    pub(super) fn class(&mut self) -> JackResult<()> {
        self.advance()?;
        self.expect_keyword(&[Keyword::Class])?;

        self.advance()?;
        self.class_name = self.expect_identifier()?;
        log::debug!("compiling class {}", self.class_name);

        self.advance()?;
        self.expect_symbol(Symbol::LeftBrace)?;
        self.advance()?;

        while self.is_keyword(Keyword::Static) || self.is_keyword(Keyword::Field) {
            self.class_var_dec()?;
        }

        while matches!(
            self.tokenizer.keyword(),
            Some(Keyword::Constructor | Keyword::Function | Keyword::Method)
        ) {
            self.subroutine_dec()?;
        }

        self.expect_symbol(Symbol::RightBrace)?;

        // One class per source, nothing may follow it.
        if self.tokenizer.has_more() {
            self.advance()?;
            return Err(self.error(Expected::EndOfInput));
        }

        Ok(())
    }

    /// `(static | field) type name (, name)* ;`
    fn class_var_dec(&mut self) -> JackResult<()> {
        let kind = match self.expect_keyword(&[Keyword::Static, Keyword::Field])? {
            Keyword::Static => Kind::Static,
            _ => Kind::Field,
        };

        self.advance()?;
        let ty = self.expect_type()?;
        self.var_names(ty, kind)
    }

    /// `var type name (, name)* ;`
    fn var_dec(&mut self) -> JackResult<()> {
        self.expect_keyword(&[Keyword::Var])?;

        self.advance()?;
        let ty = self.expect_type()?;
        self.var_names(ty, Kind::Local)
    }

    /// Comma separated names following the type of a declaration,
    /// up to and including the terminating semicolon.
    fn var_names(&mut self, ty: SmolStr, kind: Kind) -> JackResult<()> {
        loop {
            self.advance()?;
            let name = self.expect_identifier()?;
            self.symbols.define(name, ty.clone(), kind)?;

            self.advance()?;
            if !self.is_symbol(Symbol::Comma) {
                break;
            }
        }

        self.expect_symbol(Symbol::Semicolon)?;
        self.advance()
    }

    /// `(constructor | function | method) (void | type) name ( parameterList ) subroutineBody`
    fn subroutine_dec(&mut self) -> JackResult<()> {
        let category = self.expect_keyword(&[
            Keyword::Constructor,
            Keyword::Function,
            Keyword::Method,
        ])?;

        self.symbols.new_subroutine();
        self.if_counter = 0;
        self.while_counter = 0;

        self.advance()?;
        if !self.is_keyword(Keyword::Void) {
            self.expect_type()?;
        }

        self.advance()?;
        let name = self.expect_identifier()?;
        let qualified = SmolStr::from(format!("{}.{}", self.class_name, name));
        log::debug!("compiling {} {}", category, qualified);

        self.advance()?;
        self.expect_symbol(Symbol::LeftParen)?;

        // The receiver is passed as a hidden first argument.
        if category == Keyword::Method {
            self.symbols
                .define("this", self.class_name.clone(), Kind::Argument)?;
        }

        self.advance()?;
        self.parameter_list()?;
        self.expect_symbol(Symbol::RightParen)?;

        self.advance()?;
        self.subroutine_body(qualified, category)
    }

    /// `((type name) (, type name)*)?`
    ///
    /// Does not consume the enclosing parentheses.
    fn parameter_list(&mut self) -> JackResult<()> {
        if self.is_symbol(Symbol::RightParen) {
            return Ok(());
        }

        loop {
            let ty = self.expect_type()?;

            self.advance()?;
            let name = self.expect_identifier()?;
            self.symbols.define(name, ty, Kind::Argument)?;

            self.advance()?;
            if !self.is_symbol(Symbol::Comma) {
                return Ok(());
            }
            self.advance()?;
        }
    }

    /// `{ varDec* statements }`
    fn subroutine_body(&mut self, qualified: SmolStr, category: Keyword) -> JackResult<()> {
        self.expect_symbol(Symbol::LeftBrace)?;
        self.advance()?;

        while self.is_keyword(Keyword::Var) {
            self.var_dec()?;
        }

        let locals = self.symbols.count(Kind::Local);
        self.out.function(qualified, locals)?;

        match category {
            Keyword::Constructor => {
                // Allocate the object before any field is touched.
                let fields = self.symbols.count(Kind::Field);
                self.out.push(Segment::Constant, fields)?;
                self.out.call(self.runtime.alloc.clone(), 1)?;
                self.out.pop(Segment::Pointer, POINTER_THIS)?;
            }
            Keyword::Method => {
                self.out.push(Segment::Argument, 0)?;
                self.out.pop(Segment::Pointer, POINTER_THIS)?;
            }
            _ => {}
        }

        self.statements()?;

        self.expect_symbol(Symbol::RightBrace)?;
        self.advance()
    }
}
