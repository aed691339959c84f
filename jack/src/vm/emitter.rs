//! Code emitter interface.
use smol_str::SmolStr;

use crate::{
    conf::Runtime,
    constants::MAX_INT,
    error::{JackError, JackResult},
};

use super::instr::{ArithmeticOp, Instr, Segment, UnaryOp};

/// Append-only sink of stack machine instructions.
///
/// Implementors only provide [`emit`](CodeEmitter::emit). The remaining
/// methods build one instruction each, except
/// [`string_literal`](CodeEmitter::string_literal) which expands into
/// calls to the string runtime.
pub trait CodeEmitter {
    fn emit(&mut self, instr: Instr) -> JackResult<()>;

    #[inline]
    fn push(&mut self, segment: Segment, index: u16) -> JackResult<()> {
        self.emit(Instr::Push(segment, index))
    }

    /// # Errors
    ///
    /// Constants are not addressable storage, so popping
    /// into the `constant` segment is rejected.
    fn pop(&mut self, segment: Segment, index: u16) -> JackResult<()> {
        if segment == Segment::Constant {
            return Err(JackError::Emit("cannot pop into the constant segment"));
        }
        self.emit(Instr::Pop(segment, index))
    }

    #[inline]
    fn arithmetic(&mut self, op: ArithmeticOp) -> JackResult<()> {
        self.emit(Instr::Arithmetic(op))
    }

    #[inline]
    fn unary(&mut self, op: UnaryOp) -> JackResult<()> {
        self.emit(Instr::Unary(op))
    }

    #[inline]
    fn label(&mut self, name: impl Into<SmolStr>) -> JackResult<()> {
        self.emit(Instr::Label(name.into()))
    }

    #[inline]
    fn goto(&mut self, name: impl Into<SmolStr>) -> JackResult<()> {
        self.emit(Instr::Goto(name.into()))
    }

    #[inline]
    fn if_goto(&mut self, name: impl Into<SmolStr>) -> JackResult<()> {
        self.emit(Instr::IfGoto(name.into()))
    }

    #[inline]
    fn call(&mut self, name: impl Into<SmolStr>, args: u16) -> JackResult<()> {
        self.emit(Instr::Call(name.into(), args))
    }

    #[inline]
    fn function(&mut self, name: impl Into<SmolStr>, locals: u16) -> JackResult<()> {
        self.emit(Instr::Function(name.into(), locals))
    }

    #[inline]
    fn ret(&mut self) -> JackResult<()> {
        self.emit(Instr::Return)
    }

    /// Build a string value at runtime, one character at a time.
    ///
    /// Leaves the string reference on the stack.
    fn string_literal(&mut self, text: &str, runtime: &Runtime) -> JackResult<()> {
        // Length in characters, not bytes.
        let len = text.chars().count();
        self.push(Segment::Constant, word(len)?)?;
        self.call(runtime.string_new.clone(), 1)?;

        for c in text.chars() {
            self.push(Segment::Constant, word(c as usize)?)?;
            self.call(runtime.string_append_char.clone(), 2)?;
        }

        Ok(())
    }
}

/// Narrow a value into a constant the machine can push.
fn word(value: usize) -> JackResult<u16> {
    match u16::try_from(value) {
        Ok(value) if value <= MAX_INT => Ok(value),
        _ => Err(JackError::Emit("string constant does not fit in a machine word")),
    }
}

/// Records instructions in memory.
impl CodeEmitter for Vec<Instr> {
    #[inline]
    fn emit(&mut self, instr: Instr) -> JackResult<()> {
        Vec::push(self, instr);
        Ok(())
    }
}
