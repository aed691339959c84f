//! Textual stack machine output.
use std::io::Write;

use crate::error::JackResult;

use super::{emitter::CodeEmitter, instr::Instr};

/// Writes one line of stack machine text per instruction.
pub struct VmWriter<W> {
    out: W,
    /// Number of lines written so far.
    count: usize,
}

impl<W: Write> VmWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, count: 0 }
    }

    /// Number of instructions written.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CodeEmitter for VmWriter<W> {
    fn emit(&mut self, instr: Instr) -> JackResult<()> {
        log::trace!("{:5} {}", self.count, instr);
        writeln!(self.out, "{}", instr)?;
        self.count += 1;
        Ok(())
    }
}
