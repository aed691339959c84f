//! Stack machine code emission.
mod emitter;
mod instr;
mod writer;

pub use self::{
    emitter::CodeEmitter,
    instr::{ArithmeticOp, Instr, Segment, UnaryOp},
    writer::VmWriter,
};
