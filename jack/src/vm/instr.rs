//! Stack machine instructions.
use std::fmt;

use smol_str::SmolStr;

/// Named storage region addressed by a small index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    #[rustfmt::skip]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Argument => "argument",
            Self::Local    => "local",
            Self::Static   => "static",
            Self::This     => "this",
            Self::That     => "that",
            Self::Pointer  => "pointer",
            Self::Temp     => "temp",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary operations the machine implements natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Eq,
    Gt,
    Lt,
    And,
    Or,
}

impl ArithmeticOp {
    #[rustfmt::skip]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Eq  => "eq",
            Self::Gt  => "gt",
            Self::Lt  => "lt",
            Self::And => "and",
            Self::Or  => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation
    Neg,
    /// Bitwise not
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "neg",
            Self::Not => "not",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    Push(Segment, u16),
    Pop(Segment, u16),
    Arithmetic(ArithmeticOp),
    Unary(UnaryOp),
    Label(SmolStr),
    Goto(SmolStr),
    IfGoto(SmolStr),
    /// Qualified subroutine name and argument count.
    Call(SmolStr, u16),
    /// Qualified subroutine name and local variable count.
    Function(SmolStr, u16),
    Return,
}

/// Formats the instruction as one line of stack machine text,
/// without the trailing newline.
impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Push(segment, index) => write!(f, "push {} {}", segment, index),
            Self::Pop(segment, index) => write!(f, "pop {} {}", segment, index),
            Self::Arithmetic(op) => f.write_str(op.as_str()),
            Self::Unary(op) => f.write_str(op.as_str()),
            Self::Label(name) => write!(f, "label {}", name),
            Self::Goto(name) => write!(f, "goto {}", name),
            Self::IfGoto(name) => write!(f, "if-goto {}", name),
            Self::Call(name, args) => write!(f, "call {} {}", name, args),
            Self::Function(name, locals) => write!(f, "function {} {}", name, locals),
            Self::Return => f.write_str("return"),
        }
    }
}
