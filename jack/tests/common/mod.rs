//! Small stack machine for executing compiled classes in tests.
//!
//! Panics on anything malformed, including an operand stack
//! that is not balanced when a subroutine returns.
#![allow(dead_code)]

use std::collections::HashMap;

use jack::vm::{ArithmeticOp, Instr, Segment, UnaryOp};

const RAM_SIZE: usize = 0x4000;
const STEP_LIMIT: usize = 1_000_000;
const HALT: usize = usize::MAX;

struct Frame {
    function: String,
    ret: usize,
    /// Operand stack height once the arguments were taken off.
    base: usize,
    args: Vec<i16>,
    locals: Vec<i16>,
    /// Caller's `this` and `that`.
    pointer: [i16; 2],
}

pub struct Machine {
    code: Vec<Instr>,
    functions: HashMap<String, usize>,
    labels: HashMap<(String, String), usize>,
    stack: Vec<i16>,
    frames: Vec<Frame>,
    ram: Vec<i16>,
    heap: usize,
    statics: HashMap<(String, u16), i16>,
    pointer: [i16; 2],
    temp: [i16; 8],
    pc: usize,
}

impl Machine {
    pub fn new(code: Vec<Instr>) -> Self {
        let mut functions = HashMap::new();
        let mut labels = HashMap::new();
        let mut current = String::new();

        for (index, instr) in code.iter().enumerate() {
            match instr {
                Instr::Function(name, _) => {
                    current = name.to_string();
                    functions.insert(current.clone(), index);
                }
                Instr::Label(name) => {
                    let old = labels.insert((current.clone(), name.to_string()), index);
                    assert!(old.is_none(), "duplicate label {} in {}", name, current);
                }
                _ => {}
            }
        }

        Self {
            code,
            functions,
            labels,
            stack: vec![],
            frames: vec![],
            ram: vec![0; RAM_SIZE],
            heap: 2048,
            statics: HashMap::new(),
            pointer: [0; 2],
            temp: [0; 8],
            pc: HALT,
        }
    }

    /// Load several compiled classes into one program.
    pub fn link(classes: impl IntoIterator<Item = Vec<Instr>>) -> Self {
        Self::new(classes.into_iter().flatten().collect())
    }

    /// Run a subroutine to completion and return its result.
    pub fn call(&mut self, name: &str, args: &[i16]) -> i16 {
        self.stack.extend_from_slice(args);
        self.invoke(name, args.len(), HALT);

        let mut steps = 0;
        while self.pc != HALT {
            self.step();
            steps += 1;
            assert!(steps < STEP_LIMIT, "step limit exceeded");
        }

        let result = self.pop();
        assert!(self.stack.is_empty(), "operand stack left with {:?}", self.stack);
        result
    }

    pub fn read(&self, address: i16) -> i16 {
        self.ram[address as usize]
    }

    /// Read a string object built by the string runtime.
    pub fn read_string(&self, address: i16) -> String {
        let base = address as usize;
        let len = self.ram[base] as usize;
        self.ram[base + 1..base + 1 + len]
            .iter()
            .map(|c| char::from(*c as u8))
            .collect()
    }

    fn pop(&mut self) -> i16 {
        self.stack.pop().expect("operand stack underflow")
    }

    fn alloc(&mut self, size: i16) -> i16 {
        let address = self.heap;
        self.heap += size.max(0) as usize;
        assert!(self.heap <= RAM_SIZE, "out of memory");
        address as i16
    }

    fn frame(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("no active frame")
    }

    fn invoke(&mut self, name: &str, argc: usize, ret: usize) {
        let split = self.stack.len() - argc;
        let args = self.stack.split_off(split);

        if let Some(value) = self.builtin(name, &args) {
            self.stack.push(value);
            self.pc = ret;
            return;
        }

        let entry = *self
            .functions
            .get(name)
            .unwrap_or_else(|| panic!("unknown subroutine {}", name));

        self.frames.push(Frame {
            function: name.to_string(),
            ret,
            base: self.stack.len(),
            args,
            locals: vec![],
            pointer: self.pointer,
        });
        self.pc = entry;
    }

    fn builtin(&mut self, name: &str, args: &[i16]) -> Option<i16> {
        let value = match name {
            "Memory.alloc" | "Array.new" => self.alloc(args[0]),
            "Math.multiply" => args[0].wrapping_mul(args[1]),
            "Math.divide" => args[0] / args[1],
            "String.new" => {
                let address = self.alloc(args[0] + 1);
                self.ram[address as usize] = 0;
                address
            }
            "String.appendChar" => {
                let base = args[0] as usize;
                let len = self.ram[base] as usize;
                self.ram[base + 1 + len] = args[1];
                self.ram[base] += 1;
                args[0]
            }
            _ => return None,
        };
        Some(value)
    }

    fn jump(&mut self, label: &str) {
        let function = self.frame().function.clone();
        self.pc = *self
            .labels
            .get(&(function.clone(), label.to_string()))
            .unwrap_or_else(|| panic!("unknown label {} in {}", label, function));
    }

    fn load(&mut self, segment: Segment, index: u16) -> i16 {
        let i = index as usize;
        match segment {
            Segment::Constant => index as i16,
            Segment::Argument => self.frame().args[i],
            Segment::Local => self.frame().locals[i],
            Segment::Static => {
                let key = (self.class(), index);
                self.statics.get(&key).copied().unwrap_or(0)
            }
            Segment::This => self.ram[self.pointer[0] as usize + i],
            Segment::That => self.ram[self.pointer[1] as usize + i],
            Segment::Pointer => self.pointer[i],
            Segment::Temp => self.temp[i],
        }
    }

    fn store(&mut self, segment: Segment, index: u16, value: i16) {
        let i = index as usize;
        match segment {
            Segment::Constant => panic!("pop into constant segment"),
            Segment::Argument => self.frame().args[i] = value,
            Segment::Local => self.frame().locals[i] = value,
            Segment::Static => {
                let key = (self.class(), index);
                self.statics.insert(key, value);
            }
            Segment::This => self.ram[self.pointer[0] as usize + i] = value,
            Segment::That => self.ram[self.pointer[1] as usize + i] = value,
            Segment::Pointer => self.pointer[i] = value,
            Segment::Temp => self.temp[i] = value,
        }
    }

    fn class(&mut self) -> String {
        let function = &self.frame().function;
        function.split('.').next().unwrap_or_default().to_string()
    }

    fn step(&mut self) {
        let instr = self.code[self.pc].clone();
        self.pc += 1;

        match instr {
            Instr::Push(segment, index) => {
                let value = self.load(segment, index);
                self.stack.push(value);
            }
            Instr::Pop(segment, index) => {
                let value = self.pop();
                self.store(segment, index, value);
            }
            Instr::Arithmetic(op) => {
                let b = self.pop();
                let a = self.pop();
                let value = match op {
                    ArithmeticOp::Add => a.wrapping_add(b),
                    ArithmeticOp::Sub => a.wrapping_sub(b),
                    ArithmeticOp::And => a & b,
                    ArithmeticOp::Or => a | b,
                    ArithmeticOp::Eq => truth(a == b),
                    ArithmeticOp::Gt => truth(a > b),
                    ArithmeticOp::Lt => truth(a < b),
                };
                self.stack.push(value);
            }
            Instr::Unary(op) => {
                let a = self.pop();
                self.stack.push(match op {
                    UnaryOp::Neg => a.wrapping_neg(),
                    UnaryOp::Not => !a,
                });
            }
            Instr::Label(_) => {}
            Instr::Goto(label) => self.jump(&label),
            Instr::IfGoto(label) => {
                if self.pop() != 0 {
                    self.jump(&label);
                }
            }
            Instr::Call(name, argc) => {
                let ret = self.pc;
                self.invoke(&name, argc as usize, ret);
            }
            Instr::Function(_, locals) => {
                self.frame().locals = vec![0; locals as usize];
            }
            Instr::Return => {
                let value = self.pop();
                let frame = self.frames.pop().expect("return without frame");
                assert_eq!(
                    self.stack.len(),
                    frame.base,
                    "unbalanced operand stack returning from {}",
                    frame.function
                );
                self.pointer = frame.pointer;
                self.stack.push(value);
                self.pc = frame.ret;
            }
        }
    }
}

fn truth(value: bool) -> i16 {
    if value {
        -1
    } else {
        0
    }
}
