mod conf;
pub mod constants;
mod engine;
mod error;
pub mod symbols;
pub mod tokenizer;
pub mod vm;

use self::{
    conf::JackConf,
    engine::Engine,
    error::JackResult,
    vm::{CodeEmitter, Instr, VmWriter},
};

pub const IMPL_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {
    pub use super::{
        conf::{JackConf, Runtime},
        engine::Engine,
        error::{Expected, GrammarError, JackError, JackResult, LexError, SymbolError},
        symbols::{Kind, Scope, SymbolTable},
        tokenizer::Tokenizer,
        vm::{CodeEmitter, Instr, Segment, VmWriter},
    };
}

/// Compile one class to stack machine text, using the default runtime.
pub fn compile_str(source_code: &str) -> JackResult<String> {
    let writer = compile_with(source_code, VmWriter::new(Vec::<u8>::new()), &JackConf::default())?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Compile one class to a list of instructions, using the default runtime.
pub fn compile_instrs(source_code: &str) -> JackResult<Vec<Instr>> {
    compile_with(source_code, Vec::new(), &JackConf::default())
}

/// Compile one class into the given emitter.
pub fn compile_with<E: CodeEmitter>(source_code: &str, out: E, conf: &JackConf) -> JackResult<E> {
    Engine::new(source_code, out, conf).compile_class()
}
