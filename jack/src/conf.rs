//! Compiler configuration.
use smol_str::SmolStr;

/// Compiler Configuration Parameters.
#[derive(Debug, Default, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct JackConf {
    pub runtime: Runtime,
}

/// Names of the operating system subroutines that generated code calls into.
///
/// Each name is fully qualified (`Class.subroutine`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct Runtime {
    /// Allocates a block of memory, takes the size in words.
    pub alloc: SmolStr,
    /// Creates an empty string, takes the maximum length.
    pub string_new: SmolStr,
    /// Appends a character to a string and returns the string.
    pub string_append_char: SmolStr,
    pub multiply: SmolStr,
    pub divide: SmolStr,
}

impl Default for Runtime {
    fn default() -> Self {
        Self {
            alloc: SmolStr::new("Memory.alloc"),
            string_new: SmolStr::new("String.new"),
            string_append_char: SmolStr::new("String.appendChar"),
            multiply: SmolStr::new("Math.multiply"),
            divide: SmolStr::new("Math.divide"),
        }
    }
}
