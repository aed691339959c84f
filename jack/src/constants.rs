//! Constant values of the target stack machine.

/// Largest value an integer constant may take.
///
/// The machine word is a signed 16-bit cell, so positive
/// constants are limited to the lower 15 bits.
pub const MAX_INT: u16 = 0x7FFF; // 32767

/// Index into the `pointer` segment that aliases the `this` base address.
pub const POINTER_THIS: u16 = 0;

/// Index into the `pointer` segment that aliases the `that` base address.
pub const POINTER_THAT: u16 = 1;

/// Cell in the `temp` segment used for scratch values, like discarded
/// call results and the right-hand side of array assignments.
pub const TEMP_SCRATCH: u16 = 0;
