//! Bit layout of the `FLAGS` register. Only `ZERO` has defined behavior in this
//! ISA; the rest are reserved and preserved by every opcode that doesn't touch
//! them explicitly.

/// Bit 0 of `FLAGS`; the only flag conditional branches observe.
pub const ZERO_BIT: u8 = 0b0000_0001;

pub fn is_zero_set(flags: u8) -> bool {
    flags & ZERO_BIT != 0
}

pub fn with_zero(flags: u8, set: bool) -> u8 {
    if set {
        flags | ZERO_BIT
    } else {
        flags & !ZERO_BIT
    }
}
