//! The instruction set's opcode byte: one mnemonic per byte value, plus the fixed
//! portion of its encoded length.
//!
//! Two opcodes ([`Opcode::LOADI`] and [`Opcode::PUSH`]) carry a trailing
//! size-prefixed payload and so have no fixed total length; [`Opcode::fixed_length`]
//! returns `None` for them and the decoder in `vm_core` computes their length from
//! the embedded `u32` size field.

use core::fmt;

/// A single VM opcode, one byte, with a stable numeric encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    // Control flow (0x00-0x0F)
    NOP = 0x00,
    JMP = 0x01,
    JMPR = 0x02,
    JZ = 0x03,
    JZR = 0x04,
    CALL = 0x05,
    CALLR = 0x06,
    RET = 0x07,
    SYSCALL = 0x08,

    // Data movement (0x10-0x1F)
    MOV = 0x10,
    LOADI = 0x11,
    RST = 0x12,
    PUSH = 0x13,
    RPUSH = 0x14,
    RPOP = 0x15,

    // Frame-relative (0x20-0x2F)
    LOAD = 0x20,
    LOADR = 0x21,
    LOADS = 0x22,
    LOADSR = 0x23,
    STORE = 0x24,

    // Absolute memory (0x30-0x3F)
    READ = 0x30,
    READC = 0x31,
    READS = 0x32,
    READCS = 0x33,
    WRITE = 0x34,
    WRITEC = 0x35,
    WRITES = 0x36,
    WRITECS = 0x37,
    COPY = 0x38,
    COPYC = 0x39,
}

/// The raw opcode byte did not decode to any known mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown opcode byte {0:#04x}")]
pub struct UnknownOpcode(pub u8);

impl TryFrom<u8> for Opcode {
    type Error = UnknownOpcode;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        use Opcode::*;

        Ok(match byte {
            0x00 => NOP,
            0x01 => JMP,
            0x02 => JMPR,
            0x03 => JZ,
            0x04 => JZR,
            0x05 => CALL,
            0x06 => CALLR,
            0x07 => RET,
            0x08 => SYSCALL,

            0x10 => MOV,
            0x11 => LOADI,
            0x12 => RST,
            0x13 => PUSH,
            0x14 => RPUSH,
            0x15 => RPOP,

            0x20 => LOAD,
            0x21 => LOADR,
            0x22 => LOADS,
            0x23 => LOADSR,
            0x24 => STORE,

            0x30 => READ,
            0x31 => READC,
            0x32 => READS,
            0x33 => READCS,
            0x34 => WRITE,
            0x35 => WRITEC,
            0x36 => WRITES,
            0x37 => WRITECS,
            0x38 => COPY,
            0x39 => COPYC,

            other => return Err(UnknownOpcode(other)),
        })
    }
}

impl Opcode {
    /// The instruction's total encoded length in bytes, including the opcode byte
    /// itself, for every opcode whose length does not depend on an embedded size
    /// field. Returns `None` for [`Opcode::LOADI`] and [`Opcode::PUSH`], whose
    /// length the decoder must compute from their `size: u32` operand.
    pub const fn fixed_length(self) -> Option<u16> {
        use Opcode::*;

        Some(match self {
            NOP | RET | SYSCALL => 1,

            JMPR | JZR | CALLR | RST | RPUSH => 2,

            MOV | READ | WRITE => 3,

            LOADSR | READS | WRITES => 6,
            RPOP => 6,

            LOADR | COPY => 7,

            STORE | READC | WRITEC => 10,

            JMP | JZ | CALL => 9,

            LOADS | READCS | WRITECS => 13,

            LOAD => 14,

            COPYC => 21,

            LOADI | PUSH => return None,
        })
    }

    /// Whether this opcode is allowed to leave `IP` unchanged and have the cycle
    /// loop auto-advance it, vs. being responsible for writing `IP` itself.
    ///
    /// All control-flow opcodes set `IP` explicitly (even a self-jump); everything
    /// else relies on the automatic advance.
    pub const fn controls_ip(self) -> bool {
        use Opcode::*;
        matches!(self, JMP | JMPR | JZ | JZR | CALL | CALLR | RET)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Opcode::*;

        let mnemonic = match self {
            NOP => "NOP",
            JMP => "JMP",
            JMPR => "JMPR",
            JZ => "JZ",
            JZR => "JZR",
            CALL => "CALL",
            CALLR => "CALLR",
            RET => "RET",
            SYSCALL => "SYSCALL",
            MOV => "MOV",
            LOADI => "LOADI",
            RST => "RST",
            PUSH => "PUSH",
            RPUSH => "RPUSH",
            RPOP => "RPOP",
            LOAD => "LOAD",
            LOADR => "LOADR",
            LOADS => "LOADS",
            LOADSR => "LOADSR",
            STORE => "STORE",
            READ => "READ",
            READC => "READC",
            READS => "READS",
            READCS => "READCS",
            WRITE => "WRITE",
            WRITEC => "WRITEC",
            WRITES => "WRITES",
            WRITECS => "WRITECS",
            COPY => "COPY",
            COPYC => "COPYC",
        };
        write!(f, "{mnemonic}")
    }
}
