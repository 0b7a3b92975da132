//! The register file's addressing scheme: a 7-bit register code and a 2-bit width
//! specifier, packed together as the single-byte register operand the instruction
//! stream carries.

use core::fmt;

/// One of the four byte-widths a register operand may request.
///
/// The 2-bit width field packed into a register operand byte selects one of these;
/// `0b11` maps to 8 bytes, matching the ABI note in the encoding spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Width {
    Byte = 0b00,
    Word = 0b01,
    DWord = 0b10,
    QWord = 0b11,
}

impl Width {
    /// Number of bytes this width occupies.
    pub const fn len(self) -> usize {
        match self {
            Width::Byte => 1,
            Width::Word => 2,
            Width::DWord => 4,
            Width::QWord => 8,
        }
    }

    const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Width::Byte,
            0b01 => Width::Word,
            0b10 => Width::DWord,
            _ => Width::QWord,
        }
    }

    const fn to_bits(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = match self {
            Width::Byte => "byte",
            Width::Word => "word",
            Width::DWord => "dword",
            Width::QWord => "qword",
        };
        write!(f, "{bytes}")
    }
}

/// Total number of register slots in the register file.
pub const REGISTER_COUNT: usize = 64;

/// A register code in `[0, 63]`, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterId(u8);

impl RegisterId {
    /// Build a [`RegisterId`] from a raw code, rejecting anything outside `[0, 63]`.
    pub const fn new(code: u8) -> Option<Self> {
        if (code as usize) < REGISTER_COUNT {
            Some(Self(code))
        } else {
            None
        }
    }

    /// The raw register code.
    pub const fn code(self) -> u8 {
        self.0
    }

    pub const R0: Self = Self(0);
    pub const R1: Self = Self(1);
    pub const R2: Self = Self(2);
    pub const R3: Self = Self(3);
    pub const R4: Self = Self(4);
    pub const R5: Self = Self(5);
    pub const R6: Self = Self(6);
    pub const R7: Self = Self(7);
    pub const R8: Self = Self(8);
    pub const R9: Self = Self(9);

    /// Return-value register.
    pub const AX: Self = Self(10);
    /// Instruction pointer.
    pub const IP: Self = Self(11);
    /// Stack pointer.
    pub const SP: Self = Self(12);
    /// Frame pointer.
    pub const FP: Self = Self(13);
    /// Status bits (see [`crate::flags`]).
    pub const FLAGS: Self = Self(14);
    /// Machine-running flag.
    pub const RUN: Self = Self(15);
    /// Exit code set by `SYSCALL EXIT`.
    pub const EXT: Self = Self(16);
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::R0 => "R0",
            Self::R1 => "R1",
            Self::R2 => "R2",
            Self::R3 => "R3",
            Self::R4 => "R4",
            Self::R5 => "R5",
            Self::R6 => "R6",
            Self::R7 => "R7",
            Self::R8 => "R8",
            Self::R9 => "R9",
            Self::AX => "AX",
            Self::IP => "IP",
            Self::SP => "SP",
            Self::FP => "FP",
            Self::FLAGS => "FLAGS",
            Self::RUN => "RUN",
            Self::EXT => "EXT",
            other => return write!(f, "r{}", other.0),
        };
        write!(f, "{name}")
    }
}

/// A decoded register operand: which register, and how many of its bytes to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterOperand {
    pub id: RegisterId,
    pub width: Width,
}

impl RegisterOperand {
    pub const fn new(id: RegisterId, width: Width) -> Self {
        Self { id, width }
    }

    /// Decode a register operand from its single-byte instruction-stream encoding:
    /// the low 6 bits are the register code, the high 2 bits are the width.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        let code = byte & 0b0011_1111;
        let width = Width::from_bits(byte >> 6);
        match RegisterId::new(code) {
            Some(id) => Some(Self { id, width }),
            None => None,
        }
    }

    /// Encode this operand back into its single-byte instruction-stream form.
    pub const fn to_byte(self) -> u8 {
        (self.width.to_bits() << 6) | self.id.code()
    }
}
