//! The instruction decoder (component D): classifies the opcode byte at a given
//! address and computes the instruction's total encoded length, including the two
//! variable-length encodings ([`Opcode::LOADI`] and [`Opcode::PUSH`]) whose length
//! depends on an embedded `u32` size field.

use vm_opcodes::Opcode;

use crate::error::{Result, RuntimeError};
use crate::machine::Machine;

/// An opcode paired with its total encoded length in bytes (opcode byte included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub opcode: Opcode,
    pub length: u32,
}

impl Machine {
    /// Classify the instruction at `ip` and compute its length.
    pub(crate) fn decode_at(&self, ip: u64) -> Result<Decoded> {
        let opcode_byte = self.memory.read_bytes(ip, 1).map_err(|fault| self.memory_fault(fault))?[0];
        let opcode = Opcode::try_from(opcode_byte).map_err(|_| RuntimeError::InvalidInstruction {
            opcode: opcode_byte,
            ip,
        })?;

        let length = match opcode.fixed_length() {
            Some(len) => u32::from(len),
            None => self.variable_length(opcode, ip)?,
        };

        Ok(Decoded { opcode, length })
    }

    /// `LOADI` and `PUSH` carry a `u32` size field; compute their total length
    /// from it.
    fn variable_length(&self, opcode: Opcode, ip: u64) -> Result<u32> {
        let (header, size_offset) = match opcode {
            // opcode(1) + target register(1) + size(4)
            Opcode::LOADI => (1 + 1 + 4, ip + 2),
            // opcode(1) + size(4)
            Opcode::PUSH => (1 + 4, ip + 1),
            _ => unreachable!("only LOADI and PUSH are variable-length"),
        };

        let size = self
            .memory()
            .read_u32(size_offset)
            .map_err(|fault| self.memory_fault(fault))?;

        Ok(header + size)
    }
}
