//! The register file (component A): 64 slots of 8 bytes each, read and written
//! through a caller-chosen byte width.

use vm_opcodes::{Width, REGISTER_COUNT};

/// A register code fell outside `[0, 63]`.
///
/// Carries no `ip`; callers that need fault context (the cycle loop) attach the
/// current instruction pointer when converting this into a [`crate::RuntimeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("register code {0} out of range")]
pub struct RegisterFault(pub u8);

/// A bank of 64 general-purpose and special register slots, each 8 bytes wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile([[u8; 8]; REGISTER_COUNT]);

impl RegisterFile {
    pub fn new() -> Self {
        Self([[0u8; 8]; REGISTER_COUNT])
    }

    fn slot(&self, code: u8) -> Result<&[u8; 8], RegisterFault> {
        self.0.get(code as usize).ok_or(RegisterFault(code))
    }

    fn slot_mut(&mut self, code: u8) -> Result<&mut [u8; 8], RegisterFault> {
        self.0.get_mut(code as usize).ok_or(RegisterFault(code))
    }

    /// Zero-fill the slot's `width` bytes, then copy in at most `width` bytes from
    /// `bytes` (excess source bytes are truncated).
    pub fn write_bytes(
        &mut self,
        code: u8,
        width: Width,
        bytes: &[u8],
    ) -> Result<(), RegisterFault> {
        let slot = self.slot_mut(code)?;
        *slot = [0u8; 8];
        let n = width.len().min(bytes.len());
        slot[..n].copy_from_slice(&bytes[..n]);
        Ok(())
    }

    /// Reinterpret `value` as little-endian bytes and write its low `width` bytes,
    /// zero-filling the rest of the slot first.
    pub fn write(&mut self, code: u8, width: Width, value: u64) -> Result<(), RegisterFault> {
        self.write_bytes(code, width, &value.to_le_bytes())
    }

    /// Same as [`Self::write`] but for a value already carrying a sign (frame
    /// offsets and the like); the bit pattern is written as-is.
    pub fn write_signed(
        &mut self,
        code: u8,
        width: Width,
        value: i64,
    ) -> Result<(), RegisterFault> {
        self.write(code, width, value as u64)
    }

    /// Read the slot's raw bytes, truncated to `width`. Does not zero-extend.
    pub fn read_bytes(&self, code: u8, width: Width) -> Result<Vec<u8>, RegisterFault> {
        let slot = self.slot(code)?;
        Ok(slot[..width.len()].to_vec())
    }

    /// Read `width` bytes of the slot, zero-extended to 8 bytes, reinterpreted as
    /// an unsigned integer.
    pub fn read(&self, code: u8, width: Width) -> Result<u64, RegisterFault> {
        let slot = self.slot(code)?;
        let mut buf = [0u8; 8];
        buf[..width.len()].copy_from_slice(&slot[..width.len()]);
        Ok(u64::from_le_bytes(buf))
    }

    /// Same as [`Self::read`], reinterpreting the zero-extended bytes as signed.
    pub fn read_signed(&self, code: u8, width: Width) -> Result<i64, RegisterFault> {
        Ok(self.read(code, width)? as i64)
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}
