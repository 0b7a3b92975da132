//! The call/frame protocol (component F). The caller is expected to have already
//! pushed a return-value slot, the arguments, and a `u32` argument bytecount before
//! `CALL`/`CALLR` runs; see `executor.rs` for where the opcode reads `a`/`r` and
//! computes `return_address` before handing off here.
//!
//! ```text
//!   [FP - 4 - N) ... [FP - 4)   arguments (N = argument_bytecount)
//!   [FP - 4)      .. [FP)       argument_bytecount (u32)
//!   [FP)          .. [FP + 8)   saved FP (u64)
//!   [FP + 8)      .. [FP + 16)  return address (u64)
//!   [FP + 16) ..                callee locals / inner pushes
//! ```

use vm_opcodes::Width;

use crate::error::Result;
use crate::machine::Machine;

impl Machine {
    /// Push the prologue (saved `FP`, then `return_address`), set `FP` to the new
    /// frame base, and jump to `target`.
    pub(crate) fn call(&mut self, target: u64, return_address: u64) -> Result<()> {
        let frame_base = self.sp();
        self.stack_push_width(Width::QWord, self.fp())?;
        self.stack_push_width(Width::QWord, return_address)?;
        self.set_fp(frame_base);
        self.set_ip(target);
        Ok(())
    }

    /// Restore the caller's `SP`/`FP`, discarding the callee's arguments and
    /// bytecount, and jump back to the return address. The return-value slot
    /// below the arguments is left untouched.
    pub(crate) fn ret(&mut self) -> Result<()> {
        let frame_base = self.fp();

        let saved_fp = self
            .memory
            .read_u64(frame_base)
            .map_err(|fault| self.memory_fault(fault))?;
        let return_address = self
            .memory
            .read_u64(frame_base.wrapping_add(8))
            .map_err(|fault| self.memory_fault(fault))?;
        let argument_bytecount = self
            .memory
            .read_u32(frame_base.wrapping_sub(4))
            .map_err(|fault| self.memory_fault(fault))?;

        self.set_sp(frame_base.wrapping_sub(4 + u64::from(argument_bytecount)));
        self.set_fp(saved_fp);
        self.set_ip(return_address);
        Ok(())
    }
}
