//! The syscall router (component G): `SYSCALL` pops a 16-bit id from the stack
//! and dispatches to one of {exit, debugger-trap, grow}.

use vm_opcodes::{RegisterId, SyscallId, Width};

use crate::error::{Result, RuntimeError};
use crate::machine::Machine;

impl Machine {
    pub(crate) fn dispatch_syscall(&mut self) -> Result<()> {
        let id = self.stack_pop_width(Width::Word)? as u16;
        let syscall = SyscallId::try_from(id).map_err(|_| RuntimeError::InvalidSyscall {
            id,
            ip: self.ip(),
        })?;

        match syscall {
            SyscallId::Exit => {
                let code = self.stack_pop_width(Width::Byte)? as u8;
                self.registers
                    .write(RegisterId::R0.code(), Width::Byte, u64::from(code))
                    .expect("R0 is a valid register code");
                self.set_running(false);
                tracing::debug!(code, "machine halted via SYSCALL EXIT");
            }
            SyscallId::Debugger => {
                let arg = self.stack_pop_width(Width::QWord)?;
                if let Some(hook) = self.debugger_hook {
                    hook(arg);
                }
            }
            SyscallId::Grow => {
                let new_size = self.memory.len() * 2;
                self.grow(new_size);
            }
        }

        Ok(())
    }
}
