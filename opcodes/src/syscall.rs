//! The numeric syscall ids `SYSCALL` dispatches on, popped as a `u16` from the
//! stack. Stable ABI — existing images depend on this numbering.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SyscallId {
    /// Pop a byte exit code, write it into `R0`, clear `RUN`.
    Exit = 0,
    /// Pop a `u64` argument and forward it to the debugger hook, if any.
    Debugger = 1,
    /// Double the size of linear memory.
    Grow = 2,
}

/// The syscall id popped from the stack is not one of the known ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown syscall id {0}")]
pub struct UnknownSyscall(pub u16);

impl TryFrom<u16> for SyscallId {
    type Error = UnknownSyscall;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(SyscallId::Exit),
            1 => Ok(SyscallId::Debugger),
            2 => Ok(SyscallId::Grow),
            other => Err(UnknownSyscall(other)),
        }
    }
}

impl fmt::Display for SyscallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyscallId::Exit => "EXIT",
            SyscallId::Debugger => "DEBUGGER",
            SyscallId::Grow => "GROW",
        };
        write!(f, "{name}")
    }
}
