//! The trap taxonomy raised by the core and propagated out of the cycle loop to the
//! host. Every fallible operation on [`crate::Machine`] returns `Result<T, RuntimeError>`
//! instead of panicking; traps are fatal to the current cycle and are never retried
//! internally.

/// A single fatal fault raised while decoding or executing an instruction, or while
/// constructing/growing the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// `flash` was given an image larger than the machine's memory.
    #[error("image of {requested} bytes does not fit in {available}-byte memory")]
    OutOfMemory { requested: usize, available: usize },

    /// A typed memory read or write fell outside `[0, |M|)`.
    #[error("illegal memory access at {address:#x} (ip={ip:#x})")]
    IllegalMemoryAccess { address: u64, ip: u64 },

    /// A register operand's code fell outside `[0, 63]`.
    #[error("invalid register code {code} (ip={ip:#x})")]
    InvalidRegister { code: u8, ip: u64 },

    /// A register was accessed with a width it cannot semantically satisfy.
    ///
    /// Unused by this implementation today, kept for parity with the full trap
    /// taxonomy the host is expected to handle.
    #[error("register {code} cannot satisfy a {requested_width}-byte access (ip={ip:#x})")]
    BadRegisterAccess {
        code: u8,
        requested_width: u8,
        ip: u64,
    },

    /// The opcode byte at `ip` does not decode to any known mnemonic.
    #[error("invalid instruction {opcode:#04x} (ip={ip:#x})")]
    InvalidInstruction { opcode: u8, ip: u64 },

    /// `SYSCALL` popped an id that is not one of the known syscalls.
    #[error("invalid syscall id {id} (ip={ip:#x})")]
    InvalidSyscall { id: u16, ip: u64 },
}

pub type Result<T> = core::result::Result<T, RuntimeError>;
