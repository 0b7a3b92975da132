//! The machine: ties the register file, linear memory, and debugger hook into one
//! owned aggregate, and exposes the lifecycle operations (`flash`, `grow`,
//! `start`/`cycle`) that the rest of the crate is built from.

use vm_opcodes::{RegisterId, Width};

use crate::error::{Result, RuntimeError};
use crate::flags;
use crate::memory::{Memory, MemoryFault};
use crate::registers::{RegisterFault, RegisterFile};

/// A function invoked synchronously by `SYSCALL DEBUGGER`, with the `u64` argument
/// popped from the stack.
pub type DebuggerHook = fn(u64);

/// Construction-time configuration for a [`Machine`], kept separate from the image
/// a particular run flashes into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Initial size of linear memory, in bytes.
    pub memory_size: usize,
    /// Overrides the default entry point of `IP = 0` after `flash`, as a loader
    /// might do by seeding the entry address from the image's header.
    pub entry: Option<u64>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            memory_size: 64 * 1024,
            entry: None,
        }
    }
}

/// The virtual machine: register file, linear memory (code, data, and stack all
/// live in it), and the single debugger upcall slot.
pub struct Machine {
    pub(crate) registers: RegisterFile,
    pub(crate) memory: Memory,
    pub(crate) executable_size: u64,
    pub(crate) debugger_hook: Option<DebuggerHook>,
    config: MachineConfig,
}

impl Machine {
    pub fn new(config: MachineConfig) -> Self {
        Self {
            registers: RegisterFile::new(),
            memory: Memory::new(config.memory_size),
            executable_size: 0,
            debugger_hook: None,
            config,
        }
    }

    pub fn with_memory_size(memory_size: usize) -> Self {
        Self::new(MachineConfig {
            memory_size,
            ..Default::default()
        })
    }

    /// Copy `image` to the start of memory, zero the remainder, and reset `SP`/`FP`
    /// to `executable_size`. Atomic: on failure, nothing about the machine's state
    /// changes.
    pub fn flash(&mut self, image: &[u8]) -> Result<()> {
        if image.len() > self.memory.len() {
            return Err(RuntimeError::OutOfMemory {
                requested: image.len(),
                available: self.memory.len(),
            });
        }

        self.memory.load_image(image);
        self.executable_size = image.len() as u64;

        self.registers
            .write(RegisterId::SP.code(), Width::QWord, self.executable_size)
            .expect("SP is a valid register code");
        self.registers
            .write(RegisterId::FP.code(), Width::QWord, self.executable_size)
            .expect("FP is a valid register code");

        let entry = self.config.entry.unwrap_or(0);
        self.registers
            .write(RegisterId::IP.code(), Width::QWord, entry)
            .expect("IP is a valid register code");

        tracing::debug!(bytes = image.len(), entry, "flashed executable image");
        Ok(())
    }

    /// Grow linear memory to `new_size`; a no-op if it is already at least that
    /// large. Never shrinks, never invalidates existing addresses.
    pub fn grow(&mut self, new_size: usize) {
        let before = self.memory.len();
        self.memory.grow(new_size);
        if self.memory.len() != before {
            tracing::debug!(before, after = self.memory.len(), "grew linear memory");
        }
    }

    /// Install the function `SYSCALL DEBUGGER` will invoke.
    pub fn set_debugger_hook(&mut self, hook: DebuggerHook) {
        self.debugger_hook = Some(hook);
    }

    /// Remove any installed debugger hook; `SYSCALL DEBUGGER` becomes a no-op.
    pub fn clear_debugger_hook(&mut self) {
        self.debugger_hook = None;
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn executable_size(&self) -> u64 {
        self.executable_size
    }

    pub fn ip(&self) -> u64 {
        self.registers
            .read(RegisterId::IP.code(), Width::QWord)
            .expect("IP is a valid register code")
    }

    pub fn set_ip(&mut self, value: u64) {
        self.registers
            .write(RegisterId::IP.code(), Width::QWord, value)
            .expect("IP is a valid register code");
    }

    pub fn sp(&self) -> u64 {
        self.registers
            .read(RegisterId::SP.code(), Width::QWord)
            .expect("SP is a valid register code")
    }

    pub fn set_sp(&mut self, value: u64) {
        self.registers
            .write(RegisterId::SP.code(), Width::QWord, value)
            .expect("SP is a valid register code");
    }

    pub fn fp(&self) -> u64 {
        self.registers
            .read(RegisterId::FP.code(), Width::QWord)
            .expect("FP is a valid register code")
    }

    pub fn set_fp(&mut self, value: u64) {
        self.registers
            .write(RegisterId::FP.code(), Width::QWord, value)
            .expect("FP is a valid register code");
    }

    pub fn flags(&self) -> u8 {
        self.registers
            .read(RegisterId::FLAGS.code(), Width::Byte)
            .expect("FLAGS is a valid register code") as u8
    }

    pub fn set_flags(&mut self, value: u8) {
        self.registers
            .write(RegisterId::FLAGS.code(), Width::Byte, value as u64)
            .expect("FLAGS is a valid register code");
    }

    pub fn zero_flag(&self) -> bool {
        flags::is_zero_set(self.flags())
    }

    pub fn set_zero_flag(&mut self, set: bool) {
        let flags = flags::with_zero(self.flags(), set);
        self.set_flags(flags);
    }

    pub fn is_running(&self) -> bool {
        self.registers
            .read(RegisterId::RUN.code(), Width::Byte)
            .expect("RUN is a valid register code")
            != 0
    }

    pub fn set_running(&mut self, running: bool) {
        self.registers
            .write(RegisterId::RUN.code(), Width::Byte, running as u64)
            .expect("RUN is a valid register code");
    }

    pub fn exit_code(&self) -> u8 {
        self.registers
            .read(RegisterId::EXT.code(), Width::Byte)
            .expect("EXT is a valid register code") as u8
    }

    pub(crate) fn register_fault(&self, fault: RegisterFault) -> RuntimeError {
        RuntimeError::InvalidRegister {
            code: fault.0,
            ip: self.ip(),
        }
    }

    pub(crate) fn memory_fault(&self, fault: MemoryFault) -> RuntimeError {
        RuntimeError::IllegalMemoryAccess {
            address: fault.address,
            ip: self.ip(),
        }
    }
}
