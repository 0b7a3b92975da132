//! Per-opcode semantics (component E). `CALL`/`CALLR`/`RET` delegate to
//! `frame.rs` and `SYSCALL` to `syscall.rs`; everything else is decided here.
//!
//! Every opcode that [`Opcode::controls_ip`] reports as controlling `IP` must
//! write it explicitly in every path, including the "didn't branch" path —
//! the cycle loop only auto-advances `IP` for opcodes that don't claim control
//! of it.

use vm_opcodes::{Opcode, RegisterOperand, Width};

use crate::decode::Decoded;
use crate::error::Result;
use crate::machine::Machine;

/// Decode the register-operand byte at an instruction-stream address.
///
/// The low six bits of any byte always form a valid `[0, 63]` register code,
/// so this cannot fail and does not need to consult [`Machine::register_fault`].
fn register_operand(byte: u8) -> RegisterOperand {
    RegisterOperand::from_byte(byte).expect("register operand byte always encodes a valid code")
}

impl Machine {
    /// Execute the instruction at `ip`, already classified as `decoded`.
    pub(crate) fn execute(&mut self, ip: u64, decoded: Decoded) -> Result<()> {
        let fall_through = ip + u64::from(decoded.length);

        match decoded.opcode {
            Opcode::NOP => {}

            Opcode::MOV => {
                let t = register_operand(self.byte_at(ip + 1)?);
                let s = register_operand(self.byte_at(ip + 2)?);
                let bytes = self.read_register_bytes(s)?;
                self.write_register_bytes(t, &bytes)?;
            }

            Opcode::LOADI => {
                let t = register_operand(self.byte_at(ip + 1)?);
                let size = self.read_u32(ip + 2)?;
                let bytes = self
                    .memory
                    .read_bytes(ip + 6, size as usize)
                    .map_err(|fault| self.memory_fault(fault))?
                    .to_vec();
                self.write_register_bytes(t, &bytes)?;
            }

            Opcode::RST => {
                let t = register_operand(self.byte_at(ip + 1)?);
                self.registers
                    .write(t.id.code(), t.width, 0)
                    .map_err(|fault| self.register_fault(fault))?;
            }

            Opcode::PUSH => {
                let size = self.read_u32(ip + 1)?;
                let bytes = self
                    .memory
                    .read_bytes(ip + 5, size as usize)
                    .map_err(|fault| self.memory_fault(fault))?
                    .to_vec();
                self.stack_push_bytes(&bytes)?;
            }

            Opcode::RPUSH => {
                let s = register_operand(self.byte_at(ip + 1)?);
                let bytes = self.read_register_bytes(s)?;
                self.stack_push_bytes(&bytes)?;
            }

            Opcode::RPOP => {
                let t = register_operand(self.byte_at(ip + 1)?);
                let size = self.read_u32(ip + 2)?;
                let bytes = self.stack_pop_bytes(size as usize)?;
                self.write_register_bytes(t, &bytes)?;
            }

            Opcode::LOAD => {
                let t = register_operand(self.byte_at(ip + 1)?);
                let size = self.read_u32(ip + 2)?;
                let offset = self.read_i64(ip + 6)?;
                let bytes = self.read_frame_relative(offset, size)?;
                self.write_register_bytes(t, &bytes)?;
            }

            Opcode::LOADR => {
                let t = register_operand(self.byte_at(ip + 1)?);
                let size = self.read_u32(ip + 2)?;
                let off_reg = register_operand(self.byte_at(ip + 6)?);
                let offset = self.read_register_signed(off_reg)?;
                let bytes = self.read_frame_relative(offset, size)?;
                self.write_register_bytes(t, &bytes)?;
            }

            Opcode::LOADS => {
                let size = self.read_u32(ip + 1)?;
                let offset = self.read_i64(ip + 5)?;
                let bytes = self.read_frame_relative(offset, size)?;
                self.stack_push_bytes(&bytes)?;
            }

            Opcode::LOADSR => {
                let size = self.read_u32(ip + 1)?;
                let off_reg = register_operand(self.byte_at(ip + 5)?);
                let offset = self.read_register_signed(off_reg)?;
                let bytes = self.read_frame_relative(offset, size)?;
                self.stack_push_bytes(&bytes)?;
            }

            Opcode::STORE => {
                let offset = self.read_i64(ip + 1)?;
                let s = register_operand(self.byte_at(ip + 9)?);
                let bytes = self.read_register_bytes(s)?;
                let addr = self.frame_relative_address(offset);
                self.memory
                    .write_bytes(addr, &bytes)
                    .map_err(|fault| self.memory_fault(fault))?;
            }

            Opcode::READ => {
                let t = register_operand(self.byte_at(ip + 1)?);
                let s = register_operand(self.byte_at(ip + 2)?);
                let addr = self.read_register_address(s)?;
                let value = self
                    .memory
                    .read_width(addr, t.width)
                    .map_err(|fault| self.memory_fault(fault))?;
                self.registers
                    .write(t.id.code(), t.width, value)
                    .map_err(|fault| self.register_fault(fault))?;
            }

            Opcode::READC => {
                let t = register_operand(self.byte_at(ip + 1)?);
                let addr = self.read_u64(ip + 2)?;
                let value = self
                    .memory
                    .read_width(addr, t.width)
                    .map_err(|fault| self.memory_fault(fault))?;
                self.registers
                    .write(t.id.code(), t.width, value)
                    .map_err(|fault| self.register_fault(fault))?;
            }

            Opcode::READS => {
                let size = self.read_u32(ip + 1)?;
                let s = register_operand(self.byte_at(ip + 5)?);
                let addr = self.read_register_address(s)?;
                let bytes = self
                    .memory
                    .read_bytes(addr, size as usize)
                    .map_err(|fault| self.memory_fault(fault))?
                    .to_vec();
                self.stack_push_bytes(&bytes)?;
            }

            Opcode::READCS => {
                let size = self.read_u32(ip + 1)?;
                let addr = self.read_u64(ip + 5)?;
                let bytes = self
                    .memory
                    .read_bytes(addr, size as usize)
                    .map_err(|fault| self.memory_fault(fault))?
                    .to_vec();
                self.stack_push_bytes(&bytes)?;
            }

            Opcode::WRITE => {
                let t = register_operand(self.byte_at(ip + 1)?);
                let s = register_operand(self.byte_at(ip + 2)?);
                let addr = self.read_register_address(t)?;
                let bytes = self.read_register_bytes(s)?;
                self.memory
                    .write_bytes(addr, &bytes)
                    .map_err(|fault| self.memory_fault(fault))?;
            }

            Opcode::WRITEC => {
                let addr = self.read_u64(ip + 1)?;
                let s = register_operand(self.byte_at(ip + 9)?);
                let bytes = self.read_register_bytes(s)?;
                self.memory
                    .write_bytes(addr, &bytes)
                    .map_err(|fault| self.memory_fault(fault))?;
            }

            Opcode::WRITES => {
                let t = register_operand(self.byte_at(ip + 1)?);
                let size = self.read_u32(ip + 2)?;
                let addr = self.read_register_address(t)?;
                let bytes = self.stack_pop_bytes(size as usize)?;
                self.memory
                    .write_bytes(addr, &bytes)
                    .map_err(|fault| self.memory_fault(fault))?;
            }

            Opcode::WRITECS => {
                let addr = self.read_u64(ip + 1)?;
                let size = self.read_u32(ip + 9)?;
                let bytes = self.stack_pop_bytes(size as usize)?;
                self.memory
                    .write_bytes(addr, &bytes)
                    .map_err(|fault| self.memory_fault(fault))?;
            }

            Opcode::COPY => {
                let t = register_operand(self.byte_at(ip + 1)?);
                let size = self.read_u32(ip + 2)?;
                let s = register_operand(self.byte_at(ip + 6)?);
                let dst = self.read_register_address(t)?;
                let src = self.read_register_address(s)?;
                self.memory
                    .copy_within(dst, src, size as usize)
                    .map_err(|fault| self.memory_fault(fault))?;
            }

            Opcode::COPYC => {
                let dst = self.read_u64(ip + 1)?;
                let size = self.read_u32(ip + 9)?;
                let src = self.read_u64(ip + 13)?;
                self.memory
                    .copy_within(dst, src, size as usize)
                    .map_err(|fault| self.memory_fault(fault))?;
            }

            Opcode::JMP => {
                let target = self.read_u64(ip + 1)?;
                self.set_ip(target);
            }

            Opcode::JMPR => {
                let r = register_operand(self.byte_at(ip + 1)?);
                let target = self.read_register_address(r)?;
                self.set_ip(target);
            }

            Opcode::JZ => {
                let target = self.read_u64(ip + 1)?;
                self.set_ip(if self.zero_flag() { target } else { fall_through });
            }

            Opcode::JZR => {
                let r = register_operand(self.byte_at(ip + 1)?);
                let target = self.read_register_address(r)?;
                self.set_ip(if self.zero_flag() { target } else { fall_through });
            }

            Opcode::CALL => {
                let target = self.read_u64(ip + 1)?;
                self.call(target, fall_through)?;
            }

            Opcode::CALLR => {
                let r = register_operand(self.byte_at(ip + 1)?);
                let target = self.read_register_address(r)?;
                self.call(target, fall_through)?;
            }

            Opcode::RET => {
                self.ret()?;
            }

            Opcode::SYSCALL => {
                self.dispatch_syscall()?;
            }
        }

        Ok(())
    }

    fn byte_at(&self, addr: u64) -> Result<u8> {
        Ok(self
            .memory
            .read_bytes(addr, 1)
            .map_err(|fault| self.memory_fault(fault))?[0])
    }

    fn read_u32(&self, addr: u64) -> Result<u32> {
        self.memory.read_u32(addr).map_err(|fault| self.memory_fault(fault))
    }

    fn read_u64(&self, addr: u64) -> Result<u64> {
        self.memory.read_u64(addr).map_err(|fault| self.memory_fault(fault))
    }

    fn read_i64(&self, addr: u64) -> Result<i64> {
        Ok(self.read_u64(addr)? as i64)
    }

    fn read_register_bytes(&self, operand: RegisterOperand) -> Result<Vec<u8>> {
        self.registers
            .read_bytes(operand.id.code(), operand.width)
            .map_err(|fault| self.register_fault(fault))
    }

    fn write_register_bytes(&mut self, operand: RegisterOperand, bytes: &[u8]) -> Result<()> {
        self.registers
            .write_bytes(operand.id.code(), operand.width, bytes)
            .map_err(|fault| self.register_fault(fault))
    }

    /// `reg_read(reg, u64)`: the register's bytes, zero-extended, as an address.
    fn read_register_address(&self, operand: RegisterOperand) -> Result<u64> {
        self.registers
            .read(operand.id.code(), operand.width)
            .map_err(|fault| self.register_fault(fault))
    }

    fn read_register_signed(&self, operand: RegisterOperand) -> Result<i64> {
        self.registers
            .read_signed(operand.id.code(), operand.width)
            .map_err(|fault| self.register_fault(fault))
    }

    fn frame_relative_address(&self, offset: i64) -> u64 {
        (self.fp() as i64).wrapping_add(offset) as u64
    }

    fn read_frame_relative(&self, offset: i64, size: u32) -> Result<Vec<u8>> {
        let addr = self.frame_relative_address(offset);
        Ok(self
            .memory
            .read_bytes(addr, size as usize)
            .map_err(|fault| self.memory_fault(fault))?
            .to_vec())
    }
}
