//! Shared byte-image assembly helpers for the scenario/integration tests.
//! Mirrors the opcode encodings from `vm_opcodes::Opcode::fixed_length` — these
//! helpers exist so the tests read as "what the program does", not as manual
//! byte-offset bookkeeping.

use vm_opcodes::{Opcode, RegisterId, RegisterOperand, Width};

pub struct Image(pub Vec<u8>);

impl Image {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> u64 {
        self.0.len() as u64
    }

    fn op(&mut self, opcode: Opcode) -> &mut Self {
        self.0.push(opcode as u8);
        self
    }

    fn reg(&mut self, code: u8, width: Width) -> &mut Self {
        self.0.push(RegisterOperand::new(RegisterId::new(code).unwrap(), width).to_byte());
        self
    }

    fn u32(&mut self, value: u32) -> &mut Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn u64(&mut self, value: u64) -> &mut Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn i64(&mut self, value: i64) -> &mut Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.0.extend_from_slice(bytes);
        self
    }

    pub fn nop(&mut self) -> &mut Self {
        self.op(Opcode::NOP)
    }

    pub fn mov(&mut self, target: u8, target_width: Width, source: u8, source_width: Width) -> &mut Self {
        self.op(Opcode::MOV).reg(target, target_width).reg(source, source_width)
    }

    pub fn loadi(&mut self, target: u8, width: Width, value: u64) -> &mut Self {
        let size = width.len() as u32;
        self.op(Opcode::LOADI).reg(target, width).u32(size);
        self.bytes(&value.to_le_bytes()[..width.len()])
    }

    pub fn rst(&mut self, target: u8, width: Width) -> &mut Self {
        self.op(Opcode::RST).reg(target, width)
    }

    pub fn push_bytes(&mut self, value: &[u8]) -> &mut Self {
        self.op(Opcode::PUSH).u32(value.len() as u32).bytes(value)
    }

    pub fn push_width(&mut self, width: Width, value: u64) -> &mut Self {
        self.push_bytes(&value.to_le_bytes()[..width.len()])
    }

    pub fn rpush(&mut self, source: u8, width: Width) -> &mut Self {
        self.op(Opcode::RPUSH).reg(source, width)
    }

    pub fn rpop(&mut self, target: u8, width: Width) -> &mut Self {
        self.op(Opcode::RPOP).reg(target, width).u32(width.len() as u32)
    }

    pub fn load(&mut self, target: u8, width: Width, size: u32, offset: i64) -> &mut Self {
        self.op(Opcode::LOAD).reg(target, width).u32(size).i64(offset)
    }

    pub fn loadr(&mut self, target: u8, width: Width, size: u32, offset_reg: u8) -> &mut Self {
        self.op(Opcode::LOADR)
            .reg(target, width)
            .u32(size)
            .reg(offset_reg, Width::QWord)
    }

    pub fn loads(&mut self, size: u32, offset: i64) -> &mut Self {
        self.op(Opcode::LOADS).u32(size).i64(offset)
    }

    pub fn loadsr(&mut self, size: u32, offset_reg: u8) -> &mut Self {
        self.op(Opcode::LOADSR).u32(size).reg(offset_reg, Width::QWord)
    }

    pub fn store(&mut self, offset: i64, source: u8, width: Width) -> &mut Self {
        self.op(Opcode::STORE).i64(offset).reg(source, width)
    }

    pub fn read(&mut self, target: u8, target_width: Width, source: u8) -> &mut Self {
        self.op(Opcode::READ).reg(target, target_width).reg(source, Width::QWord)
    }

    pub fn readc(&mut self, target: u8, target_width: Width, address: u64) -> &mut Self {
        self.op(Opcode::READC).reg(target, target_width).u64(address)
    }

    pub fn reads(&mut self, size: u32, source: u8) -> &mut Self {
        self.op(Opcode::READS).u32(size).reg(source, Width::QWord)
    }

    pub fn readcs(&mut self, size: u32, address: u64) -> &mut Self {
        self.op(Opcode::READCS).u32(size).u64(address)
    }

    pub fn write(&mut self, target: u8, source: u8, source_width: Width) -> &mut Self {
        self.op(Opcode::WRITE).reg(target, Width::QWord).reg(source, source_width)
    }

    pub fn writec(&mut self, address: u64, source: u8, source_width: Width) -> &mut Self {
        self.op(Opcode::WRITEC).u64(address).reg(source, source_width)
    }

    pub fn writes(&mut self, target: u8, size: u32) -> &mut Self {
        self.op(Opcode::WRITES).reg(target, Width::QWord).u32(size)
    }

    pub fn writecs(&mut self, address: u64, size: u32) -> &mut Self {
        self.op(Opcode::WRITECS).u64(address).u32(size)
    }

    pub fn copy(&mut self, target: u8, size: u32, source: u8) -> &mut Self {
        self.op(Opcode::COPY)
            .reg(target, Width::QWord)
            .u32(size)
            .reg(source, Width::QWord)
    }

    pub fn copyc(&mut self, target: u64, size: u32, source: u64) -> &mut Self {
        self.op(Opcode::COPYC).u64(target).u32(size).u64(source)
    }

    pub fn jmp(&mut self, address: u64) -> &mut Self {
        self.op(Opcode::JMP).u64(address)
    }

    pub fn jmpr(&mut self, target: u8) -> &mut Self {
        self.op(Opcode::JMPR).reg(target, Width::QWord)
    }

    pub fn jz(&mut self, address: u64) -> &mut Self {
        self.op(Opcode::JZ).u64(address)
    }

    pub fn jzr(&mut self, target: u8) -> &mut Self {
        self.op(Opcode::JZR).reg(target, Width::QWord)
    }

    pub fn call(&mut self, address: u64) -> &mut Self {
        self.op(Opcode::CALL).u64(address)
    }

    pub fn callr(&mut self, target: u8) -> &mut Self {
        self.op(Opcode::CALLR).reg(target, Width::QWord)
    }

    pub fn ret(&mut self) -> &mut Self {
        self.op(Opcode::RET)
    }

    pub fn syscall(&mut self) -> &mut Self {
        self.op(Opcode::SYSCALL)
    }

    pub fn raw(&mut self, byte: u8) -> &mut Self {
        self.0.push(byte);
        self
    }

    pub fn finish(&mut self) -> Vec<u8> {
        self.0.clone()
    }
}

pub const SYSCALL_EXIT: u64 = 0;
pub const SYSCALL_DEBUGGER: u64 = 1;
pub const SYSCALL_GROW: u64 = 2;

/// `PUSH code:byte; PUSH id:word; SYSCALL` — the standard `EXIT` trailer.
pub fn exit(image: &mut Image, code: u8) {
    image.push_width(Width::Byte, u64::from(code));
    image.push_width(Width::Word, SYSCALL_EXIT);
    image.syscall();
}
