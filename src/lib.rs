//! A sequential simulator for the Y86-64 instruction set: decode/execute
//! core, `.yo` object-file parser, and the driver that steps a loaded
//! program to completion.

use std::collections::HashMap;

use instruction::{execution, Icode, Instruction, NO_REGISTER, REGISTER_NAMES};
use log::debug;

pub mod driver;
pub mod error;
mod instruction;
pub mod memory;
pub mod parser;
pub mod snapshot;

pub use error::{Result, Y86Error};
pub use memory::Memory;

/// The machine's lifecycle state: ready to run, halted, or faulted on a bad
/// memory access or a bad instruction.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Status {
    /// Ready to execute the next instruction.
    Aok,
    /// A halt instruction has retired; machine stopped normally.
    Hlt,
    /// A memory access was rejected (address out of range).
    Adr,
    /// An invalid instruction code or illegal operand was seen.
    Ins,
}

/// Architectural state of a Y86-64 machine: the 15 general-purpose
/// registers, the three condition codes, the program counter, status, and
/// memory.
pub struct Cpu {
    pub registers: [u64; 15],
    pub zf: bool,
    pub sf: bool,
    pub of: bool,
    pub pc: u64,
    pub status: Status,
    pub memory: Memory,
    /// The architectural fault (if any) behind the current `Adr`/`Ins`
    /// status, kept for the driver to turn into a diagnosed `Y86Error`.
    pub last_fault: Option<Y86Error>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            registers: [0; 15],
            zf: false,
            sf: false,
            of: false,
            pc: 0,
            status: Status::Aok,
            memory: Memory::new(),
            last_fault: None,
        }
    }

    /// Resets registers, flags, PC, status, and memory to their initial
    /// values.
    pub fn reset(&mut self) {
        self.registers = [0; 15];
        self.zf = false;
        self.sf = false;
        self.of = false;
        self.pc = 0;
        self.status = Status::Aok;
        self.memory.clear();
        self.last_fault = None;
    }

    /// Resets the CPU, writes every byte of `image` into memory, and sets
    /// `pc` to the minimum address present in `image`.
    pub fn load(&mut self, image: &HashMap<u64, u8>) -> Result<()> {
        if image.is_empty() {
            return Err(Y86Error::EmptyProgram);
        }

        self.reset();
        for (&addr, &byte) in image {
            self.memory.write_byte(addr, byte);
        }
        self.pc = *image.keys().min().expect("checked non-empty above");

        Ok(())
    }

    /// Runs one fetch+execute cycle. Returns `true` if the machine is still
    /// `Aok` afterwards, `false` once it has stopped (halted or faulted);
    /// a call on an already-stopped machine is a no-op that returns
    /// `false`.
    pub fn step(&mut self) -> bool {
        if self.status != Status::Aok {
            return false;
        }

        match self.fetch() {
            Ok(instruction) => {
                debug!(
                    "pc=0x{:x} icode={:?} ifun={} rA={} rB={} valC=0x{:x}",
                    self.pc,
                    instruction.icode,
                    instruction.ifun,
                    instruction.r_a,
                    instruction.r_b,
                    instruction.val_c
                );
                match execution::dispatch(self, instruction) {
                    Ok(next_pc) => self.pc = next_pc,
                    Err(err) => self.fault(err),
                }
            }
            Err(err) => self.fault(err),
        }

        self.status == Status::Aok
    }

    fn fault(&mut self, err: Y86Error) {
        self.status = match err {
            Y86Error::MemoryFault { .. } => Status::Adr,
            _ => Status::Ins,
        };
        self.last_fault = Some(err);
    }

    /// Reads the instruction at `pc` without mutating architectural state
    /// beyond computing the fall-through address `valP`.
    fn fetch(&self) -> Result<Instruction> {
        let opcode_byte = self.memory.read_byte(self.pc);
        let icode = Icode::try_from_nibble(opcode_byte >> 4)
            .ok_or(Y86Error::InvalidInstruction { pc: self.pc })?;
        let ifun = opcode_byte & 0xF;

        let mut cursor = self
            .pc
            .checked_add(1)
            .ok_or(Y86Error::MemoryFault { address: self.pc })?;

        let (r_a, r_b) = if icode.has_register_byte() {
            let register_byte = self.memory.read_byte(cursor);
            cursor = cursor
                .checked_add(1)
                .ok_or(Y86Error::MemoryFault { address: cursor })?;
            (register_byte >> 4, register_byte & 0xF)
        } else {
            (NO_REGISTER, NO_REGISTER)
        };

        let val_c = if icode.has_valc() {
            let value = self
                .memory
                .read_quad(cursor)
                .map_err(|_| Y86Error::MemoryFault { address: cursor })?;
            cursor = cursor
                .checked_add(8)
                .ok_or(Y86Error::MemoryFault { address: cursor })?;
            value
        } else {
            0
        };

        Ok(Instruction {
            icode,
            ifun,
            r_a,
            r_b,
            val_c,
            val_p: cursor,
        })
    }

    /// Reads a general-purpose register by index. Faults if `idx` is the
    /// no-register sentinel or otherwise out of the 0..14 range.
    pub(crate) fn register(&self, idx: u8) -> Result<u64> {
        if idx as usize >= REGISTER_NAMES.len() {
            return Err(Y86Error::InvalidInstruction { pc: self.pc });
        }
        Ok(self.registers[idx as usize])
    }

    pub(crate) fn set_register(&mut self, idx: u8, value: u64) -> Result<()> {
        if idx as usize >= REGISTER_NAMES.len() {
            return Err(Y86Error::InvalidInstruction { pc: self.pc });
        }
        self.registers[idx as usize] = value;
        Ok(())
    }

    /// Sets ZF/SF/OF from a 64-bit ALU result, centralising flag
    /// computation for add/sub/and/xor.
    pub(crate) fn set_flags(&mut self, result: u64, overflow: bool) {
        self.zf = result == 0;
        self.sf = (result >> 63) & 1 == 1;
        self.of = overflow;
    }

    /// Produces the final structured snapshot: PC, all fifteen registers,
    /// condition codes, non-zero memory grouped into aligned 8-byte blocks,
    /// and the halt/fault status code.
    pub fn snapshot(&self) -> snapshot::CpuState {
        snapshot::build(self)
    }
}
