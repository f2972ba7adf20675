use super::{base_register, memory_fault};
use crate::error::Result;
use crate::instruction::Instruction;
use crate::Cpu;

/// `rmmovq`: `M8[R[rB] + valC] <- R[rA]`.
pub(crate) fn rmmovq(cpu: &mut Cpu, instruction: Instruction) -> Result<u64> {
    let base = base_register(cpu, instruction.r_b)?;
    let addr = base.wrapping_add(instruction.val_c);
    let value = cpu.register(instruction.r_a)?;
    cpu.memory
        .write_quad(addr, value)
        .map_err(memory_fault(addr))?;
    Ok(instruction.val_p)
}

/// `mrmovq`: `R[rA] <- M8[R[rB] + valC]`.
pub(crate) fn mrmovq(cpu: &mut Cpu, instruction: Instruction) -> Result<u64> {
    let base = base_register(cpu, instruction.r_b)?;
    let addr = base.wrapping_add(instruction.val_c);
    let value = cpu.memory.read_quad(addr).map_err(memory_fault(addr))?;
    cpu.set_register(instruction.r_a, value)?;
    Ok(instruction.val_p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Icode;

    fn store(r_a: u8, r_b: u8, val_c: u64) -> Instruction {
        Instruction {
            icode: Icode::Rmmovq,
            ifun: 0,
            r_a,
            r_b,
            val_c,
            val_p: 9,
        }
    }

    fn load(r_a: u8, r_b: u8, val_c: u64) -> Instruction {
        Instruction {
            icode: Icode::Mrmovq,
            ifun: 0,
            r_a,
            r_b,
            val_c,
            val_p: 9,
        }
    }

    #[test]
    fn store_then_load_round_trips_through_memory() {
        let mut cpu = Cpu::new();
        cpu.registers[3] = 0x200; // rbx
        cpu.registers[0] = 0x1234_5678; // rax
        rmmovq(&mut cpu, store(0, 3, 0)).unwrap();
        mrmovq(&mut cpu, load(1, 3, 0)).unwrap();
        assert_eq!(cpu.registers[1], 0x1234_5678);
    }

    #[test]
    fn no_register_base_contributes_zero() {
        let mut cpu = Cpu::new();
        cpu.registers[0] = 0xAB;
        rmmovq(&mut cpu, store(0, 0xF, 0x300)).unwrap();
        assert_eq!(cpu.memory.read_quad(0x300).unwrap(), 0xAB);
    }
}
