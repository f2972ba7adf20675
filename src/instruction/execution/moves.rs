use crate::error::{Result, Y86Error};
use crate::instruction::{Condition, Instruction};
use crate::Cpu;

/// `rrmovq` / `cmovXX`: `if cond(ifun) then R[rB] <- R[rA]`. Both register
/// fields are architecturally read on every execution of this opcode, so
/// both are validated regardless of whether the condition holds.
pub(crate) fn rrmovq(cpu: &mut Cpu, instruction: Instruction) -> Result<u64> {
    let condition = Condition::try_from_ifun(instruction.ifun)
        .ok_or(Y86Error::InvalidInstruction { pc: cpu.pc })?;

    let value = cpu.register(instruction.r_a)?;
    // Touch rB even on the untaken path so an illegal register still faults.
    cpu.register(instruction.r_b)?;

    if condition.holds(cpu.zf, cpu.sf, cpu.of) {
        cpu.set_register(instruction.r_b, value)?;
    }

    Ok(instruction.val_p)
}

/// `irmovq`: `R[rB] <- valC`. The register byte's rA field is unused by
/// this opcode and is not validated.
pub(crate) fn irmovq(cpu: &mut Cpu, instruction: Instruction) -> Result<u64> {
    cpu.set_register(instruction.r_b, instruction.val_c)?;
    Ok(instruction.val_p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Icode;

    #[test]
    fn unconditional_move_copies_register() {
        let mut cpu = Cpu::new();
        cpu.registers[0] = 0x42;
        let inst = Instruction {
            icode: Icode::Rrmovq,
            ifun: 0,
            r_a: 0,
            r_b: 1,
            val_c: 0,
            val_p: 2,
        };
        rrmovq(&mut cpu, inst).unwrap();
        assert_eq!(cpu.registers[1], 0x42);
    }

    #[test]
    fn conditional_move_skipped_when_predicate_false() {
        let mut cpu = Cpu::new();
        cpu.registers[0] = 0x42;
        cpu.registers[1] = 0x99;
        cpu.zf = false;
        let inst = Instruction {
            icode: Icode::Rrmovq,
            ifun: 3, // e: requires ZF
            r_a: 0,
            r_b: 1,
            val_c: 0,
            val_p: 2,
        };
        rrmovq(&mut cpu, inst).unwrap();
        assert_eq!(cpu.registers[1], 0x99);
    }

    #[test]
    fn irmovq_loads_immediate_into_target_register() {
        let mut cpu = Cpu::new();
        let inst = Instruction {
            icode: Icode::Irmovq,
            ifun: 0,
            r_a: 0xF,
            r_b: 4,
            val_c: 256,
            val_p: 10,
        };
        irmovq(&mut cpu, inst).unwrap();
        assert_eq!(cpu.registers[4], 256);
    }
}
