use crate::error::{Result, Y86Error};
use crate::instruction::{Condition, Instruction};
use crate::Cpu;

/// `jXX`: `if cond(ifun) then valP <- valC`.
pub(crate) fn jump(cpu: &mut Cpu, instruction: Instruction) -> Result<u64> {
    let condition = Condition::try_from_ifun(instruction.ifun)
        .ok_or(Y86Error::InvalidInstruction { pc: cpu.pc })?;

    if condition.holds(cpu.zf, cpu.sf, cpu.of) {
        Ok(instruction.val_c)
    } else {
        Ok(instruction.val_p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Icode;

    fn jmp(ifun: u8) -> Instruction {
        Instruction {
            icode: Icode::Jump,
            ifun,
            r_a: 0xF,
            r_b: 0xF,
            val_c: 0x100,
            val_p: 9,
        }
    }

    #[test]
    fn unconditional_jump_always_taken() {
        let mut cpu = Cpu::new();
        assert_eq!(jump(&mut cpu, jmp(0)).unwrap(), 0x100);
    }

    #[test]
    fn conditional_jump_not_taken_falls_through() {
        let mut cpu = Cpu::new();
        cpu.zf = false;
        assert_eq!(jump(&mut cpu, jmp(3)).unwrap(), 9);
    }

    #[test]
    fn conditional_jump_taken_goes_to_valc() {
        let mut cpu = Cpu::new();
        cpu.zf = true;
        assert_eq!(jump(&mut cpu, jmp(3)).unwrap(), 0x100);
    }
}
