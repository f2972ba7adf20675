use crate::error::Result;
use crate::instruction::{AluOp, Instruction};
use crate::{Cpu, Y86Error};

/// `OPq`: `R[rB] <- R[rB] OP R[rA]`, setting ZF/SF/OF on the full-width
/// result. Shared by add/sub/and/xor so flag computation lives in one
/// place.
pub(crate) fn opq(cpu: &mut Cpu, instruction: Instruction) -> Result<u64> {
    let op = AluOp::try_from_ifun(instruction.ifun)
        .ok_or(Y86Error::InvalidInstruction { pc: cpu.pc })?;

    let val_a = cpu.register(instruction.r_a)?;
    let val_b = cpu.register(instruction.r_b)?;

    let (result, overflow) = match op {
        AluOp::Add => (val_b.wrapping_add(val_a), add_overflowed(val_a, val_b)),
        AluOp::Sub => (val_b.wrapping_sub(val_a), sub_overflowed(val_a, val_b)),
        AluOp::And => (val_b & val_a, false),
        AluOp::Xor => (val_b ^ val_a, false),
    };

    cpu.set_register(instruction.r_b, result)?;
    cpu.set_flags(result, overflow);

    Ok(instruction.val_p)
}

fn add_overflowed(val_a: u64, val_b: u64) -> bool {
    let (a, b, r) = (val_a as i64, val_b as i64, val_b.wrapping_add(val_a) as i64);
    (a >= 0) == (b >= 0) && (r >= 0) != (a >= 0)
}

fn sub_overflowed(val_a: u64, val_b: u64) -> bool {
    let (a, b, r) = (val_a as i64, val_b as i64, val_b.wrapping_sub(val_a) as i64);
    (a < 0) != (b < 0) && (r < 0) != (b < 0)
}
