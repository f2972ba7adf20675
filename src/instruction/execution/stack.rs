use super::memory_fault;
use crate::error::Result;
use crate::instruction::{Instruction, RSP};
use crate::Cpu;

/// `call`: pushes the fall-through address, then jumps to `valC`.
pub(crate) fn call(cpu: &mut Cpu, instruction: Instruction) -> Result<u64> {
    let new_rsp = cpu.register(RSP)?.wrapping_sub(8);
    cpu.memory
        .write_quad(new_rsp, instruction.val_p)
        .map_err(memory_fault(new_rsp))?;
    cpu.set_register(RSP, new_rsp)?;
    Ok(instruction.val_c)
}

/// `ret`: pops the return address left by `call` and jumps to it.
pub(crate) fn ret(cpu: &mut Cpu, _instruction: Instruction) -> Result<u64> {
    let rsp = cpu.register(RSP)?;
    let return_addr = cpu.memory.read_quad(rsp).map_err(memory_fault(rsp))?;
    cpu.set_register(RSP, rsp.wrapping_add(8))?;
    Ok(return_addr)
}

/// `pushq`: `R[rsp] -= 8; M8[R[rsp]] <- R[rA]`.
pub(crate) fn pushq(cpu: &mut Cpu, instruction: Instruction) -> Result<u64> {
    let value = cpu.register(instruction.r_a)?;
    let new_rsp = cpu.register(RSP)?.wrapping_sub(8);
    cpu.memory
        .write_quad(new_rsp, value)
        .map_err(memory_fault(new_rsp))?;
    cpu.set_register(RSP, new_rsp)?;
    Ok(instruction.val_p)
}

/// `popq`: `R[rA] <- M8[R[rsp]]; R[rsp] += 8`.
pub(crate) fn popq(cpu: &mut Cpu, instruction: Instruction) -> Result<u64> {
    let rsp = cpu.register(RSP)?;
    let value = cpu.memory.read_quad(rsp).map_err(memory_fault(rsp))?;
    cpu.set_register(instruction.r_a, value)?;
    cpu.set_register(RSP, rsp.wrapping_add(8))?;
    Ok(instruction.val_p)
}
