use crate::error::{Result, Y86Error};
use crate::instruction::{Icode, Instruction, NO_REGISTER};
use crate::Cpu;

mod arithmetic;
mod control;
mod moves;
mod stack;
mod store_load;

/// Dispatches a decoded instruction against CPU state, via exhaustive
/// pattern matching over the finite `Icode` tag. Returns the PC the CPU
/// should commit to on success.
pub(crate) fn dispatch(cpu: &mut Cpu, instruction: Instruction) -> Result<u64> {
    match instruction.icode {
        Icode::Halt => {
            cpu.status = crate::Status::Hlt;
            Ok(instruction.val_p)
        }
        Icode::Nop => Ok(instruction.val_p),
        Icode::Rrmovq => moves::rrmovq(cpu, instruction),
        Icode::Irmovq => moves::irmovq(cpu, instruction),
        Icode::Rmmovq => store_load::rmmovq(cpu, instruction),
        Icode::Mrmovq => store_load::mrmovq(cpu, instruction),
        Icode::OpQ => arithmetic::opq(cpu, instruction),
        Icode::Jump => control::jump(cpu, instruction),
        Icode::Call => stack::call(cpu, instruction),
        Icode::Ret => stack::ret(cpu, instruction),
        Icode::Pushq => stack::pushq(cpu, instruction),
        Icode::Popq => stack::popq(cpu, instruction),
    }
}

/// Resolves an addressing-mode base register, where the no-register
/// sentinel legitimately means "base contribution is zero" rather than a
/// fault (unlike every other register field).
fn base_register(cpu: &Cpu, r_b: u8) -> Result<u64> {
    if r_b == NO_REGISTER {
        Ok(0)
    } else {
        cpu.register(r_b)
    }
}

fn memory_fault(addr: u64) -> impl Fn(Y86Error) -> Y86Error {
    move |_| Y86Error::MemoryFault { address: addr }
}
