use log::{error, info, warn};

use crate::error::{Result, Y86Error};
use crate::parser::parse_yo;
use crate::snapshot::CpuState;
use crate::{Cpu, Status};

/// Default guard against a divergent or infinite-looping program; not an
/// architectural feature, just a bound on how long a single run may take.
pub const DEFAULT_STEP_CAP: u64 = 10_000;

/// Loads a `.yo` listing into a fresh CPU and steps it to completion,
/// returning the final architectural snapshot.
pub struct Driver {
    step_cap: u64,
}

impl Driver {
    pub fn new() -> Self {
        Self {
            step_cap: DEFAULT_STEP_CAP,
        }
    }

    pub fn with_step_cap(step_cap: u64) -> Self {
        Self { step_cap }
    }

    /// Parses `source`, loads it into a fresh [`Cpu`], and steps until the
    /// machine halts, faults, or the step cap is exceeded.
    pub fn run(&self, source: &str) -> Result<CpuState> {
        let image = parse_yo(source)?;
        info!("parsed program: {} bytes across the address space", image.len());

        let mut cpu = Cpu::new();
        cpu.load(&image)?;
        info!("loaded program, entry point pc=0x{:x}", cpu.pc);

        let mut steps = 0u64;
        loop {
            if steps >= self.step_cap {
                warn!("step cap of {} exceeded without halting", self.step_cap);
                return Err(Y86Error::StepCapExceeded { cap: self.step_cap });
            }

            let running = cpu.step();
            steps += 1;

            if !running {
                break;
            }
        }

        match cpu.status {
            Status::Hlt => {
                info!("halted normally after {} steps", steps);
                Ok(cpu.snapshot())
            }
            Status::Adr | Status::Ins => {
                let err = cpu
                    .last_fault
                    .take()
                    .unwrap_or(Y86Error::InvalidInstruction { pc: cpu.pc });
                error!("execution stopped after {} steps: {}", steps, err);
                Err(err)
            }
            Status::Aok => unreachable!("loop only exits once status has left Aok"),
        }
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_a_halting_program_to_a_snapshot() {
        let source = "0x000: 30 f0 05 00 00 00 00 00 00 00 | irmovq $5, %rax\n\
                       0x00a: 00                              | halt\n";
        let driver = Driver::new();
        let state = driver.run(source).unwrap();
        assert_eq!(state.stat, 1);
        assert_eq!(state.reg.get("rax"), Some(&5));
    }

    #[test]
    fn empty_program_is_rejected() {
        let driver = Driver::new();
        let err = driver.run("| just a comment\n").unwrap_err();
        assert!(matches!(err, Y86Error::EmptyProgram));
    }

    #[test]
    fn diverging_program_trips_the_step_cap() {
        // jmp 0 (unconditional jump back to itself) -> never halts.
        let source = "0x000: 70 00 00 00 00 00 00 00 00 00\n";
        let driver = Driver::with_step_cap(100);
        let err = driver.run(source).unwrap_err();
        assert!(matches!(err, Y86Error::StepCapExceeded { cap: 100 }));
    }

    #[test]
    fn invalid_opcode_is_reported_distinctly() {
        let driver = Driver::new();
        let err = driver.run("0x000: f0\n").unwrap_err();
        assert!(matches!(err, Y86Error::InvalidInstruction { .. }));
    }
}
