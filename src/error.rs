use thiserror::Error;

/// Every way a simulation run can fail, from a malformed `.yo` file all the
/// way through an architectural fault surfaced by the driver.
#[derive(Error, Debug)]
pub enum Y86Error {
    #[error("malformed .yo line {line}: {fragment:?}")]
    Parse { line: usize, fragment: String },

    #[error("program image is empty")]
    EmptyProgram,

    #[error("memory fault at address 0x{address:016x}")]
    MemoryFault { address: u64 },

    #[error("invalid instruction at pc 0x{pc:016x}")]
    InvalidInstruction { pc: u64 },

    #[error("step cap of {cap} instructions exceeded without halting")]
    StepCapExceeded { cap: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Y86Error>;
