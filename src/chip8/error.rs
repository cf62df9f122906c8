use thiserror::Error;

pub type Result<T> = std::result::Result<T, Chip8Error>;

/// Conditions that stop the VM; a well-formed program never hits these.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("pc at invalid address {pc:#05X}")]
    PcOutOfBounds { pc: u16 },

    #[error("stack overflow calling subroutine from {pc:#05X}")]
    StackOverflow { pc: u16 },

    #[error("stack underflow returning from {pc:#05X}")]
    StackUnderflow { pc: u16 },

    #[error("memory access out of bounds at {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("program is too large ({size} bytes), max size is {max} bytes")]
    ProgramTooLarge { size: usize, max: usize },
}
