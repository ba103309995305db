use std::io;
use thiserror::Error;

/// Everything that can stop the interpreter. None of these are recoverable at
/// the point they happen; the driver decides whether to halt or report.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("unsupported instruction {word:#06x}")]
    UnsupportedInstruction { word: u16 },

    #[error("stack overflow: more than 16 nested calls")]
    StackOverflow,

    #[error("stack underflow: return with no outstanding call")]
    StackUnderflow,

    /// `what` names the space: memory address or display row
    #[error("{what} out of bounds at {at:#06x}")]
    OutOfBounds { what: &'static str, at: usize },

    #[error("invalid key {key:#04x}")]
    InvalidKey { key: u8 },

    #[error("program is {size} bytes, at most {max} fit in memory")]
    ProgramTooLarge { size: usize, max: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
