use std::path::PathBuf;

use crate::quirks::Dialect;

pub type Result<T> = std::result::Result<T, Chip8Error>;

#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryBounds { address: usize },

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes; truncated")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("call stack overflow: depth already at capacity {capacity}")]
    CallStackOverflow { capacity: usize },

    #[error("call stack underflow: return with empty call stack")]
    CallStackUnderflow,

    #[error("unsupported opcode {opcode:#06X}")]
    UnsupportedOpcode { opcode: u16 },

    #[error("opcode {opcode:#06X} has no defined behaviour under {dialect:?}")]
    UnresolvedQuirk { opcode: u16, dialect: Dialect },

    #[error("config line {line}: {reason}")]
    ConfigParse { line: usize, reason: String },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Chip8Error {
    /// Instruction-level anomalies the engine reports and steps over.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOpcode { .. }
                | Self::UnresolvedQuirk { .. }
                | Self::CallStackOverflow { .. }
                | Self::CallStackUnderflow
        )
    }
}
