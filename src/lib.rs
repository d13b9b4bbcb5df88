// 16 8-bit data registers named V0 to VF
// I -> address register, PC -> program counter
//
// Stack of return addresses, 255 deep
//
// Delay timer & Sound timer: Count down at 60 times / s until 0
// Tone on while the sound timer is non-zero
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier
//
// Three dialects (COSMAC VIP, CHIP-48, SUPER-CHIP) differ on four quirks,
// see `quirks`.

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod quirks;
pub mod registers;
pub mod scheduler;
pub mod timer;

pub use config::Config;
pub use emulator::Emulator;
pub use error::{Chip8Error, Result};
pub use quirks::Dialect;
pub use scheduler::{AudioSink, PassSummary, RenderSink, Scheduler};
