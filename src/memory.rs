use crate::error::{Chip8Error, Result};

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; 5 * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const FONT_START: TypeAddr = 0x50;
pub const FONT_GLYPH_BYTES: TypeAddr = 5;
pub const PROGRAM_START: TypeAddr = 0x200;
// the last byte of memory is never loaded into
pub const MAX_ROM_SIZE: usize = 0xFFF - PROGRAM_START as usize;
pub const STACK_CAPACITY: usize = 255;

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Address of the glyph for the low nibble of `digit`.
pub fn glyph_addr(digit: u8) -> TypeAddr {
    FONT_START + (digit & 0xF) as TypeAddr * FONT_GLYPH_BYTES
}

pub struct Memory {
    // 4k bytes
    // font data stored from 050 -> 09F (000 -> 04F is empty by convention)
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut mem = Self {
            bytes: [0; MEMORY_SIZE],
        };
        mem.install_font();
        mem
    }

    pub fn install_font(&mut self) {
        let start = FONT_START as usize;
        self.bytes[start..start + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
    }

    fn check(addr: usize, len: usize) -> Result<std::ops::Range<usize>> {
        let end = addr + len;
        if end > MEMORY_SIZE {
            // report the first address that falls outside
            let address = addr.max(MEMORY_SIZE);
            return Err(Chip8Error::MemoryBounds { address });
        }
        Ok(addr..end)
    }

    pub fn get(&self, addr: TypeAddr) -> Result<u8> {
        let range = Self::check(addr as usize, 1)?;
        Ok(self.bytes[range.start])
    }

    pub fn set(&mut self, addr: TypeAddr, val: u8) -> Result<()> {
        let range = Self::check(addr as usize, 1)?;
        self.bytes[range.start] = val;
        Ok(())
    }

    /// Bounds-checked view of `len` bytes starting at `addr`.
    pub fn slice(&self, addr: TypeAddr, len: usize) -> Result<&[u8]> {
        let range = Self::check(addr as usize, len)?;
        Ok(&self.bytes[range])
    }

    pub fn slice_mut(&mut self, addr: TypeAddr, len: usize) -> Result<&mut [u8]> {
        let range = Self::check(addr as usize, len)?;
        Ok(&mut self.bytes[range])
    }

    /// Big-endian opcode at `addr`.
    pub fn word(&self, addr: TypeAddr) -> Result<u16> {
        let pair = self.slice(addr, 2)?;
        Ok(u16::from_be_bytes([pair[0], pair[1]]))
    }

    // loads program instructions starting at address 0x200
    // an oversized ROM is still loaded up to the limit, the error tells the caller it was cut
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<usize> {
        let start = PROGRAM_START as usize;
        let len = bytes.len().min(MAX_ROM_SIZE);
        self.bytes[start..start + len].copy_from_slice(&bytes[..len]);
        log::debug!("loaded {} ROM bytes at {:#05x}", len, start);

        if bytes.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: bytes.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        Ok(len)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Stack {
    addresses: [TypeAddr; STACK_CAPACITY],
    depth: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_CAPACITY],
            depth: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<()> {
        if self.depth >= STACK_CAPACITY {
            return Err(Chip8Error::CallStackOverflow {
                capacity: STACK_CAPACITY,
            });
        }
        self.addresses[self.depth] = addr;
        self.depth += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<TypeAddr> {
        if self.depth == 0 {
            return Err(Chip8Error::CallStackUnderflow);
        }
        self.depth -= 1;
        Ok(self.addresses[self.depth])
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
