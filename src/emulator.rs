use std::path::Path;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    decode::OpCodes,
    display::FrameBuffer,
    error::{Chip8Error, Result},
    keyboard::{KeyWait, KeyWaitPoll, Keyboard},
    memory::{glyph_addr, Memory, Stack, MAX_ROM_SIZE},
    quirks::{Dialect, JumpOffset, ShiftSource},
    registers::Registers,
    timer::Timer,
};

/// The whole machine state. Owned by whoever drives it; nothing here is global.
pub struct Emulator {
    fb: FrameBuffer,
    pub regs: Registers,
    pub mem: Memory,
    pub stack: Stack,
    pub delay_timer: Timer,
    pub sound_timer: Timer,
    keyboard: Keyboard,
    key_wait: KeyWait,
    tone: bool,
    dialect: Dialect,
    rng: StdRng,
    rom: Vec<u8>,
}

impl Emulator {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_rng(dialect, StdRng::from_entropy())
    }

    /// Deterministic CXNN results, for tests and replays.
    pub fn with_seed(dialect: Dialect, seed: u64) -> Self {
        Self::with_rng(dialect, StdRng::seed_from_u64(seed))
    }

    fn with_rng(dialect: Dialect, rng: StdRng) -> Self {
        Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem: Memory::new(),
            stack: Stack::new(),
            delay_timer: Timer::new(0),
            sound_timer: Timer::new(0),
            keyboard: Keyboard::new(),
            key_wait: KeyWait::Idle,
            tone: false,
            dialect,
            rng,
            rom: Vec::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<usize> {
        self.rom = bytes[..bytes.len().min(MAX_ROM_SIZE)].to_vec();
        self.mem.load_rom(bytes)
    }

    pub fn load_rom_file(&mut self, path: &Path) -> Result<usize> {
        let program = std::fs::read(path).map_err(|source| Chip8Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_rom(&program)
    }

    /// Back to power-on state with the font and the last loaded ROM in place.
    pub fn reset(&mut self) {
        self.fb.clear_buffer();
        self.regs = Registers::new();
        self.mem = Memory::new();
        self.stack = Stack::new();
        self.delay_timer = Timer::new(0);
        self.sound_timer = Timer::new(0);
        self.keyboard.reset();
        self.key_wait = KeyWait::Idle;
        self.tone = false;
        // stored copy is already within the size limit
        if let Err(e) = self.mem.load_rom(&self.rom) {
            log::error!("reloading ROM after reset: {e}");
        }
        log::info!("reset ({} ROM bytes, {})", self.rom.len(), self.dialect);
    }

    pub fn display(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn key_wait(&self) -> KeyWait {
        self.key_wait
    }

    pub fn tone_enabled(&self) -> bool {
        self.tone
    }

    pub fn key_down(&mut self, key: u8) {
        self.keyboard.press(key);
        self.key_wait.on_press(key);
    }

    pub fn key_up(&mut self, key: u8) {
        self.keyboard.release(key);
        self.key_wait.on_release(key);
    }

    /// One timer-cadence unit. Returns the new tone-enable value when it may
    /// have changed.
    pub fn tick_timers(&mut self) -> Option<bool> {
        self.delay_timer.decrement();
        if self.sound_timer.decrement() {
            self.tone = self.sound_timer.count != 0;
            return Some(self.tone);
        }
        if self.tone {
            // timer was zeroed by FX18 while the tone was on
            self.tone = false;
            return Some(false);
        }
        None
    }

    pub fn fetch_decode(&mut self) -> Result<OpCodes> {
        let pc = self.regs.pc.0;
        let ins = self.mem.word(pc)?;
        self.regs.pc.increment();
        log::trace!("{pc:#05x}: {ins:04X}");
        Ok(OpCodes::decode_raw(ins))
    }

    /// One fetch-decode-execute cycle.
    pub fn tick(&mut self) -> Result<()> {
        let operation = self.fetch_decode()?;
        self.execute_ins(operation)
    }

    pub fn execute_ins(&mut self, ins: OpCodes) -> Result<()> {
        let quirks = self.dialect.quirks();
        match ins {
            OpCodes::Jump(addr) => {
                self.regs.pc.set_addr(addr);
            }
            OpCodes::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
            }
            OpCodes::AddToRegister(vx, nn) => {
                self.regs.add_to_register(vx, nn);
            }
            OpCodes::SetIndexRegister(addr) => self.regs.index.set_addr(addr),
            OpCodes::ClearScreen => {
                self.fb.clear_buffer();
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                // From I to I + N, plot at VX, VY
                let sprite = self.mem.slice(self.regs.index.0, height as usize)?;
                let vf = self.fb.paint(x, y, sprite);
                self.regs.set_flag(vf);
            }
            OpCodes::PushSubroutine(addr) | OpCodes::MachineCall(addr) => {
                // PC already points past the call
                self.stack.push(self.regs.pc.0)?;
                self.regs.pc.set_addr(addr);
            }
            OpCodes::PopSubroutine => {
                let addr = self.stack.pop()?;
                self.regs.pc.set_addr(addr);
            }
            OpCodes::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
                if quirks.logic_clears_vf {
                    self.regs.set_flag(false);
                }
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
                if quirks.logic_clears_vf {
                    self.regs.set_flag(false);
                }
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
                if quirks.logic_clears_vf {
                    self.regs.set_flag(false);
                }
            }
            OpCodes::Add(vx, vy) => {
                let sum = self.regs.get(vx) as u16 + self.regs.get(vy) as u16;
                self.regs.set_register(vx, (sum & 0xFF) as u8);
                self.regs.set_flag(sum > 0xFF);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.subtract(vx, x, y);
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.subtract(vx, y, x);
            }
            OpCodes::LeftShift(vx, vy) => {
                let src = match quirks.shift_source {
                    ShiftSource::Vx => vx,
                    ShiftSource::Vy => vy,
                };
                let value = self.regs.get(src);
                self.regs.set_register(vx, value << 1);
                self.regs.set_register(0xF, (value >> 7) & 1);
            }
            OpCodes::RightShift(vx, vy) => {
                let src = match quirks.shift_source {
                    ShiftSource::Vx => vx,
                    ShiftSource::Vy => vy,
                };
                let value = self.regs.get(src);
                self.regs.set_register(vx, value >> 1);
                self.regs.set_register(0xF, value & 1);
            }
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
            }
            OpCodes::JumpWithOffset(vx, addr) => {
                let offset = match quirks.jump_offset {
                    JumpOffset::V0 => self.regs.get(0),
                    JumpOffset::Vx => self.regs.get(vx),
                    JumpOffset::Unresolved => {
                        return Err(Chip8Error::UnresolvedQuirk {
                            opcode: 0xB000 | addr,
                            dialect: self.dialect,
                        })
                    }
                };
                self.regs.pc.set_addr(addr + offset as u16);
            }
            OpCodes::AddToIndex(vx) => {
                self.regs.index.advance(self.regs.get(vx) as u16);
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                if self.regs.get(vx) == nn {
                    self.regs.pc.increment();
                }
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                if self.regs.get(vx) != nn {
                    self.regs.pc.increment();
                }
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                if self.regs.get(vx) == self.regs.get(vy) {
                    self.regs.pc.increment();
                }
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                if self.regs.get(vx) != self.regs.get(vy) {
                    self.regs.pc.increment();
                }
            }
            OpCodes::PointChar(vx) => {
                self.regs.index.set_addr(glyph_addr(self.regs.get(vx)));
            }
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let digits = self.mem.slice_mut(self.regs.index.0, 3)?;
                digits.copy_from_slice(&[value / 100, (value / 10) % 10, value % 10]);
            }
            OpCodes::SkipIfPressed(vx) => {
                if self.keyboard.get_key_status_from_num(self.regs.get(vx)) {
                    self.regs.pc.increment();
                }
            }
            OpCodes::SkipIfNotPressed(vx) => {
                if !self.keyboard.get_key_status_from_num(self.regs.get(vx)) {
                    self.regs.pc.increment();
                }
            }
            OpCodes::CopyDelayToRegister(vx) => self.regs.set_register(vx, self.delay_timer.count),
            OpCodes::CopyRegisterToDelay(vx) => self.delay_timer.set(self.regs.get(vx)),
            OpCodes::CopyRegisterToSound(vx) => self.sound_timer.set(self.regs.get(vx)),
            OpCodes::GetKey(vx) => match self.key_wait.poll() {
                // re-dispatch this instruction next cycle
                KeyWaitPoll::Wait => self.regs.pc.decrement(),
                KeyWaitPoll::Complete(key) => self.regs.set_register(vx, key),
            },
            OpCodes::LoadRegisterFromMemory(vx) => {
                let count = vx as usize + 1;
                let bytes = self.mem.slice(self.regs.index.0, count)?;
                for (reg, val) in bytes.iter().enumerate() {
                    self.regs.set_register(reg as u8, *val);
                }
                if quirks.transfer_increments_index {
                    self.regs.index.advance(count as u16);
                }
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                let count = vx as usize + 1;
                let dest = self.mem.slice_mut(self.regs.index.0, count)?;
                for (reg, slot) in dest.iter_mut().enumerate() {
                    *slot = self.regs.get(reg as u8);
                }
                if quirks.transfer_increments_index {
                    self.regs.index.advance(count as u16);
                }
            }
            OpCodes::Unimplemented(opcode) => {
                return Err(Chip8Error::UnsupportedOpcode { opcode });
            }
        }
        Ok(())
    }

    // VX <- minuend - subtrahend, VF <- 1 when no borrow
    fn subtract(&mut self, vx: u8, minuend: u8, subtrahend: u8) {
        let diff = (minuend as u16 | 0x100) - subtrahend as u16;
        self.regs.set_register(vx, (diff & 0xFF) as u8);
        self.regs.set_register(0xF, ((diff >> 8) & 1) as u8);
    }
}
