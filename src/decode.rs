use crate::memory::TypeAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction {
    code: u16,
}

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction { code }
    }

    // n is starting digit (1-based, from the left), m is length
    pub fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        // 0110 1100 1111 0001
        // -------------------
        // 1111 1111 1111 1111
        //      1111 1111 1111
        //           1111 1111
        //                1111
        //
        // 4 - (m) - (n - 1)
        let shift_places = (4 - m - (n - 1)) * 4;
        let mask = (1u32 << (m * 4)) - 1;
        (self.code >> shift_places) & mask as u16
    }

    pub fn identifier(&self) -> u8 {
        self.nth_m_digits(1, 1) as u8
    }

    pub fn x(&self) -> u8 {
        self.nth_m_digits(2, 1) as u8
    }

    pub fn y(&self) -> u8 {
        self.nth_m_digits(3, 1) as u8
    }

    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }

    pub fn nn(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }

    pub fn nnn(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }
}

#[test]
fn test_bit_manip() {
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 1), 0xC);
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(3, 1), 0xE);
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 1), 0x4);

    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 2), 0x4C);
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 2), 0xCE);
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 3), 0xCEE);
}

#[test]
fn test_fields() {
    let raw = RawInstruction::new(0xD12F);
    assert_eq!(raw.identifier(), 0xD);
    assert_eq!(raw.x(), 0x1);
    assert_eq!(raw.y(), 0x2);
    assert_eq!(raw.n(), 0xF);
    assert_eq!(raw.nn(), 0x2F);
    assert_eq!(raw.nnn(), 0x12F);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    // 00E0
    // turn all pixels to 0
    ClearScreen,
    // 0NNN
    // legacy machine code routine, run as an ordinary subroutine call
    MachineCall(TypeAddr),
    // 1NNN
    // set PC to address NNN, "jump" to memory location
    Jump(TypeAddr),
    // 6XNN
    // set register VX to value NN
    SetRegister(u8, u8),
    // 7XNN
    // add value NN to VX, VF untouched
    AddToRegister(u8, u8),
    // ANNN
    // set index register I to address NNN
    SetIndexRegister(TypeAddr),
    // DXYN
    // draw an N pixel tall sprite starting at I
    // at Coordinates (VX, VY)
    // XOR pixels on screen using sprite data
    // if pixels on screen were switched OFF: VF set to 1
    Display(u8, u8, u8),

    // 2NNN
    PushSubroutine(TypeAddr),
    // 00EE
    PopSubroutine,

    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    /// 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XYE
    LeftShift(u8, u8),
    // 8XY6
    RightShift(u8, u8),

    // BNNN (BXNN on SUPER-CHIP)
    JumpWithOffset(u8, TypeAddr),
    // CXNN
    Random(u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),

    // FX1E
    AddToIndex(u8),
    // FX0A
    GetKey(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),

    // FX65
    LoadRegisterFromMemory(u8),
    // FX55
    StoreRegisterToMemory(u8),

    Unimplemented(u16),
}

impl OpCodes {
    pub fn decode_raw(ins: u16) -> Self {
        let raw = RawInstruction::new(ins);
        let (x, y) = (raw.x(), raw.y());

        match raw.identifier() {
            0x0 => match ins {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::PopSubroutine,
                _ => Self::MachineCall(raw.nnn()),
            },
            0x1 => Self::Jump(raw.nnn()),
            0x2 => Self::PushSubroutine(raw.nnn()),
            0x3 => Self::SkipEqualConstant(x, raw.nn()),
            0x4 => Self::SkipNotEqualConstant(x, raw.nn()),
            0x5 if raw.n() == 0 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, raw.nn()),
            0x7 => Self::AddToRegister(x, raw.nn()),
            0x8 => match raw.n() {
                0x0 => Self::CopyRegister(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::XOr(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::SubtractForward(x, y),
                0x6 => Self::RightShift(x, y),
                0x7 => Self::SubtractBackward(x, y),
                0xE => Self::LeftShift(x, y),
                _ => Self::Unimplemented(ins),
            },
            0x9 if raw.n() == 0 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(raw.nnn()),
            0xB => Self::JumpWithOffset(x, raw.nnn()),
            0xC => Self::Random(x, raw.nn()),
            0xD => Self::Display(x, y, raw.n()),
            0xE => match raw.nn() {
                0x9E => Self::SkipIfPressed(x),
                0xA1 => Self::SkipIfNotPressed(x),
                _ => Self::Unimplemented(ins),
            },
            0xF => match raw.nn() {
                0x07 => Self::CopyDelayToRegister(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::CopyRegisterToDelay(x),
                0x18 => Self::CopyRegisterToSound(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::PointChar(x),
                0x33 => Self::ToDecimal(x),
                0x55 => Self::StoreRegisterToMemory(x),
                0x65 => Self::LoadRegisterFromMemory(x),
                _ => Self::Unimplemented(ins),
            },
            _ => Self::Unimplemented(ins),
        }
    }
}
