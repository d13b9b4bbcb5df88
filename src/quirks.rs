use std::{fmt, str::FromStr};

use crate::error::{Chip8Error, Result};

/// Historical platform whose instruction semantics the interpreter follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    CosmacVip,
    Chip48,
    SuperChip,
}

/// Which register an 8XY6/8XYE shift reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftSource {
    Vx,
    Vy,
}

/// Which register offsets BNNN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOffset {
    V0,
    Vx,
    // no rule exists for this dialect
    Unresolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    pub logic_clears_vf: bool,
    pub shift_source: ShiftSource,
    pub jump_offset: JumpOffset,
    pub transfer_increments_index: bool,
}

const QUIRK_TABLE: [Quirks; 3] = [
    // COSMAC VIP
    Quirks {
        logic_clears_vf: true,
        shift_source: ShiftSource::Vy,
        jump_offset: JumpOffset::V0,
        transfer_increments_index: true,
    },
    // CHIP-48
    Quirks {
        logic_clears_vf: false,
        shift_source: ShiftSource::Vx,
        jump_offset: JumpOffset::Unresolved,
        transfer_increments_index: false,
    },
    // SUPER-CHIP
    Quirks {
        logic_clears_vf: false,
        shift_source: ShiftSource::Vx,
        jump_offset: JumpOffset::Vx,
        transfer_increments_index: false,
    },
];

impl Dialect {
    pub const fn quirks(self) -> Quirks {
        QUIRK_TABLE[self as usize]
    }

    /// Config-file bitmask value.
    pub const fn mask(self) -> u8 {
        match self {
            Self::CosmacVip => 0x1,
            Self::Chip48 => 0x2,
            Self::SuperChip => 0x4,
        }
    }

    /// Exactly one known bit must be set; combinations have no defined meaning.
    pub fn from_mask(mask: u8, line: usize) -> Result<Self> {
        match mask {
            0x1 => Ok(Self::CosmacVip),
            0x2 => Ok(Self::Chip48),
            0x4 => Ok(Self::SuperChip),
            other => Err(Chip8Error::ConfigParse {
                line,
                reason: format!("CHIP_MODE must be exactly one of 1, 2 or 4, got {other}"),
            }),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CosmacVip => "COSMAC VIP",
            Self::Chip48 => "CHIP-48",
            Self::SuperChip => "SUPER-CHIP",
        };
        f.write_str(name)
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vip" | "cosmac" | "cosmacvip" => Ok(Self::CosmacVip),
            "chip48" => Ok(Self::Chip48),
            "schip" | "superchip" => Ok(Self::SuperChip),
            other => Err(format!("unknown dialect '{other}' (expected vip, chip48 or schip)")),
        }
    }
}
