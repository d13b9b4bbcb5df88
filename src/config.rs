use std::{fmt, fs, io::ErrorKind, path::Path, str::FromStr};

use crate::{
    error::{Chip8Error, Result},
    quirks::Dialect,
};

pub const DEFAULT_CONFIG_PATH: &str = "config.txt";

const FIELDS: [&str; 5] = [
    "ENABLE_DELAY",
    "FREQUENCY_CPU",
    "SCALE_FACTOR",
    "FRAME_RATE",
    "CHIP_MODE",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Throttle the CPU to `frequency_cpu`; otherwise one instruction per pass.
    pub enable_delay: bool,
    pub frequency_cpu: u32,
    pub scale_factor: usize,
    pub frame_rate: u32,
    pub dialect: Dialect,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_delay: true,
            frequency_cpu: 700,
            scale_factor: 10,
            frame_rate: 60,
            dialect: Dialect::CosmacVip,
        }
    }
}

impl Config {
    /// Reads `path`, writing the defaults there first when it does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        let io_err = |source| Chip8Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("{} not found, writing defaults", path.display());
                fs::write(path, Config::default().to_string()).map_err(io_err)?;
                fs::read_to_string(path).map_err(io_err)?
            }
            Err(e) => return Err(io_err(e)),
        };
        let config: Config = text.parse()?;
        config.log();
        Ok(config)
    }

    fn log(&self) {
        log::info!("ENABLE_DELAY {}", self.enable_delay as u8);
        log::info!("FREQUENCY_CPU {}", self.frequency_cpu);
        log::info!("SCALE_FACTOR {}", self.scale_factor);
        log::info!("FRAME_RATE {}", self.frame_rate);
        log::info!("CHIP_MODE {} ({})", self.dialect.mask(), self.dialect);
    }
}

fn parse_field<T: FromStr>(line: usize, key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| Chip8Error::ConfigParse {
        line,
        reason: format!("{key} expects a non-negative integer, got '{value}'"),
    })
}

fn nonzero<T: Default + PartialEq>(line: usize, key: &str, value: T) -> Result<T> {
    if value == T::default() {
        return Err(Chip8Error::ConfigParse {
            line,
            reason: format!("{key} must be greater than zero"),
        });
    }
    Ok(value)
}

impl FromStr for Config {
    type Err = Chip8Error;

    fn from_str(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        // fields come in a fixed order, one per line
        let mut values: [(usize, &str); 5] = [(0, ""); 5];
        for (slot, key) in values.iter_mut().zip(FIELDS) {
            let (line, content) = lines.next().ok_or_else(|| Chip8Error::ConfigParse {
                line: text.lines().count() + 1,
                reason: format!("missing {key}"),
            })?;
            let mut parts = content.split_whitespace();
            let (name, value) = match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(value), None) => (name, value),
                _ => {
                    return Err(Chip8Error::ConfigParse {
                        line,
                        reason: format!("expected '{key} <value>', got '{content}'"),
                    })
                }
            };
            if name != key {
                return Err(Chip8Error::ConfigParse {
                    line,
                    reason: format!("expected {key}, got {name}"),
                });
            }
            *slot = (line, value);
        }
        if let Some((line, content)) = lines.next() {
            return Err(Chip8Error::ConfigParse {
                line,
                reason: format!("unexpected trailing entry '{content}'"),
            });
        }

        let [delay, cpu, scale, frame, mode] = values;
        Ok(Config {
            enable_delay: parse_field::<u32>(delay.0, FIELDS[0], delay.1)? != 0,
            frequency_cpu: parse_field(cpu.0, FIELDS[1], cpu.1)?,
            scale_factor: nonzero(scale.0, FIELDS[2], parse_field(scale.0, FIELDS[2], scale.1)?)?,
            frame_rate: nonzero(frame.0, FIELDS[3], parse_field(frame.0, FIELDS[3], frame.1)?)?,
            dialect: Dialect::from_mask(parse_field(mode.0, FIELDS[4], mode.1)?, mode.0)?,
        })
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ENABLE_DELAY {}", self.enable_delay as u8)?;
        writeln!(f, "FREQUENCY_CPU {}", self.frequency_cpu)?;
        writeln!(f, "SCALE_FACTOR {}", self.scale_factor)?;
        writeln!(f, "FRAME_RATE {}", self.frame_rate)?;
        writeln!(f, "CHIP_MODE {}", self.dialect.mask())
    }
}
