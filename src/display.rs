pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

pub type Grid = [[bool; WIDTH]; HEIGHT];

#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bit_buffer: Grid,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: [[false; WIDTH]; HEIGHT],
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [[false; WIDTH]; HEIGHT];
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[y][x]
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> &Grid {
        &self.bit_buffer
    }

    /// XORs an 8-pixel-wide sprite onto the grid with its anchor at (x, y).
    ///
    /// Only the anchor wraps; rows and columns that run past the right or
    /// bottom edge are clipped. Returns true when any set pixel was turned off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let (x, y) = (x as usize % WIDTH, y as usize % HEIGHT);
        let mut collision = false;
        for (i, row) in sprite.iter().enumerate() {
            let ny = y + i;
            if ny >= HEIGHT {
                break;
            }
            for j in 0..8 {
                let nx = x + j;
                if nx >= WIDTH {
                    break;
                }
                let bit = (row >> (7 - j)) & 1 == 1;
                let pixel = &mut self.bit_buffer[ny][nx];
                if bit && *pixel {
                    collision = true;
                }
                *pixel ^= bit;
            }
        }
        collision
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.bit_buffer.iter() {
            let line: String = row.iter().map(|&p| if p { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
