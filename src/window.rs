use chipquirk::{
    display::{FrameBuffer, HEIGHT, WIDTH},
    RenderSink,
};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

const ON: u32 = 0x00FF_FFFF;
const OFF: u32 = 0x0000_0000;

/// Something the host wants the session to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    KeyDown(u8),
    KeyUp(u8),
    Reset,
}

pub struct Screen {
    window: Window,
    pixel_buffer: Vec<u32>,
    scale: usize,
    // minifb only refreshes input on update, so edges are read once per frame
    fresh_input: bool,
}

// 1 2 3 4      1 2 3 C
// Q W E R  =>  4 5 6 D
// A S D F      7 8 9 E
// Z X C V      A 0 B F
fn key_to_num(key: Key) -> Option<u8> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}

impl Screen {
    pub fn new(scale: usize) -> anyhow::Result<Self> {
        let (w, h) = (WIDTH * scale, HEIGHT * scale);
        let mut window = Window::new(
            "chipquirk - ESC to exit, BACKSPACE to reset",
            w,
            h,
            WindowOptions::default(),
        )?;
        // pacing comes from the frame cadence
        window.limit_update_rate(None);
        Ok(Self {
            window,
            pixel_buffer: vec![OFF; w * h],
            scale,
            fresh_input: false,
        })
    }

    pub fn quit_requested(&self) -> bool {
        !self.window.is_open() || self.window.is_key_down(Key::Escape)
    }

    /// Pumps window input without drawing.
    pub fn refresh(&mut self) {
        self.window.update();
        self.fresh_input = true;
    }

    pub fn poll_events(&mut self) -> Vec<HostEvent> {
        if !self.fresh_input {
            return Vec::new();
        }
        self.fresh_input = false;

        let mut events: Vec<HostEvent> = self
            .window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(|k| {
                if k == Key::Backspace {
                    return Some(HostEvent::Reset);
                }
                key_to_num(k).map(HostEvent::KeyDown)
            })
            .collect();
        events.extend(
            self.window
                .get_keys_released()
                .into_iter()
                .filter_map(key_to_num)
                .map(HostEvent::KeyUp),
        );
        events
    }
}

impl RenderSink for Screen {
    fn render(&mut self, frame: &FrameBuffer) {
        let w = WIDTH * self.scale;
        for (y, row) in frame.rows().iter().enumerate() {
            for (x, &lit) in row.iter().enumerate() {
                let colour = if lit { ON } else { OFF };
                for sy in 0..self.scale {
                    let start = (y * self.scale + sy) * w + x * self.scale;
                    self.pixel_buffer[start..start + self.scale].fill(colour);
                }
            }
        }
        if let Err(e) = self
            .window
            .update_with_buffer(&self.pixel_buffer, w, HEIGHT * self.scale)
        {
            log::error!("window update failed: {e}");
        }
        self.fresh_input = true;
    }
}
