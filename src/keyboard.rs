pub const KEY_COUNT: usize = 16;

/// Pressed state of the 16-key hex pad, fed by press/release edges.
#[derive(Debug, Default)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn press(&mut self, key: u8) {
        if let Some(k) = self.keys.get_mut(key as usize) {
            *k = true;
        }
    }

    pub fn release(&mut self, key: u8) {
        if let Some(k) = self.keys.get_mut(key as usize) {
            *k = false;
        }
    }

    // register values above 0xF name no key, so they are never pressed
    pub fn get_key_status_from_num(&self, n: u8) -> bool {
        self.keys.get(n as usize).copied().unwrap_or(false)
    }
}

/// FX0A progress. The instruction re-dispatches every pass until a key has
/// gone down and come back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyWait {
    #[default]
    Idle,
    WaitingForPress,
    WaitingForRelease(u8),
    // release seen, the next dispatch stores the key
    Released(u8),
}

/// What the FX0A dispatch should do this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyWaitPoll {
    Wait,
    Complete(u8),
}

impl KeyWait {
    pub fn poll(&mut self) -> KeyWaitPoll {
        match *self {
            KeyWait::Idle => {
                log::debug!("FX0A: waiting for key press");
                *self = KeyWait::WaitingForPress;
                KeyWaitPoll::Wait
            }
            KeyWait::WaitingForPress | KeyWait::WaitingForRelease(_) => KeyWaitPoll::Wait,
            KeyWait::Released(key) => {
                *self = KeyWait::Idle;
                KeyWaitPoll::Complete(key)
            }
        }
    }

    pub fn on_press(&mut self, key: u8) {
        if *self == KeyWait::WaitingForPress {
            log::debug!("FX0A: key {key:X} down, waiting for release");
            *self = KeyWait::WaitingForRelease(key);
        }
    }

    pub fn on_release(&mut self, key: u8) {
        if *self == KeyWait::WaitingForRelease(key) {
            log::debug!("FX0A: key {key:X} released");
            *self = KeyWait::Released(key);
        }
    }

    pub fn is_waiting(&self) -> bool {
        *self != KeyWait::Idle
    }
}
