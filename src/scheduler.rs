use std::time::Instant;

use crate::{
    config::Config,
    display::FrameBuffer,
    emulator::Emulator,
    error::Result,
    timer::{Cadence, TIMER_DEC_PER_SECOND},
};

/// Receives the full 64x32 grid once per frame cadence tick.
pub trait RenderSink {
    fn render(&mut self, frame: &FrameBuffer);
}

/// Receives the tone-enable signal. Sample generation is the sink's business.
pub trait AudioSink {
    fn set_tone(&mut self, enabled: bool);
}

/// What one pass did, mostly for tests and tracing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub timers_ticked: bool,
    pub frame_rendered: bool,
    pub instruction_executed: bool,
}

/// Cooperative single-threaded driver: three independent cadences checked
/// against one clock sample per pass.
pub struct Scheduler {
    timer: Cadence,
    frame: Cadence,
    // None runs one instruction every pass
    cpu: Option<Cadence>,
}

impl Scheduler {
    pub fn new(config: &Config, now: Instant) -> Self {
        let cpu = (config.enable_delay && config.frequency_cpu > 0)
            .then(|| Cadence::from_hz(config.frequency_cpu, now));
        Self {
            timer: Cadence::from_hz(TIMER_DEC_PER_SECOND, now),
            frame: Cadence::from_hz(config.frame_rate, now),
            cpu,
        }
    }

    pub fn is_throttled(&self) -> bool {
        self.cpu.is_some()
    }

    /// Runs at most one unit of work per cadence. Recoverable instruction
    /// anomalies are logged and stepped over; anything else ends the session.
    pub fn pass(
        &mut self,
        now: Instant,
        emu: &mut Emulator,
        renderer: &mut impl RenderSink,
        audio: &mut impl AudioSink,
    ) -> Result<PassSummary> {
        let mut summary = PassSummary::default();

        if self.timer.fire(now) {
            summary.timers_ticked = true;
            if let Some(tone) = emu.tick_timers() {
                audio.set_tone(tone);
            }
        }

        if self.frame.fire(now) {
            summary.frame_rendered = true;
            renderer.render(emu.display());
        }

        let run_cpu = match self.cpu.as_mut() {
            Some(cadence) => cadence.fire(now),
            None => true,
        };
        if run_cpu {
            summary.instruction_executed = true;
            match emu.tick() {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => log::warn!("{e}"),
                Err(e) => {
                    log::debug!("pass aborted: {e}");
                    return Err(e);
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quirks::Dialect;
    use std::time::Duration;

    #[derive(Default)]
    struct FrameLog {
        frames: Vec<FrameBuffer>,
    }

    impl RenderSink for FrameLog {
        fn render(&mut self, frame: &FrameBuffer) {
            self.frames.push(frame.clone());
        }
    }

    #[derive(Default)]
    struct ToneLog {
        signals: Vec<bool>,
    }

    impl AudioSink for ToneLog {
        fn set_tone(&mut self, enabled: bool) {
            self.signals.push(enabled);
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn config(enable_delay: bool, frequency_cpu: u32) -> Config {
        Config {
            enable_delay,
            frequency_cpu,
            ..Config::default()
        }
    }

    fn emu(program: &[u8]) -> Emulator {
        let mut emu = Emulator::with_seed(Dialect::CosmacVip, 1);
        emu.load_rom(program).unwrap();
        emu
    }

    // jump to self
    const SPIN: [u8; 2] = [0x12, 0x00];

    #[test]
    fn unthrottled_runs_every_pass() {
        let start = Instant::now();
        let mut sched = Scheduler::new(&config(false, 700), start);
        assert!(!sched.is_throttled());
        let mut emu = emu(&[0x70, 0x01, 0x70, 0x01, 0x70, 0x01]);
        let (mut r, mut a) = (FrameLog::default(), ToneLog::default());
        for _ in 0..3 {
            let s = sched.pass(start, &mut emu, &mut r, &mut a).unwrap();
            assert!(s.instruction_executed);
        }
        assert_eq!(emu.regs.get(0), 3);
        assert!(r.frames.is_empty());
    }

    #[test]
    fn zero_frequency_is_unthrottled() {
        let sched = Scheduler::new(&config(true, 0), Instant::now());
        assert!(!sched.is_throttled());
    }

    #[test]
    fn throttled_cpu_waits_for_period() {
        let start = Instant::now();
        // 100 Hz -> 10ms
        let mut sched = Scheduler::new(&config(true, 100), start);
        let mut emu = emu(&SPIN);
        let (mut r, mut a) = (FrameLog::default(), ToneLog::default());
        let s = sched.pass(start + ms(5), &mut emu, &mut r, &mut a).unwrap();
        assert!(!s.instruction_executed);
        let s = sched.pass(start + ms(10), &mut emu, &mut r, &mut a).unwrap();
        assert!(s.instruction_executed);
        // far behind, still a single instruction
        let s = sched.pass(start + ms(100), &mut emu, &mut r, &mut a).unwrap();
        assert!(s.instruction_executed);
        let s = sched.pass(start + ms(101), &mut emu, &mut r, &mut a).unwrap();
        assert!(!s.instruction_executed);
    }

    #[test]
    fn frame_cadence_hands_over_display() {
        let start = Instant::now();
        let mut sched = Scheduler::new(&config(true, 1000), start);
        let mut emu = emu(&[0xA0, 0x50, 0xD0, 0x05, 0x12, 0x04]);
        let (mut r, mut a) = (FrameLog::default(), ToneLog::default());
        for t in 1..=20 {
            sched.pass(start + ms(t), &mut emu, &mut r, &mut a).unwrap();
        }
        assert_eq!(r.frames.len(), 1);
        assert!(r.frames[0].pixel(0, 0));
        assert_eq!(&r.frames[0], emu.display());
    }

    #[test]
    fn sound_timer_of_one_never_enables_tone() {
        let start = Instant::now();
        let mut sched = Scheduler::new(&config(false, 0), start);
        // V1 = 1; ST = V1; spin
        let mut emu = emu(&[0x61, 0x01, 0xF1, 0x18, 0x12, 0x04]);
        let (mut r, mut a) = (FrameLog::default(), ToneLog::default());
        sched.pass(start, &mut emu, &mut r, &mut a).unwrap();
        sched.pass(start, &mut emu, &mut r, &mut a).unwrap();
        assert_eq!(emu.sound_timer.count, 1);
        assert!(!emu.tone_enabled());
        let s = sched.pass(start + ms(17), &mut emu, &mut r, &mut a).unwrap();
        assert!(s.timers_ticked);
        assert_eq!(emu.sound_timer.count, 0);
        assert!(!emu.tone_enabled());
        assert!(a.signals.iter().all(|on| !on));
    }

    #[test]
    fn tone_raised_and_lowered() {
        let start = Instant::now();
        let mut sched = Scheduler::new(&config(false, 0), start);
        let mut emu = emu(&SPIN);
        emu.sound_timer.set(2);
        let (mut r, mut a) = (FrameLog::default(), ToneLog::default());
        sched.pass(start + ms(17), &mut emu, &mut r, &mut a).unwrap();
        sched.pass(start + ms(34), &mut emu, &mut r, &mut a).unwrap();
        sched.pass(start + ms(51), &mut emu, &mut r, &mut a).unwrap();
        assert_eq!(a.signals, vec![true, false]);
    }

    #[test]
    fn recoverable_error_keeps_running() {
        let start = Instant::now();
        let mut sched = Scheduler::new(&config(false, 0), start);
        let mut emu = emu(&[0x00, 0xEE, 0x60, 0x09]);
        let (mut r, mut a) = (FrameLog::default(), ToneLog::default());
        sched.pass(start, &mut emu, &mut r, &mut a).unwrap();
        sched.pass(start, &mut emu, &mut r, &mut a).unwrap();
        assert_eq!(emu.regs.get(0), 9);
    }

    #[test]
    fn memory_fault_ends_session() {
        let start = Instant::now();
        let mut sched = Scheduler::new(&config(false, 0), start);
        let mut emu = emu(&[0x1F, 0xFF]);
        let (mut r, mut a) = (FrameLog::default(), ToneLog::default());
        sched.pass(start, &mut emu, &mut r, &mut a).unwrap();
        assert!(sched.pass(start, &mut emu, &mut r, &mut a).is_err());
    }

    #[test]
    fn key_wait_does_not_stall_timers() {
        let start = Instant::now();
        let mut sched = Scheduler::new(&config(false, 0), start);
        let mut emu = emu(&[0xF0, 0x0A]);
        emu.delay_timer.set(5);
        let (mut r, mut a) = (FrameLog::default(), ToneLog::default());
        for i in 1..=3 {
            sched.pass(start + ms(17 * i), &mut emu, &mut r, &mut a).unwrap();
        }
        assert_eq!(emu.delay_timer.count, 2);
        assert_eq!(r.frames.len(), 3);
        assert_eq!(emu.regs.pc.0, 0x200);
    }
}
