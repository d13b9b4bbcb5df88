use std::time::{Duration, Instant};

use chipquirk::{
    display::FrameBuffer, memory::PROGRAM_START, AudioSink, Chip8Error, Config, Dialect,
    Emulator, RenderSink, Scheduler,
};

const DIALECTS: [Dialect; 3] = [Dialect::CosmacVip, Dialect::Chip48, Dialect::SuperChip];

fn boot(dialect: Dialect, rom: &[u8]) -> Emulator {
    let mut emu = Emulator::with_seed(dialect, 8);
    emu.load_rom(rom).unwrap();
    emu
}

fn run(emu: &mut Emulator, cycles: usize) {
    for _ in 0..cycles {
        emu.tick().unwrap();
    }
}

#[derive(Default)]
struct Frames(usize);

impl RenderSink for Frames {
    fn render(&mut self, _frame: &FrameBuffer) {
        self.0 += 1;
    }
}

#[derive(Default)]
struct Tones(Vec<bool>);

impl AudioSink for Tones {
    fn set_tone(&mut self, enabled: bool) {
        self.0.push(enabled);
    }
}

#[test]
fn add_with_carry() {
    // V1 = FF, V2 = 01, 8124
    let mut emu = boot(Dialect::CosmacVip, &[0x61, 0xFF, 0x62, 0x01, 0x81, 0x24]);
    run(&mut emu, 3);
    assert_eq!(emu.regs.get(1), 0x00);
    assert_eq!(emu.regs.flag(), 1);
}

#[test]
fn subtract_with_borrow() {
    // V1 = 01, V2 = 02, 8125
    let mut emu = boot(Dialect::CosmacVip, &[0x61, 0x01, 0x62, 0x02, 0x81, 0x25]);
    run(&mut emu, 3);
    assert_eq!(emu.regs.get(1), 0xFF);
    assert_eq!(emu.regs.flag(), 0);
}

#[test]
fn clear_screen_advances_pc() {
    for dialect in DIALECTS {
        let mut emu = boot(dialect, &[0x00, 0xE0]);
        run(&mut emu, 1);
        assert_eq!(*emu.display(), FrameBuffer::new());
        assert_eq!(emu.regs.pc.0, PROGRAM_START + 2);
    }
}

#[test]
fn draws_font_zero_at_origin() {
    for dialect in DIALECTS {
        let mut emu = boot(dialect, &[0xA2, 0x50, 0xD0, 0x05]);
        emu.regs.set_flag(true);
        run(&mut emu, 1);
        assert_eq!(emu.regs.index.0, 0x250);

        // point I at glyph '0' so the draw reads the font
        emu.regs.index.set_addr(0x50);
        run(&mut emu, 1);
        assert_eq!(emu.regs.flag(), 0);
        let glyph = [0xF0u8, 0x90, 0x90, 0x90, 0xF0];
        for (y, row) in glyph.iter().enumerate() {
            for x in 0..8 {
                let expected = x < 4 && (row >> (7 - x)) & 1 == 1;
                assert_eq!(emu.display().pixel(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }
}

#[test]
fn logic_ops_flag_per_dialect() {
    for op in [0x81, 0x82, 0x83] {
        // VF = 7, V1 = 0x3C, V2 = 0xA5, 812op
        let rom = [0x6F, 0x07, 0x61, 0x3C, 0x62, 0xA5, 0x81, 0x20 | (op & 0xF)];
        for dialect in DIALECTS {
            let mut emu = boot(dialect, &rom);
            run(&mut emu, 4);
            let expected = if dialect == Dialect::CosmacVip { 0 } else { 7 };
            assert_eq!(emu.regs.flag(), expected, "{dialect} 8XY{:X}", op & 0xF);
        }
    }
}

#[test]
fn register_transfer_index_per_dialect() {
    // I = 0x300, V0..V3 = 1..4, F355, then I = 0x300 again, F365
    let rom = [
        0xA3, 0x00, 0x60, 0x01, 0x61, 0x02, 0x62, 0x03, 0x63, 0x04, 0xF3, 0x55, 0xA3, 0x00,
        0x60, 0x00, 0xF3, 0x65,
    ];
    for dialect in DIALECTS {
        let mut emu = boot(dialect, &rom);
        run(&mut emu, 6);
        let after_store = emu.regs.index.0;
        assert_eq!(emu.mem.slice(0x300, 4).unwrap(), &[1, 2, 3, 4]);

        run(&mut emu, 3);
        assert_eq!(emu.regs.get(0), 1);
        let expected = if dialect == Dialect::CosmacVip { 0x304 } else { 0x300 };
        assert_eq!(after_store, expected, "{dialect} FX55");
        assert_eq!(emu.regs.index.0, expected, "{dialect} FX65");
    }
}

#[test]
fn one_tick_sound_never_beeps() {
    // V0 = 1, F018
    let mut emu = boot(Dialect::CosmacVip, &[0x60, 0x01, 0xF0, 0x18]);
    run(&mut emu, 2);
    assert!(!emu.tone_enabled());
    assert_eq!(emu.tick_timers(), Some(false));
    assert_eq!(emu.sound_timer.count, 0);
    assert!(!emu.tone_enabled());
}

#[test]
fn call_and_return() {
    // 200: 2206  202: 6107  204: 1204  206: 6005  208: 00EE
    let rom = [0x22, 0x06, 0x61, 0x07, 0x12, 0x04, 0x60, 0x05, 0x00, 0xEE];
    let mut emu = boot(Dialect::SuperChip, &rom);
    run(&mut emu, 1);
    assert_eq!(emu.stack.depth(), 1);
    assert_eq!(emu.regs.pc.0, 0x206);
    run(&mut emu, 3);
    assert_eq!(emu.stack.depth(), 0);
    assert_eq!((emu.regs.get(0), emu.regs.get(1)), (5, 7));
    assert_eq!(emu.regs.pc.0, 0x204);
}

#[test]
fn anomalies_are_recoverable() {
    let mut emu = boot(Dialect::Chip48, &[0xFF, 0xFF, 0x00, 0xEE, 0xB3, 0x00]);
    for _ in 0..3 {
        let err = emu.tick().unwrap_err();
        assert!(err.is_recoverable(), "{err}");
    }
    assert_eq!(emu.regs.pc.0, 0x206);
}

#[test]
fn key_wait_completes_after_release() {
    // F30A
    let mut emu = boot(Dialect::CosmacVip, &[0xF3, 0x0A]);
    run(&mut emu, 2);
    assert_eq!(emu.regs.pc.0, PROGRAM_START);
    emu.key_down(0xB);
    run(&mut emu, 1);
    assert_eq!(emu.regs.pc.0, PROGRAM_START);
    emu.key_up(0xB);
    run(&mut emu, 1);
    assert_eq!(emu.regs.get(3), 0xB);
    assert_eq!(emu.regs.pc.0, PROGRAM_START + 2);
}

#[test]
fn reset_reloads_rom() {
    let mut emu = boot(Dialect::CosmacVip, &[0x6A, 0x42, 0x12, 0x00]);
    run(&mut emu, 1);
    emu.reset();
    assert_eq!(emu.regs.get(0xA), 0);
    assert_eq!(emu.regs.pc.0, PROGRAM_START);
    run(&mut emu, 1);
    assert_eq!(emu.regs.get(0xA), 0x42);
}

#[test]
fn oversized_rom_is_truncated() {
    let rom = vec![0xAA; 5000];
    let mut emu = Emulator::new(Dialect::CosmacVip);
    match emu.load_rom(&rom) {
        Err(Chip8Error::RomTooLarge { size, max_size }) => {
            assert_eq!(size, 5000);
            assert_eq!(max_size, 0xFFF - 0x200);
        }
        other => panic!("expected RomTooLarge, got {other:?}"),
    }
    assert_eq!(emu.mem.get(0xFFE).unwrap(), 0xAA);
}

#[test]
fn oversized_rom_file_runs_after_reset() {
    let path = std::env::temp_dir().join(format!("chipquirk-big-{}.ch8", std::process::id()));
    // V3 = 0x77, then padding past the size limit
    let mut rom = vec![0x63, 0x77];
    rom.resize(5000, 0x00);
    std::fs::write(&path, &rom).unwrap();

    let mut emu = Emulator::new(Dialect::CosmacVip);
    let err = emu.load_rom_file(&path).unwrap_err();
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(err, Chip8Error::RomTooLarge { size: 5000, .. }));

    emu.reset();
    assert_eq!(emu.mem.word(PROGRAM_START).unwrap(), 0x6377);
    run(&mut emu, 1);
    assert_eq!(emu.regs.get(3), 0x77);
    assert_eq!(emu.regs.pc.0, PROGRAM_START + 2);
}

#[test]
fn missing_rom_file_is_io_error() {
    let path = std::env::temp_dir().join("chipquirk-no-such-rom.ch8");
    let mut emu = Emulator::new(Dialect::CosmacVip);
    match emu.load_rom_file(&path) {
        Err(Chip8Error::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Io, got {other:?}"),
    }
}

#[test]
fn scheduler_drives_all_cadences() {
    // V0 = 5, F018, then spin
    let mut emu = boot(Dialect::CosmacVip, &[0x60, 0x05, 0xF0, 0x18, 0x12, 0x04]);
    let config = Config {
        enable_delay: false,
        ..Config::default()
    };
    let start = Instant::now();
    let mut scheduler = Scheduler::new(&config, start);
    let (mut frames, mut tones) = (Frames::default(), Tones::default());

    let first = scheduler
        .pass(start, &mut emu, &mut frames, &mut tones)
        .unwrap();
    assert!(first.instruction_executed);
    assert!(!first.timers_ticked);
    scheduler
        .pass(start, &mut emu, &mut frames, &mut tones)
        .unwrap();
    assert_eq!(emu.sound_timer.count, 5);

    let mut now = start;
    for _ in 0..5 {
        now += Duration::from_millis(17);
        scheduler
            .pass(now, &mut emu, &mut frames, &mut tones)
            .unwrap();
    }
    assert_eq!(emu.sound_timer.count, 0);
    assert_eq!(tones.0, vec![true, true, true, true, false]);
    assert_eq!(frames.0, 5);
}
