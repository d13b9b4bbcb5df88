use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use chipquirk::{AudioSink, Chip8Error, Config, Dialect, Emulator, Scheduler};
use clap::Parser;
use sound::AudioOut;
use window::{HostEvent, Screen};

mod sound;
mod window;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter with COSMAC VIP, CHIP-48 and SUPER-CHIP quirks")]
struct Args {
    /// ROM file to run
    rom: PathBuf,

    #[arg(short, long, default_value = chipquirk::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override CHIP_MODE from the config file (vip, chip48, schip)
    #[arg(short, long)]
    mode: Option<Dialect>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = Config::load_or_create(&args.config)?;
    if let Some(mode) = args.mode {
        config.dialect = mode;
    }

    let mut emu = Emulator::new(config.dialect);
    // a fatal session error parks the machine until the user resets it
    let mut halted = match emu.load_rom_file(&args.rom) {
        Ok(size) => {
            log::info!("loaded {} ({size} bytes) as {}", args.rom.display(), config.dialect);
            false
        }
        // the truncated image is kept, a reset runs it
        Err(e @ Chip8Error::RomTooLarge { .. }) => {
            log::error!("{e} (BACKSPACE to run the truncated ROM, ESC to quit)");
            true
        }
        Err(e) => return Err(e.into()),
    };

    let mut screen = Screen::new(config.scale_factor)?;
    let mut audio = AudioOut::open();
    let mut scheduler = Scheduler::new(&config, Instant::now());

    // quit is only checked between passes, never mid-instruction
    while !screen.quit_requested() {
        if halted {
            screen.refresh();
            std::thread::sleep(Duration::from_millis(16));
        } else if let Err(e) = scheduler.pass(Instant::now(), &mut emu, &mut screen, &mut audio) {
            log::error!("session halted: {e} (BACKSPACE to reset, ESC to quit)");
            audio.set_tone(false);
            halted = true;
        }

        for event in screen.poll_events() {
            match event {
                HostEvent::KeyDown(k) => emu.key_down(k),
                HostEvent::KeyUp(k) => emu.key_up(k),
                HostEvent::Reset => {
                    emu.reset();
                    halted = false;
                    audio.set_tone(false);
                    scheduler = Scheduler::new(&config, Instant::now());
                }
            }
        }
    }
    Ok(())
}
