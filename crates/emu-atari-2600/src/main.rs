//! Atari 2600 / 6502 breadboard emulator binary.
//!
//! Runs headless: a breadboard ROM or a 2600 cartridge for a number of
//! frames, optionally saving a screenshot and the audio; or a 64K
//! conformance image until it passes, traps or times out.

use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;

use emu_atari_2600::harness::{self, HarnessOptions, Verdict};
use emu_atari_2600::{ColorMode, Difficulty, Machine, MachineConfig, TvStandard, read_image};
#[cfg(feature = "native")]
use emu_atari_2600::{ToneGenerator, capture};
use emu_core::Cpu;

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

enum Image {
    Rom(PathBuf),
    Cartridge(PathBuf),
    TestImage(PathBuf),
}

struct CliArgs {
    image: Option<Image>,
    success_pc: Option<u16>,
    start_pc: Option<u16>,
    threshold: u32,
    max_instructions: u64,
    frames: u32,
    config: MachineConfig,
    #[cfg(feature = "native")]
    screenshot_path: Option<PathBuf>,
    #[cfg(feature = "native")]
    wav_path: Option<PathBuf>,
    verbosity: u8,
}

fn parse_hex(arg: Option<&String>, flag: &str) -> Result<u16, String> {
    let s = arg.ok_or_else(|| format!("{flag} needs an address"))?;
    let digits = s.trim_start_matches('$').trim_start_matches("0x");
    u16::from_str_radix(digits, 16).map_err(|_| format!("Invalid address for {flag}: {s}"))
}

fn parse_number<T: FromStr>(arg: Option<&String>, flag: &str) -> Result<T, String> {
    let s = arg.ok_or_else(|| format!("{flag} needs a value"))?;
    s.parse().map_err(|_| format!("Invalid value for {flag}: {s}"))
}

fn or_exit<T>(parsed: Result<T, String>) -> T {
    parsed.unwrap_or_else(|msg| {
        eprintln!("{msg}");
        process::exit(1);
    })
}

fn print_usage() {
    eprintln!("Usage: emu-atari-2600 [OPTIONS]");
    eprintln!();
    eprintln!("Images:");
    eprintln!("  --rom <file>               Breadboard ROM, loaded at $8000");
    eprintln!("  --cart <file>              Atari 2600 cartridge (2K or 4K)");
    eprintln!("  --test-image <file>        Flat 64K conformance image");
    eprintln!();
    eprintln!("Conformance:");
    eprintln!("  --success <hex>            PC that signals success");
    eprintln!("  --start <hex>              Override the reset vector");
    eprintln!("  --threshold <n>            Unchanged-PC ticks that count as a trap [default: 3]");
    eprintln!("  --max-instructions <n>     Tick budget [default: 100000000]");
    eprintln!();
    eprintln!("Machine:");
    eprintln!("  --frames <n>               Frames to run [default: 60]");
    eprintln!("  --pal                      PAL timing and palette");
    eprintln!("  --mono                     Black-and-white switch");
    eprintln!("  --difficulty-a <0|1>       Set a player's difficulty switch to A");
    eprintln!("  --audio                    Generate audio");
    #[cfg(feature = "native")]
    {
        eprintln!("  --screenshot <file>        Save a PNG screenshot after the run");
        eprintln!("  --wav <file>               Save the audio as WAV (implies --audio)");
    }
    eprintln!();
    eprintln!("  -v, --verbose              More logging (repeatable)");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        image: None,
        success_pc: None,
        start_pc: None,
        threshold: harness::DEFAULT_TRAP_THRESHOLD,
        max_instructions: HarnessOptions::default().max_instructions,
        frames: 60,
        config: MachineConfig::default(),
        #[cfg(feature = "native")]
        screenshot_path: None,
        #[cfg(feature = "native")]
        wav_path: None,
        verbosity: 0,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rom" => {
                i += 1;
                cli.image = args.get(i).map(|p| Image::Rom(PathBuf::from(p)));
            }
            "--cart" => {
                i += 1;
                cli.image = args.get(i).map(|p| Image::Cartridge(PathBuf::from(p)));
            }
            "--test-image" => {
                i += 1;
                cli.image = args.get(i).map(|p| Image::TestImage(PathBuf::from(p)));
            }
            "--success" => {
                i += 1;
                cli.success_pc = Some(or_exit(parse_hex(args.get(i), "--success")));
            }
            "--start" => {
                i += 1;
                cli.start_pc = Some(or_exit(parse_hex(args.get(i), "--start")));
            }
            "--threshold" => {
                i += 1;
                cli.threshold = or_exit(parse_number(args.get(i), "--threshold"));
            }
            "--max-instructions" => {
                i += 1;
                cli.max_instructions = or_exit(parse_number(args.get(i), "--max-instructions"));
            }
            "--frames" => {
                i += 1;
                cli.frames = or_exit(parse_number(args.get(i), "--frames"));
            }
            "--pal" => {
                cli.config.standard = TvStandard::Pal;
            }
            "--mono" => {
                cli.config.color_mode = ColorMode::Monochrome;
            }
            "--difficulty-a" => {
                i += 1;
                match args.get(i).map(String::as_str) {
                    Some("0") => cli.config.difficulty[0] = Difficulty::A,
                    Some("1") => cli.config.difficulty[1] = Difficulty::A,
                    _ => {
                        eprintln!("--difficulty-a takes 0 or 1");
                        process::exit(1);
                    }
                }
            }
            "--audio" => {
                cli.config.audio_enabled = true;
            }
            #[cfg(feature = "native")]
            "--screenshot" => {
                i += 1;
                cli.screenshot_path = args.get(i).map(PathBuf::from);
            }
            #[cfg(feature = "native")]
            "--wav" => {
                i += 1;
                cli.wav_path = args.get(i).map(PathBuf::from);
                cli.config.audio_enabled = true;
            }
            "--verbose" | "-v" => {
                cli.verbosity = cli.verbosity.saturating_add(1);
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

// ---------------------------------------------------------------------------
// Conformance mode
// ---------------------------------------------------------------------------

fn run_test_image(cli: &CliArgs, machine: &mut Machine) {
    if let Some(pc) = cli.start_pc {
        machine.cpu_mut().regs.pc = pc;
    }
    let options = HarnessOptions {
        success_pc: cli.success_pc,
        trap_threshold: cli.threshold,
        max_instructions: cli.max_instructions,
    };
    let abort = AtomicBool::new(false);
    let outcome = harness::run_conformance(machine, &options, &abort);

    let status = match outcome.verdict {
        Verdict::Passed => "PASSED",
        Verdict::Trapped => "TRAPPED",
        Verdict::TimedOut => "TIMED OUT",
        Verdict::Aborted => "ABORTED",
    };
    println!(
        "{status} at ${:04X} after {} instructions ({} cycles)",
        outcome.pc, outcome.ticks, outcome.cycles
    );
    if outcome.verdict != Verdict::Passed {
        process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Frame mode
// ---------------------------------------------------------------------------

fn run_frames(cli: &CliArgs, machine: &mut Machine) {
    let mut audio = Vec::new();
    let mut cycles = 0u64;
    for _ in 0..cli.frames {
        cycles += machine.clock_frame();
        audio.extend(machine.take_audio_buffer());
    }

    let regs = machine.cpu().registers();
    println!(
        "{} frames, {cycles} cycles: PC=${:04X} A=${:02X} X=${:02X} Y=${:02X} S=${:02X} P=${:02X}",
        cli.frames, regs.pc, regs.a, regs.x, regs.y, regs.s, regs.p.0
    );
    if machine.cpu().is_halted() {
        eprintln!("CPU jammed at ${:04X}", regs.pc);
    }

    save_outputs(cli, machine, &audio);
}

#[cfg(feature = "native")]
fn save_outputs(cli: &CliArgs, machine: &Machine, audio: &[f32]) {
    if let Some(ref path) = cli.screenshot_path {
        if let Err(e) = capture::save_screenshot(machine, path) {
            eprintln!("Screenshot error: {e}");
            process::exit(1);
        }
        eprintln!("Screenshot saved to {}", path.display());
    }
    if let Some(ref path) = cli.wav_path {
        if let Err(e) = capture::save_wav(audio, ToneGenerator::SAMPLE_RATE, path) {
            eprintln!("WAV error: {e}");
            process::exit(1);
        }
        eprintln!("Audio saved to {}", path.display());
    }
}

#[cfg(not(feature = "native"))]
fn save_outputs(_cli: &CliArgs, _machine: &Machine, _audio: &[f32]) {}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    let cli = parse_args();
    init_logging(cli.verbosity);

    let Some(image) = &cli.image else {
        eprintln!("No image given. Use --rom, --cart or --test-image.");
        print_usage();
        process::exit(1);
    };

    let path = match image {
        Image::Rom(p) | Image::Cartridge(p) | Image::TestImage(p) => p,
    };
    let data = match read_image(path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", path.display());
            process::exit(1);
        }
    };

    let mut machine = Machine::new(&cli.config);
    match image {
        Image::Rom(_) => {
            machine.load_rom(&data);
            run_frames(&cli, &mut machine);
        }
        Image::Cartridge(_) => {
            if let Err(e) = machine.load_cartridge(&data) {
                eprintln!("Failed to load cartridge: {e}");
                process::exit(1);
            }
            run_frames(&cli, &mut machine);
        }
        Image::TestImage(_) => {
            machine.load_test_image(&data);
            run_test_image(&cli, &mut machine);
        }
    }
}
