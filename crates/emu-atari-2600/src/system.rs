//! Top-level machine.
//!
//! The CPU is the timing master. In console mode every CPU cycle is three
//! TIA colour clocks and one RIOT timer pulse:
//! - CPU: colour clock / 3 = 1,193,182 Hz (NTSC)
//! - TIA: 3,579,545 Hz, 228 clocks per line
//! - RIOT: CPU rate
//!
//! One line = 76 CPU cycles. One NTSC frame = 76 × 262 = 19,912 cycles.
//!
//! A write to WSYNC halts the CPU until the TIA reaches the end of the
//! line. While halted, each `clock()` advances the TIA by up to three
//! colour clocks and counts one cycle, so the stall is visible to callers
//! in the same units as instructions.

use emu_core::{Cpu, Observable, Tickable, Ticks, Value};
use mos_6502::Mos6502;
use mos_riot_6532::{Direction, Switch};

use crate::audio::ToneGenerator;
use crate::bus::{HardwareMode, SystemBus};
use crate::config::{ColorMode, Difficulty, MachineConfig};
use crate::error::LoadError;

/// CPU cycles per scanline.
pub const SCANLINE_CYCLES: u32 = 76;

/// Colour clocks per CPU cycle.
const TIA_RATIO: u64 = 3;

/// CPU, bus and chips, wired together.
pub struct Machine {
    cpu: Mos6502,
    bus: SystemBus,
    config: MachineConfig,
    tone: ToneGenerator,
    /// CPU cycles (and WSYNC stall cycles) since reset.
    cycles: u64,
}

impl Machine {
    /// A machine in breadboard mode with empty memory.
    #[must_use]
    pub fn new(config: &MachineConfig) -> Self {
        let mut machine = Self {
            cpu: Mos6502::new(),
            bus: SystemBus::new(),
            config: *config,
            tone: ToneGenerator::new(config.standard),
            cycles: 0,
        };
        machine.apply_config(config);
        machine
    }

    /// Load a breadboard ROM at `$8000` and reset.
    pub fn load_rom(&mut self, image: &[u8]) {
        self.bus.load_rom(image);
        self.reset();
    }

    /// Load a flat 64K image with peripherals bypassed, and reset.
    pub fn load_test_image(&mut self, image: &[u8]) {
        self.bus.load_full_image(image);
        self.reset();
    }

    /// Load a 2600 cartridge and reset into console mode.
    ///
    /// # Errors
    ///
    /// Rejects empty images and images over 4K. The machine is unchanged
    /// on error.
    pub fn load_cartridge(&mut self, image: &[u8]) -> Result<(), LoadError> {
        self.bus.load_cartridge(image)?;
        self.reset();
        Ok(())
    }

    /// Reset the chips, then the CPU, so the reset vector is read from the
    /// loaded image.
    pub fn reset(&mut self) {
        self.bus.reset_devices();
        let config = self.config;
        self.apply_config(&config);
        self.tone.reset();
        self.cpu.reset(&mut self.bus);
        self.cycles = 0;
    }

    /// Push the video standard, colour mode and difficulty switches into
    /// the chips.
    pub fn apply_config(&mut self, config: &MachineConfig) {
        self.config = *config;
        let monochrome = config.color_mode == ColorMode::Monochrome;
        self.bus.tia.set_standard(config.standard);
        self.bus.tia.set_monochrome(monochrome);
        self.bus.riot.set_switch(Switch::Color, !monochrome);
        self.bus
            .riot
            .set_switch(Switch::Difficulty0, config.difficulty[0] == Difficulty::A);
        self.bus
            .riot
            .set_switch(Switch::Difficulty1, config.difficulty[1] == Difficulty::A);
        self.tone.set_standard(config.standard);
    }

    /// Run one instruction, or one cycle of a WSYNC stall.
    ///
    /// Returns the CPU cycles consumed.
    pub fn clock(&mut self) -> u32 {
        let cycles = match self.bus.mode() {
            HardwareMode::Breadboard => self.cpu.execute(&mut self.bus),
            HardwareMode::Console => self.clock_console(),
        };
        self.cycles += u64::from(cycles);
        if self.config.audio_enabled {
            let channels = *self.bus.tia.audio_channels();
            for _ in 0..cycles {
                self.tone.tick(&channels);
            }
        }
        cycles
    }

    fn clock_console(&mut self) -> u32 {
        if self.bus.tia.wsync() {
            for _ in 0..TIA_RATIO {
                if self.bus.tia.step() {
                    break;
                }
            }
            self.bus.riot.clock_pulse();
            return 1;
        }

        let cycles = self.cpu.execute(&mut self.bus);
        self.bus.tia.tick_n(Ticks::from(cycles).scaled(TIA_RATIO));
        self.bus.riot.tick_n(Ticks::from(cycles));
        cycles
    }

    /// Clock until at least one scanline's worth of cycles has elapsed.
    pub fn clock_scanline(&mut self) -> u32 {
        let mut elapsed = 0;
        while elapsed < SCANLINE_CYCLES {
            elapsed += self.clock();
        }
        elapsed
    }

    /// Clock one frame's worth of scanlines for the current standard.
    pub fn clock_frame(&mut self) -> u64 {
        let lines = self.bus.tia.standard().scanlines_per_frame();
        (0..lines).map(|_| u64::from(self.clock_scanline())).sum()
    }

    /// Press or release a joystick direction.
    pub fn set_joystick(&mut self, player: usize, direction: Direction, pressed: bool) {
        self.bus.riot.set_joystick(player, direction, pressed);
    }

    pub fn set_fire_button(&mut self, player: usize, pressed: bool) {
        self.bus.tia.set_fire_button(player, pressed);
    }

    /// Set a console switch. See [`Switch`] for what `on` means.
    pub fn set_console_switch(&mut self, switch: Switch, on: bool) {
        self.bus.riot.set_switch(switch, on);
    }

    /// Drain generated audio: mono f32 at 48 kHz.
    pub fn take_audio_buffer(&mut self) -> Vec<f32> {
        self.tone.take_buffer()
    }

    #[must_use]
    pub fn audio_buffer_len(&self) -> usize {
        self.tone.buffer_len()
    }

    /// The TIA framebuffer (ARGB32, 160x192).
    #[must_use]
    pub fn framebuffer(&self) -> &[u32] {
        self.bus.tia.framebuffer()
    }

    #[must_use]
    pub fn framebuffer_width(&self) -> u32 {
        atari_tia::WIDTH as u32
    }

    #[must_use]
    pub fn framebuffer_height(&self) -> u32 {
        atari_tia::HEIGHT as u32
    }

    /// Frames completed by the TIA since power-on.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.bus.tia.frame_count()
    }

    #[must_use]
    pub fn cpu(&self) -> &Mos6502 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Mos6502 {
        &mut self.cpu
    }

    #[must_use]
    pub fn bus(&self) -> &SystemBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut SystemBus {
        &mut self.bus
    }

    #[must_use]
    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }

    /// Cycles since reset.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    #[must_use]
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }
}

impl Observable for Machine {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("tia.") {
            self.bus.tia.query(rest)
        } else if let Some(rest) = path.strip_prefix("riot.") {
            self.bus.riot.query(rest)
        } else if let Some(rest) = path.strip_prefix("bus.") {
            let last = self.bus.last_access();
            match rest {
                "address" => Some(last.address.into()),
                "data" => Some(last.data.into()),
                "read" => Some(last.read.into()),
                "latch" => Some(self.bus.latch().into()),
                "mode" => Some(
                    match self.bus.mode() {
                        HardwareMode::Breadboard => "breadboard",
                        HardwareMode::Console => "console",
                    }
                    .into(),
                ),
                _ => None,
            }
        } else {
            match path {
                "cycles" => Some(self.cycles.into()),
                _ => None,
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<6502_paths>",
            "tia.<tia_paths>",
            "riot.<riot_paths>",
            "bus.address",
            "bus.data",
            "bus.read",
            "bus.latch",
            "bus.mode",
            "cycles",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console(program: &[u8]) -> Machine {
        let mut image = vec![0xEA; 4096];
        image[..program.len()].copy_from_slice(program);
        image[0xFFC] = 0x00;
        image[0xFFD] = 0xF0;
        let mut machine = Machine::new(&MachineConfig::default());
        machine.load_cartridge(&image).unwrap();
        machine
    }

    #[test]
    fn reset_reads_vector_from_loaded_image() {
        let machine = console(&[]);
        assert_eq!(machine.pc(), 0xF000);
        assert_eq!(machine.cycles(), 0);
    }

    #[test]
    fn console_cycle_drives_three_colour_clocks() {
        let mut machine = console(&[]);
        assert_eq!(machine.clock(), 2);
        assert_eq!(machine.bus().tia.hclock(), 6);
        assert_eq!(machine.cycles(), 2);
    }

    #[test]
    fn riot_timer_follows_cpu_cycles() {
        // LDA #10 ; STA TIM1T ; NOPs
        let mut machine = console(&[0xA9, 0x0A, 0x8D, 0x94, 0x02]);
        machine.clock();
        machine.clock();
        let after_store = machine.bus().riot.intim();
        machine.clock();
        assert_eq!(machine.bus().riot.intim(), after_store - 2);
    }

    #[test]
    fn breadboard_clock_runs_cpu_only() {
        let mut machine = Machine::new(&MachineConfig::default());
        machine.load_rom(&[0xEA]);
        assert_eq!(machine.pc(), 0x8000);
        assert_eq!(machine.clock(), 2);
        assert_eq!(machine.bus().tia.hclock(), 0);
    }

    #[test]
    fn wsync_stall_counts_one_cycle_per_clock() {
        // STA WSYNC
        let mut machine = console(&[0x85, 0x02]);
        assert_eq!(machine.clock(), 3);
        assert!(machine.bus().tia.wsync());
        let pc = machine.pc();
        assert_eq!(machine.clock(), 1);
        assert_eq!(machine.pc(), pc);
        assert_eq!(machine.bus().tia.hclock(), 12);
    }

    #[test]
    fn config_reaches_the_chips() {
        let config = MachineConfig {
            color_mode: ColorMode::Monochrome,
            difficulty: [Difficulty::A, Difficulty::B],
            ..MachineConfig::default()
        };
        let machine = Machine::new(&config);
        assert!(machine.bus().tia.monochrome());
        assert_eq!(machine.bus().riot.swchb() & 0xC8, 0x40);
    }

    #[test]
    fn switches_survive_reset() {
        let config = MachineConfig {
            difficulty: [Difficulty::B, Difficulty::A],
            ..MachineConfig::default()
        };
        let mut machine = Machine::new(&config);
        machine.load_cartridge(&[0xEA; 4096]).unwrap();
        assert_eq!(machine.bus().riot.swchb() & 0x80, 0x80);
    }

    #[test]
    fn inputs_reach_riot_and_tia() {
        let mut machine = console(&[]);
        machine.set_joystick(0, Direction::Up, true);
        assert_eq!(machine.bus().riot.swcha(), 0xEF);
        machine.set_console_switch(Switch::Select, true);
        assert_eq!(machine.bus().riot.swchb() & 0x02, 0);
        machine.set_fire_button(1, true);
        assert_eq!(machine.bus().tia.read(0x0D), 0x00);
    }

    #[test]
    fn audio_only_when_enabled() {
        let mut machine = console(&[0x4C, 0x00, 0xF0]);
        machine.clock_frame();
        assert_eq!(machine.audio_buffer_len(), 0);

        let config = MachineConfig {
            audio_enabled: true,
            ..MachineConfig::default()
        };
        machine.apply_config(&config);
        machine.clock_frame();
        assert!(machine.take_audio_buffer().len() > 700);
    }

    #[test]
    fn observable_paths() {
        let mut machine = console(&[0xA9, 0x42]);
        machine.clock();
        assert_eq!(machine.query("cpu.a"), Some(Value::U8(0x42)));
        assert_eq!(machine.query("tia.hclock"), Some(Value::U16(6)));
        assert_eq!(machine.query("riot.swchb"), Some(Value::U8(0x0B)));
        assert_eq!(machine.query("bus.mode"), Some(Value::String("console".into())));
        assert_eq!(machine.query("cycles"), Some(Value::U64(2)));
        assert_eq!(machine.query("nope"), None);
    }
}
