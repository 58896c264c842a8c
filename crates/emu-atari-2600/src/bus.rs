//! System bus: CPU address routing for both hardware modes.
//!
//! **Breadboard** mode is a flat 64K RAM with a few peripheral windows:
//!
//! | Range         | Device          |
//! |---------------|-----------------|
//! | $4000-$47FF   | CRTC video RAM  |
//! | $4800-$4801   | CRTC registers  |
//! | $5000-$5003   | ACIA            |
//! | $6000-$600F   | VIA             |
//!
//! Everything else, ROM included, is writable memory. A full-image test
//! load switches the windows off so the image owns all 64K.
//!
//! **Console** mode decodes the 2600's partial address lines:
//!
//! | Condition                 | Device                      |
//! |---------------------------|-----------------------------|
//! | `a & $1000 == $1000`      | cartridge ROM               |
//! | `a & $1280 == $0080`      | RIOT RAM                    |
//! | `a & $1280 == $0280`      | RIOT I/O and timer          |
//! | `a & $1080 == $0000`      | TIA                         |
//!
//! Undriven data lines float: the console bus keeps the last value seen
//! and returns it for open-bus reads and for TIA bits 5-0.

use atari_tia::Tia;
use emu_core::{Bus, Peripheral};
use mos_riot_6532::Riot6532;

use crate::error::{LoadError, MAX_CARTRIDGE_LEN};
use crate::peripheral::{Unmapped, VideoRam};

const ROM_BASE: usize = 0x8000;
const ROM_SIZE: usize = 0x8000;
const NOP: u8 = 0xEA;

const VRAM_BASE: u16 = 0x4000;
const CRTC_BASE: u16 = 0x4800;
const ACIA_BASE: u16 = 0x5000;
const VIA_BASE: u16 = 0x6000;

/// Which address decoder the bus uses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HardwareMode {
    /// Flat RAM with memory-mapped breadboard peripherals.
    #[default]
    Breadboard,
    /// Atari 2600 partial decoding: cartridge, RIOT and TIA.
    Console,
}

/// The most recent bus cycle, for diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BusAccess {
    pub address: u16,
    pub data: u8,
    /// `true` for a read, `false` for a write.
    pub read: bool,
}

/// Breadboard peripheral windows.
pub struct Devices {
    pub acia: Box<dyn Peripheral>,
    pub via: Box<dyn Peripheral>,
    pub crtc: Box<dyn Peripheral>,
    pub video_ram: Box<dyn Peripheral>,
}

impl Default for Devices {
    fn default() -> Self {
        Self {
            acia: Box::new(Unmapped),
            via: Box::new(Unmapped),
            crtc: Box::new(Unmapped),
            video_ram: Box::new(VideoRam::default()),
        }
    }
}

impl Devices {
    fn reset(&mut self) {
        self.acia.reset();
        self.via.reset();
        self.crtc.reset();
        self.video_ram.reset();
    }
}

/// The system bus, implementing `emu_core::Bus`.
pub struct SystemBus {
    memory: Box<[u8; 0x10000]>,
    mode: HardwareMode,
    /// Full 64K image loaded: peripheral windows are bypassed.
    test_mode: bool,
    pub tia: Tia,
    pub riot: Riot6532,
    pub devices: Devices,
    /// Console data-bus latch.
    latch: u8,
    last: BusAccess,
    /// Instruction cycle of the next write, as reported by the CPU.
    write_cycle: Option<u8>,
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            memory: Box::new([0; 0x10000]),
            mode: HardwareMode::Breadboard,
            test_mode: false,
            tia: Tia::new(),
            riot: Riot6532::new(),
            devices: Devices::default(),
            latch: 0,
            last: BusAccess::default(),
            write_cycle: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> HardwareMode {
        self.mode
    }

    #[must_use]
    pub fn test_mode(&self) -> bool {
        self.test_mode
    }

    /// Load a breadboard ROM into `$8000-$FFFF`.
    ///
    /// Short images are padded with NOPs, long ones are truncated, and the
    /// reset vector is pointed at `$8000`.
    pub fn load_rom(&mut self, image: &[u8]) {
        self.mode = HardwareMode::Breadboard;
        self.test_mode = false;
        self.memory.fill(0);
        let len = image.len().min(ROM_SIZE);
        self.memory[ROM_BASE..ROM_BASE + len].copy_from_slice(&image[..len]);
        self.memory[ROM_BASE + len..].fill(NOP);
        self.memory[0xFFFC] = 0x00;
        self.memory[0xFFFD] = 0x80;
        log::info!("loaded {}-byte breadboard ROM", image.len());
    }

    /// Load a raw 64K memory image with the peripheral windows disabled.
    pub fn load_full_image(&mut self, image: &[u8]) {
        self.mode = HardwareMode::Breadboard;
        self.test_mode = true;
        self.memory.fill(0);
        let len = image.len().min(self.memory.len());
        self.memory[..len].copy_from_slice(&image[..len]);
        log::info!("loaded {}-byte test image", image.len());
    }

    /// Load a 2600 cartridge and switch to console decoding.
    ///
    /// A 2K image is mirrored into both halves of the 4K window; other
    /// sizes are placed at the top of memory.
    pub fn load_cartridge(&mut self, image: &[u8]) -> Result<(), LoadError> {
        if image.is_empty() {
            return Err(LoadError::EmptyImage);
        }
        if image.len() > MAX_CARTRIDGE_LEN {
            log::warn!("rejected {}-byte cartridge", image.len());
            return Err(LoadError::CartridgeTooLarge { len: image.len() });
        }
        self.mode = HardwareMode::Console;
        self.test_mode = false;
        self.riot.reset();
        self.memory.fill(0);
        if image.len() == 2048 {
            self.memory[0xF000..0xF800].copy_from_slice(image);
            self.memory[0xF800..].copy_from_slice(image);
        } else {
            let start = self.memory.len() - image.len();
            self.memory[start..].copy_from_slice(image);
        }
        log::info!("loaded {}-byte cartridge", image.len());
        Ok(())
    }

    /// Reset the chips and breadboard devices. Memory is untouched.
    pub fn reset_devices(&mut self) {
        self.devices.reset();
        self.tia.reset();
        self.riot.reset();
        self.latch = 0;
        self.write_cycle = None;
    }

    /// Read memory without side effects or decoding.
    #[must_use]
    pub fn peek(&self, addr: u16) -> u8 {
        self.memory[usize::from(addr)]
    }

    /// Write memory directly, bypassing decoding.
    pub fn poke(&mut self, addr: u16, value: u8) {
        self.memory[usize::from(addr)] = value;
    }

    #[must_use]
    pub fn last_access(&self) -> BusAccess {
        self.last
    }

    #[must_use]
    pub fn latch(&self) -> u8 {
        self.latch
    }

    fn breadboard_read(&mut self, addr: u16) -> u8 {
        if !self.test_mode {
            match addr {
                ACIA_BASE..=0x5003 => return self.devices.acia.read(addr - ACIA_BASE),
                VIA_BASE..=0x600F => return self.devices.via.read(addr - VIA_BASE),
                CRTC_BASE..=0x4801 => return self.devices.crtc.read(addr - CRTC_BASE),
                VRAM_BASE..=0x47FF => return self.devices.video_ram.read(addr - VRAM_BASE),
                _ => {}
            }
        }
        // C64 raster registers: report the border so wait loops exit.
        match addr {
            0xD011 => 0x9B,
            0xD012 => 0x00,
            _ => self.memory[usize::from(addr)],
        }
    }

    fn breadboard_write(&mut self, addr: u16, value: u8) {
        if !self.test_mode {
            match addr {
                ACIA_BASE..=0x5003 => return self.devices.acia.write(addr - ACIA_BASE, value),
                VIA_BASE..=0x600F => return self.devices.via.write(addr - VIA_BASE, value),
                CRTC_BASE..=0x4801 => return self.devices.crtc.write(addr - CRTC_BASE, value),
                VRAM_BASE..=0x47FF => {
                    return self.devices.video_ram.write(addr - VRAM_BASE, value);
                }
                _ => {}
            }
        }
        self.memory[usize::from(addr)] = value;
    }

    fn console_read(&mut self, addr: u16) -> u8 {
        let data = if addr & 0x1000 == 0x1000 {
            self.memory[0xF000 + usize::from(addr & 0x0FFF)]
        } else if addr & 0x1280 == 0x0080 {
            self.riot.read_ram(addr)
        } else if addr & 0x1280 == 0x0280 {
            self.riot.read_io(addr)
        } else if addr & 0x1080 == 0x0000 {
            (self.latch & 0x3F) | self.tia.read((addr & 0x0F) as u8)
        } else {
            self.latch
        };
        self.latch = data;
        data
    }

    fn console_write(&mut self, addr: u16, value: u8, cycle: Option<u8>) {
        self.latch = value;
        if addr & 0x1080 == 0x0000 {
            // The write lands on colour clock 3*(cycle-1)+2 of the instruction.
            let delay = cycle.map_or(0, |c| u32::from(c.saturating_sub(1)) * 3 + 2);
            self.tia.write_with_delay((addr & 0x3F) as u8, value, delay);
        } else if addr & 0x1280 == 0x0080 {
            self.riot.write_ram(addr, value);
        } else if addr & 0x1280 == 0x0280 {
            self.riot.write_io(addr, value);
        }
    }
}

impl Bus for SystemBus {
    fn read(&mut self, addr: u16) -> u8 {
        let data = match self.mode {
            HardwareMode::Breadboard => self.breadboard_read(addr),
            HardwareMode::Console => self.console_read(addr),
        };
        self.last = BusAccess {
            address: addr,
            data,
            read: true,
        };
        data
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.last = BusAccess {
            address: addr,
            data: value,
            read: false,
        };
        let cycle = self.write_cycle.take();
        match self.mode {
            HardwareMode::Breadboard => self.breadboard_write(addr, value),
            HardwareMode::Console => self.console_write(addr, value, cycle),
        }
    }

    fn store_cycle(&mut self, cycle: u8) {
        self.write_cycle = Some(cycle);
    }
}
