//! Cycle-aware Atari 2600 and 6502 breadboard emulator.
//!
//! The 6502 drives everything. In console mode each CPU cycle advances the
//! TIA by three colour clocks and the RIOT timer by one pulse, and stores
//! to TIA registers land on the colour clock of the instruction's write
//! cycle. In breadboard mode the CPU runs alone against flat RAM with
//! memory-mapped peripherals.
//!
//! One NTSC frame = 76 CPU cycles × 262 lines = 19,912 cycles.

mod audio;
mod bus;
#[cfg(feature = "native")]
pub mod capture;
mod config;
mod error;
pub mod harness;
mod peripheral;
mod system;

pub use audio::ToneGenerator;
pub use bus::{BusAccess, Devices, HardwareMode, SystemBus};
pub use config::{ColorMode, Difficulty, MachineConfig, TvStandard};
pub use error::{LoadError, MAX_CARTRIDGE_LEN};
pub use mos_riot_6532::{Direction, Switch};
pub use peripheral::{Unmapped, VIDEO_RAM_SIZE, VideoRam};
pub use system::{Machine, SCANLINE_CYCLES};

/// Read a ROM, cartridge or test image from disk.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read.
pub fn read_image(path: &std::path::Path) -> Result<Vec<u8>, LoadError> {
    let image = std::fs::read(path)?;
    log::debug!("read {} bytes from {}", image.len(), path.display());
    Ok(image)
}
