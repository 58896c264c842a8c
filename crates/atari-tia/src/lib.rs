//! Atari TIA (Television Interface Adapter).
//!
//! The TIA generates the 2600's video one colour clock at a time and holds
//! the two audio channels' registers. The CPU runs at a third of the colour
//! clock, so the machine steps the TIA three times per CPU cycle.
//!
//! # Timing
//!
//! - 228 colour clocks per line (68 HBLANK + 160 visible), 76 CPU cycles
//! - 262 lines per NTSC frame, 312 per PAL
//! - WSYNC halts the CPU until the start of the next line
//!
//! # Objects
//!
//! Playfield (40 bits across the screen, mirrored or repeated), two
//! players, two missiles and a ball. Positions are set by strobing the
//! RESxx registers and nudged by HMOVE.

mod audio;
mod graphics;
mod palette;
pub mod registers;
mod standard;
mod tia;

pub use audio::AudioChannel;
pub use palette::{BLACK, argb};
pub use standard::TvStandard;
pub use tia::{HBLANK_CLOCKS, HEIGHT, LINE_CLOCKS, Object, Tia, WIDTH};
