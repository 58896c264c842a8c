//! Machine configuration.

pub use atari_tia::TvStandard;

/// Position of the colour/black-and-white console switch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Color,
    Monochrome,
}

/// Position of a difficulty switch. B is the novice setting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    A,
    #[default]
    B,
}

/// Machine configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Video standard. Defaults to NTSC.
    pub standard: TvStandard,
    /// Colour switch and TIA output mode.
    pub color_mode: ColorMode,
    /// Left and right difficulty switches.
    pub difficulty: [Difficulty; 2],
    /// Generate audio samples while clocking.
    pub audio_enabled: bool,
}
