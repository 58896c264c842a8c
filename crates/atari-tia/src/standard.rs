//! Television standards.

use emu_core::{MasterClock, Ticks};

use crate::tia::LINE_CLOCKS;

/// Video standard the TIA generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TvStandard {
    #[default]
    Ntsc,
    Pal,
}

impl TvStandard {
    /// Scanlines per frame.
    #[must_use]
    pub fn scanlines_per_frame(self) -> u16 {
        match self {
            Self::Ntsc => 262,
            Self::Pal => 312,
        }
    }

    /// First displayed scanline when the program never toggles VBLANK.
    #[must_use]
    pub fn visible_start(self) -> u16 {
        match self {
            Self::Ntsc => 40,
            Self::Pal => 48,
        }
    }

    /// The colour clock crystal everything else divides down from.
    #[must_use]
    pub fn master_clock(self) -> MasterClock {
        match self {
            Self::Ntsc => MasterClock::new(3_579_545),
            Self::Pal => MasterClock::new(3_546_894),
        }
    }

    /// CPU clock: one third of the colour clock.
    #[must_use]
    pub fn cpu_hz(self) -> u64 {
        self.master_clock().divided(3).frequency_hz
    }

    /// CPU cycles in one frame: 76 per scanline.
    #[must_use]
    pub fn cpu_cycles_per_frame(self) -> Ticks {
        Ticks::new(u64::from(LINE_CLOCKS / 3) * u64::from(self.scanlines_per_frame()))
    }

    /// Base frequency of the audio dividers.
    #[must_use]
    pub fn audio_base_hz(self) -> f64 {
        match self {
            Self::Ntsc => 31_400.0,
            Self::Pal => 31_200.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ntsc_is_default() {
        assert_eq!(TvStandard::default(), TvStandard::Ntsc);
    }

    #[test]
    fn cpu_runs_at_a_third_of_the_colour_clock() {
        assert_eq!(TvStandard::Ntsc.cpu_hz(), 1_193_181);
        assert_eq!(TvStandard::Pal.cpu_hz(), 1_182_298);
    }

    #[test]
    fn frame_budget_is_whole_scanlines() {
        assert_eq!(TvStandard::Ntsc.cpu_cycles_per_frame(), Ticks::new(19_912));
        assert_eq!(TvStandard::Pal.cpu_cycles_per_frame(), Ticks::new(23_712));
    }

    #[test]
    fn frame_geometry() {
        assert_eq!(TvStandard::Ntsc.scanlines_per_frame(), 262);
        assert_eq!(TvStandard::Pal.scanlines_per_frame(), 312);
        assert_eq!(TvStandard::Ntsc.visible_start(), 40);
        assert_eq!(TvStandard::Pal.visible_start(), 48);
    }
}
