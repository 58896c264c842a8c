//! Master clock configuration.

/// Master clock configuration for a system.
///
/// Each system has a master crystal that drives all timing. Components may
/// run at divided rates, but everything derives from this frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterClock {
    /// Crystal frequency in Hz (e.g., `3_579_545` for the NTSC color clock).
    pub frequency_hz: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// A clock running at this frequency divided by `divisor`.
    #[must_use]
    pub const fn divided(&self, divisor: u64) -> Self {
        Self::new(self.frequency_hz / divisor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_clock_is_a_third_of_color_clock() {
        let color = MasterClock::new(3_579_545);
        assert_eq!(color.divided(3).frequency_hz, 1_193_181);
    }
}
