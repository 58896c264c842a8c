//! Audio channel registers and their tone parameters.
//!
//! The TIA has two channels, each with a 4-bit control (waveform), a 5-bit
//! frequency divider and a 4-bit volume. The waveform is approximated as a
//! square tone whose frequency is the base clock divided by the AUDF
//! divider and by the polynomial length of the selected AUDC mode.

/// Effective period divider of each AUDC waveform.
const AUDC_DIVISORS: [u32; 16] = [1, 15, 465, 465, 2, 2, 31, 31, 511, 511, 31, 31, 6, 6, 93, 93];

/// One TIA audio channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioChannel {
    /// AUDC: waveform select, 4 bits.
    pub control: u8,
    /// AUDF: frequency divider, 5 bits.
    pub frequency: u8,
    /// AUDV: volume, 4 bits.
    pub volume: u8,
}

impl AudioChannel {
    pub(crate) fn set_control(&mut self, value: u8) {
        self.control = value & 0x0F;
    }

    pub(crate) fn set_frequency(&mut self, value: u8) {
        self.frequency = value & 0x1F;
    }

    pub(crate) fn set_volume(&mut self, value: u8) {
        self.volume = value & 0x0F;
    }

    /// A channel is silent at zero volume or with AUDC 0 (constant level).
    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.volume == 0 || self.control == 0
    }

    /// Tone frequency in Hz for the given divider base clock.
    #[must_use]
    pub fn tone_hz(&self, base_hz: f64) -> f64 {
        let divisor = AUDC_DIVISORS[usize::from(self.control)];
        base_hz / (f64::from(u32::from(self.frequency) + 1) * f64::from(divisor))
    }

    /// Linear gain in `0.0..=1.0`.
    #[must_use]
    pub fn gain(&self) -> f32 {
        f32::from(self.volume) / 15.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_are_masked() {
        let mut ch = AudioChannel::default();
        ch.set_control(0xFF);
        ch.set_frequency(0xFF);
        ch.set_volume(0xFF);
        assert_eq!((ch.control, ch.frequency, ch.volume), (0x0F, 0x1F, 0x0F));
    }

    #[test]
    fn pure_tone_frequency() {
        let ch = AudioChannel {
            control: 4,
            frequency: 0,
            volume: 8,
        };
        assert!((ch.tone_hz(31_400.0) - 15_700.0).abs() < 1e-9);
    }

    #[test]
    fn divider_scales_frequency() {
        let ch = AudioChannel {
            control: 12,
            frequency: 9,
            volume: 8,
        };
        // 31400 / (10 * 6)
        assert!((ch.tone_hz(31_400.0) - 523.333_333).abs() < 1e-3);
    }

    #[test]
    fn silence_rules() {
        assert!(AudioChannel { control: 0, frequency: 1, volume: 15 }.is_silent());
        assert!(AudioChannel { control: 4, frequency: 1, volume: 0 }.is_silent());
        assert!(!AudioChannel { control: 4, frequency: 1, volume: 1 }.is_silent());
    }

    #[test]
    fn full_volume_is_unity_gain() {
        let ch = AudioChannel {
            control: 4,
            frequency: 0,
            volume: 15,
        };
        assert!((ch.gain() - 1.0).abs() < f32::EPSILON);
    }
}
