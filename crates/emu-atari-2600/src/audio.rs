//! Square-wave rendering of the TIA's two audio channels.
//!
//! Each channel is reduced to a square tone at the frequency its AUDC/AUDF
//! pair selects, scaled by AUDV. The mix is produced once per CPU cycle and
//! box-filtered down to 48 kHz mono.

#![allow(clippy::cast_precision_loss)]

use atari_tia::{AudioChannel, TvStandard};

/// Mono output at 48 kHz.
pub struct ToneGenerator {
    /// Phase of each channel's square wave, in cycles (`0.0..1.0`).
    phase: [f64; 2],
    cpu_hz: f64,
    base_hz: f64,

    // Downsampling
    accumulator: f32,
    sample_count: u32,
    ticks_per_sample: f32,
    buffer: Vec<f32>,
}

impl ToneGenerator {
    /// Output sample rate.
    pub const SAMPLE_RATE: u32 = 48_000;

    #[must_use]
    pub fn new(standard: TvStandard) -> Self {
        let mut tone = Self {
            phase: [0.0; 2],
            cpu_hz: 0.0,
            base_hz: 0.0,
            accumulator: 0.0,
            sample_count: 0,
            ticks_per_sample: 0.0,
            buffer: Vec::with_capacity(Self::SAMPLE_RATE as usize / 50 + 1),
        };
        tone.set_standard(standard);
        tone
    }

    /// Retune for the CPU clock and audio base clock of `standard`.
    pub fn set_standard(&mut self, standard: TvStandard) {
        self.cpu_hz = standard.cpu_hz() as f64;
        self.base_hz = standard.audio_base_hz();
        self.ticks_per_sample = standard.cpu_hz() as f32 / Self::SAMPLE_RATE as f32;
    }

    /// Drop buffered samples and restart both waveforms.
    pub fn reset(&mut self) {
        self.phase = [0.0; 2];
        self.accumulator = 0.0;
        self.sample_count = 0;
        self.buffer.clear();
    }

    /// Advance one CPU cycle with the current register state.
    pub fn tick(&mut self, channels: &[AudioChannel; 2]) {
        let mut mix = 0.0;
        for (phase, channel) in self.phase.iter_mut().zip(channels) {
            if channel.is_silent() {
                continue;
            }
            *phase = (*phase + channel.tone_hz(self.base_hz) / self.cpu_hz).fract();
            let gain = channel.gain();
            mix += if *phase < 0.5 { gain } else { -gain };
        }

        self.accumulator += mix * 0.5;
        self.sample_count += 1;
        if self.sample_count as f32 >= self.ticks_per_sample {
            self.buffer.push(self.accumulator / self.sample_count as f32);
            self.accumulator = 0.0;
            self.sample_count = 0;
        }
    }

    /// Drain the output buffer: mono f32 samples in `-1.0..=1.0`.
    pub fn take_buffer(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.buffer)
    }

    #[must_use]
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TONE: AudioChannel = AudioChannel {
        control: 4,
        frequency: 31,
        volume: 15,
    };

    fn run(tone: &mut ToneGenerator, channels: &[AudioChannel; 2], cycles: u32) {
        for _ in 0..cycles {
            tone.tick(channels);
        }
    }

    #[test]
    fn one_second_is_about_48k_samples() {
        let mut tone = ToneGenerator::new(TvStandard::Ntsc);
        run(&mut tone, &[AudioChannel::default(); 2], 1_193_181);
        let len = tone.buffer_len();
        assert!((47_000..=48_100).contains(&len), "{len} samples");
    }

    #[test]
    fn silent_channels_produce_zeros() {
        let mut tone = ToneGenerator::new(TvStandard::Ntsc);
        run(&mut tone, &[AudioChannel::default(); 2], 10_000);
        assert!(tone.take_buffer().iter().all(|&s| s.abs() < f32::EPSILON));
    }

    #[test]
    fn active_tone_swings_both_ways() {
        let mut tone = ToneGenerator::new(TvStandard::Ntsc);
        run(&mut tone, &[TONE, AudioChannel::default()], 20_000);
        let samples = tone.take_buffer();
        assert!(samples.iter().any(|&s| s > 0.4));
        assert!(samples.iter().any(|&s| s < -0.4));
        assert!(samples.iter().all(|&s| (-1.0..=1.0).contains(&s)));
    }

    #[test]
    fn take_buffer_drains() {
        let mut tone = ToneGenerator::new(TvStandard::Pal);
        run(&mut tone, &[TONE; 2], 1_000);
        assert!(!tone.take_buffer().is_empty());
        assert_eq!(tone.buffer_len(), 0);
    }

    #[test]
    fn reset_clears_pending_samples() {
        let mut tone = ToneGenerator::new(TvStandard::Ntsc);
        run(&mut tone, &[TONE; 2], 1_000);
        tone.reset();
        assert_eq!(tone.buffer_len(), 0);
    }
}
