//! Headless capture: PNG screenshots and WAV audio.

use std::error::Error;
use std::fs;
use std::io::BufWriter;
use std::path::Path;

use crate::Machine;

/// Save the current framebuffer as a PNG file.
///
/// The framebuffer is ARGB32; the encoder gets RGBA bytes.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_screenshot(machine: &Machine, path: &Path) -> Result<(), Box<dyn Error>> {
    let width = machine.framebuffer_width();
    let height = machine.framebuffer_height();

    let file = fs::File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&to_rgba(machine.framebuffer()))?;
    Ok(())
}

fn to_rgba(framebuffer: &[u32]) -> Vec<u8> {
    framebuffer
        .iter()
        .flat_map(|&pixel| {
            let [_, r, g, b] = pixel.to_be_bytes();
            [r, g, b, 0xFF]
        })
        .collect()
}

/// Write mono f32 samples as a 16-bit PCM WAV file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_wav(samples: &[f32], sample_rate: u32, path: &Path) -> Result<(), Box<dyn Error>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        let scaled = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer.write_sample(scaled)?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_becomes_opaque_rgba() {
        assert_eq!(
            to_rgba(&[0xFF12_3456, 0x00AB_CDEF]),
            vec![0x12, 0x34, 0x56, 0xFF, 0xAB, 0xCD, 0xEF, 0xFF]
        );
    }

    #[test]
    fn wav_round_trip_header() {
        let path = std::env::temp_dir().join(format!("tone-{}.wav", std::process::id()));
        save_wav(&[0.0, 1.0, -1.0, 2.0], 48_000, &path).unwrap();
        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!((spec.channels, spec.sample_rate, spec.bits_per_sample), (1, 48_000, 16));
        let samples: Vec<i16> = reader.into_samples().map(Result::unwrap).collect();
        assert_eq!(samples, vec![0, i16::MAX, -i16::MAX, i16::MAX]);
        fs::remove_file(&path).unwrap();
    }
}
