//! Default breadboard devices.
//!
//! The breadboard bus forwards its ACIA, VIA and CRTC windows to
//! [`Peripheral`] objects. Until a real device is attached, the register
//! windows read as zero and the CRTC video RAM window is plain RAM.

use emu_core::Peripheral;

/// A register window with nothing behind it.
#[derive(Debug, Default)]
pub struct Unmapped;

impl Peripheral for Unmapped {
    fn read(&mut self, _offset: u16) -> u8 {
        0
    }

    fn write(&mut self, _offset: u16, _value: u8) {}
}

/// Size of the CRTC video RAM window.
pub const VIDEO_RAM_SIZE: usize = 0x800;

/// 2K of video RAM behind the CRTC window at `$4000`.
pub struct VideoRam {
    data: Box<[u8; VIDEO_RAM_SIZE]>,
}

impl Default for VideoRam {
    fn default() -> Self {
        Self {
            data: Box::new([0; VIDEO_RAM_SIZE]),
        }
    }
}

impl VideoRam {
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        self.data.as_slice()
    }
}

impl Peripheral for VideoRam {
    fn read(&mut self, offset: u16) -> u8 {
        self.data[usize::from(offset) % VIDEO_RAM_SIZE]
    }

    fn write(&mut self, offset: u16, value: u8) {
        self.data[usize::from(offset) % VIDEO_RAM_SIZE] = value;
    }

    fn reset(&mut self) {
        self.data.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_reads_zero() {
        let mut dev = Unmapped;
        dev.write(0, 0xFF);
        assert_eq!(dev.read(0), 0);
    }

    #[test]
    fn video_ram_stores_and_resets() {
        let mut vram = VideoRam::default();
        vram.write(0x7FF, 0x41);
        assert_eq!(vram.read(0x7FF), 0x41);
        assert_eq!(vram.contents()[0x7FF], 0x41);
        vram.reset();
        assert_eq!(vram.read(0x7FF), 0);
    }
}
