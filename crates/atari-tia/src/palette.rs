//! NTSC and PAL colour tables.
//!
//! A colour register holds hue in bits 7-4 and luminance in bits 3-1. Bit 0
//! is ignored, so each standard has 128 entries indexed by `colour >> 1`.

use crate::TvStandard;

/// Opaque black in ARGB.
pub const BLACK: u32 = 0xFF00_0000;

/// NTSC palette, RGB888.
#[rustfmt::skip]
#[allow(clippy::unreadable_literal)]
const NTSC: [u32; 128] = [
    0x000000, 0x2A2A2A, 0x444444, 0x6E6E6E, 0x8C8C8C, 0xAAAAAA, 0xC8C8C8, 0xEAEAEA,
    0x484000, 0x605600, 0x7C7000, 0x9A8B00, 0xB8A700, 0xD8C400, 0xF8E200, 0xFFFF20,
    0x742C00, 0x903800, 0xAE4400, 0xCE5000, 0xF05E00, 0xFF7418, 0xFF8C38, 0xFFA45C,
    0x841600, 0xA01C00, 0xC02200, 0xE02800, 0xFF3000, 0xFF4818, 0xFF6238, 0xFF7E5C,
    0x7C001C, 0x980024, 0xB6002C, 0xD60034, 0xF8003C, 0xFF2854, 0xFF4874, 0xFF6A94,
    0x68004C, 0x820060, 0x9E0076, 0xBC008C, 0xDC00A4, 0xFC0AB8, 0xFF3AD0, 0xFF5EE4,
    0x4C0070, 0x62008E, 0x7A00AC, 0x9400CA, 0xB000EA, 0xCC04FF, 0xE23EFF, 0xF46EFF,
    0x280080, 0x3A009C, 0x4E00B8, 0x6200D6, 0x7800F4, 0x8E16FF, 0xAA48FF, 0xC272FF,
    0x000074, 0x000092, 0x0000B0, 0x0000CE, 0x0000EE, 0x1418FF, 0x4248FF, 0x6E72FF,
    0x001064, 0x001A80, 0x00249E, 0x0030BC, 0x003CDC, 0x124EFE, 0x4672FF, 0x7094FF,
    0x002E40, 0x004056, 0x005472, 0x006A8E, 0x0082AC, 0x009CCC, 0x22B4E6, 0x56CCFC,
    0x004010, 0x005416, 0x006A1C, 0x008222, 0x009A28, 0x00B430, 0x2EC84A, 0x5EDC74,
    0x003C00, 0x005000, 0x006600, 0x007C00, 0x009400, 0x00AC00, 0x28C220, 0x58D654,
    0x143400, 0x1C4400, 0x265600, 0x306A00, 0x3C7E00, 0x489400, 0x64AA1E, 0x84C042,
    0x302800, 0x403600, 0x524600, 0x665600, 0x7A6800, 0x907A00, 0xAE9216, 0xCCAA3A,
    0x482000, 0x602C00, 0x783800, 0x924400, 0xAE5200, 0xCA6000, 0xE67818, 0xFF9238,
];

/// PAL palette, RGB888.
#[rustfmt::skip]
#[allow(clippy::unreadable_literal)]
const PAL: [u32; 128] = [
    0x000000, 0x404040, 0x6C6C6C, 0x909090, 0xB0B0B0, 0xC8C8C8, 0xDCDCDC, 0xF4F4F4,
    0x004444, 0x106464, 0x248484, 0x34A0A0, 0x40B8B8, 0x50D0D0, 0x5CE8E8, 0x68FCFC,
    0x002870, 0x144484, 0x285C98, 0x3C78AC, 0x4C8CBC, 0x5CA0CC, 0x68B4DC, 0x78C8EC,
    0x001884, 0x183498, 0x3050AC, 0x4868C0, 0x5C80D0, 0x7094E0, 0x80A8EC, 0x94BCFC,
    0x000088, 0x20209C, 0x3C3CB0, 0x5858C0, 0x7070D0, 0x8888E0, 0xA0A0EC, 0xB4B4FC,
    0x5C0078, 0x74208C, 0x883CA0, 0x9C58B0, 0xB070C0, 0xC084D0, 0xD09CDC, 0xE0B0EC,
    0x780048, 0x902060, 0xA43C78, 0xB8588C, 0xCC70A0, 0xDC84B4, 0xEC9CC4, 0xFCB0D4,
    0x840014, 0x982030, 0xAC3C4C, 0xC05868, 0xD0707C, 0xE08894, 0xECA0A8, 0xFCB4BC,
    0x880000, 0x9C201C, 0xB04038, 0xC05C50, 0xD07468, 0xE08C7C, 0xECA490, 0xFCB8A4,
    0x7C1800, 0x90381C, 0xA85438, 0xBC7050, 0xCC8868, 0xDC9C7C, 0xECB490, 0xFCC8A4,
    0x5C2C00, 0x784C1C, 0x906838, 0xAC8450, 0xC09C68, 0xD4B47C, 0xE8CC90, 0xFCE0A4,
    0x2C3C00, 0x485C1C, 0x647C38, 0x809C50, 0x94B468, 0xACD07C, 0xC0E490, 0xD4FCA4,
    0x003C00, 0x205C20, 0x407C40, 0x5C9C5C, 0x74B474, 0x8CD08C, 0xA4E4A4, 0xB8FCB8,
    0x003814, 0x1C5C34, 0x387C50, 0x50986C, 0x68B484, 0x7CCC9C, 0x90E4B4, 0xA4FCC8,
    0x00302C, 0x1C504C, 0x347068, 0x4C8C84, 0x64A89C, 0x78C0B4, 0x88D4CC, 0x9CECE0,
    0x002844, 0x184864, 0x306884, 0x4484A0, 0x589CB8, 0x6CB4D0, 0x7CCCE8, 0x8CE0FC,
];

/// Resolve a colour register value to an ARGB pixel.
#[must_use]
pub fn argb(standard: TvStandard, colour: u8, monochrome: bool) -> u32 {
    let table = match standard {
        TvStandard::Ntsc => &NTSC,
        TvStandard::Pal => &PAL,
    };
    let rgb = table[usize::from((colour >> 1) & 0x7F)];
    if monochrome {
        BLACK | grey(rgb)
    } else {
        BLACK | rgb
    }
}

/// Rec. 601 luma of an RGB888 value, replicated into all three channels.
fn grey(rgb: u32) -> u32 {
    let r = (rgb >> 16) & 0xFF;
    let g = (rgb >> 8) & 0xFF;
    let b = rgb & 0xFF;
    let y = (r * 299 + g * 587 + b * 114) / 1000;
    (y << 16) | (y << 8) | y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_is_opaque_in_both_standards() {
        assert_eq!(argb(TvStandard::Ntsc, 0x00, false), BLACK);
        assert_eq!(argb(TvStandard::Pal, 0x00, false), BLACK);
    }

    #[test]
    fn bit_zero_is_ignored() {
        assert_eq!(
            argb(TvStandard::Ntsc, 0x1E, false),
            argb(TvStandard::Ntsc, 0x1F, false)
        );
    }

    #[test]
    fn standards_use_different_tables() {
        assert_eq!(argb(TvStandard::Ntsc, 0x1E, false), 0xFFFF_FF20);
        assert_eq!(argb(TvStandard::Pal, 0x1E, false), 0xFF68_FCFC);
    }

    #[test]
    fn monochrome_output_is_grey() {
        let px = argb(TvStandard::Ntsc, 0x44, true);
        let r = (px >> 16) & 0xFF;
        let g = (px >> 8) & 0xFF;
        let b = px & 0xFF;
        assert_eq!(px & 0xFF00_0000, BLACK);
        assert!(r == g && g == b);
        assert_ne!(r, 0);
    }

    #[test]
    fn white_stays_white_in_monochrome() {
        assert_eq!(argb(TvStandard::Pal, 0x0E, true), argb(TvStandard::Pal, 0x0E, false));
    }
}
