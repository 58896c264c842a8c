//! Per-pixel object decoding: playfield, players, missiles, ball.
//!
//! All functions take a visible x coordinate in `0..160` and the raw
//! register values, and answer "is this object drawn here?".

/// Horizontal copy offsets for NUSIZ modes 0-7.
const COPY_OFFSETS: [&[i32]; 8] = [
    &[0],
    &[0, 16],
    &[0, 32],
    &[0, 16, 32],
    &[0, 64],
    &[0],
    &[0, 32, 64],
    &[0],
];

/// Missile position after RESMPx, relative to its player, per NUSIZ mode.
pub(crate) const MISSILE_CENTER: [u8; 8] = [5, 5, 5, 5, 5, 10, 5, 16];

/// Playfield bit at `x`.
///
/// The 20-bit playfield covers the left half at 4 pixels per bit. The right
/// half repeats it, or mirrors it when `ctrlpf` bit 0 is set.
#[must_use]
pub fn playfield(pf0: u8, pf1: u8, pf2: u8, ctrlpf: u8, x: u8) -> bool {
    let bit = if x < 80 || ctrlpf & 0x01 == 0 {
        let q = (x % 80) / 4;
        if q < 4 {
            pf0 >> (4 + q)
        } else if q < 12 {
            pf1 >> (7 - (q - 4))
        } else {
            pf2 >> (q - 12)
        }
    } else {
        let q = (x - 80) / 4;
        if q < 8 {
            pf2 >> (7 - q)
        } else if q < 16 {
            pf1 >> (q - 8)
        } else {
            pf0 >> (7 - (q - 16))
        }
    };
    bit & 1 != 0
}

/// Distance from an object's position to `x`, or `None` when `x` lies in
/// the wrapped region the object cannot reach.
fn distance(x: u8, pos: u8) -> Option<i32> {
    let mut dist = i32::from(x) - i32::from(pos);
    if dist < 0 {
        dist += 160;
        if dist >= 80 {
            return None;
        }
    }
    Some(dist)
}

/// Player bit at `x`, including NUSIZ copies and stretching.
#[must_use]
pub fn player(graphic: u8, pos: u8, nusiz: u8, refp: u8, x: u8) -> bool {
    if graphic == 0 {
        return false;
    }
    let Some(dist) = distance(x, pos) else {
        return false;
    };
    let mode = usize::from(nusiz & 7);
    let size = match mode {
        5 => 2,
        7 => 4,
        _ => 1,
    };
    COPY_OFFSETS[mode].iter().any(|&off| {
        let rel = dist - off;
        if !(0..8 * size).contains(&rel) {
            return false;
        }
        let idx = rel / size;
        let shift = if refp & 0x08 != 0 { idx } else { 7 - idx };
        (graphic >> shift) & 1 != 0
    })
}

/// Missile bit at `x`. Width comes from NUSIZ bits 5-4.
#[must_use]
pub fn missile(enam: u8, pos: u8, nusiz: u8, x: u8) -> bool {
    if enam & 0x02 == 0 {
        return false;
    }
    let Some(dist) = distance(x, pos) else {
        return false;
    };
    let width = 1 << ((nusiz >> 4) & 3);
    COPY_OFFSETS[usize::from(nusiz & 7)]
        .iter()
        .any(|&off| (0..width).contains(&(dist - off)))
}

/// Ball bit at `x`. `enable` is the ENABL value in effect (current or
/// vertically delayed). Width comes from CTRLPF bits 5-4.
#[must_use]
pub fn ball(enable: u8, pos: u8, ctrlpf: u8, x: u8) -> bool {
    if enable & 0x02 == 0 {
        return false;
    }
    let Some(dist) = distance(x, pos) else {
        return false;
    };
    dist < 1 << ((ctrlpf >> 4) & 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pf0_covers_first_sixteen_pixels_in_reverse_bit_order() {
        // PF0 bit 4 is the leftmost playfield bit.
        assert!(playfield(0x10, 0, 0, 0, 0));
        assert!(playfield(0x10, 0, 0, 0, 3));
        assert!(!playfield(0x10, 0, 0, 0, 4));
        assert!(playfield(0x80, 0, 0, 0, 12));
    }

    #[test]
    fn pf1_is_msb_first_and_pf2_lsb_first() {
        assert!(playfield(0, 0x80, 0, 0, 16));
        assert!(playfield(0, 0x01, 0, 0, 44));
        assert!(playfield(0, 0, 0x01, 0, 48));
        assert!(playfield(0, 0, 0x80, 0, 76));
    }

    #[test]
    fn right_half_repeats_without_reflection() {
        for x in 0..80 {
            assert_eq!(
                playfield(0x50, 0xA5, 0x3C, 0, x),
                playfield(0x50, 0xA5, 0x3C, 0, x + 80)
            );
        }
    }

    #[test]
    fn right_half_mirrors_with_reflection() {
        for x in 0..80 {
            assert_eq!(
                playfield(0x50, 0xA5, 0x3C, 1, x),
                playfield(0x50, 0xA5, 0x3C, 1, 159 - x)
            );
        }
    }

    #[test]
    fn player_draws_msb_first_unless_reflected() {
        assert!(player(0x80, 10, 0, 0, 10));
        assert!(!player(0x80, 10, 0, 0, 17));
        assert!(player(0x80, 10, 0, 0x08, 17));
        assert!(!player(0x80, 10, 0, 0x08, 10));
    }

    #[test]
    fn player_copies_follow_nusiz() {
        // Two copies, medium spacing.
        assert!(player(0xFF, 0, 2, 0, 32));
        assert!(!player(0xFF, 0, 2, 0, 16));
        // Three copies, close.
        assert!(player(0xFF, 0, 3, 0, 16));
        assert!(player(0xFF, 0, 3, 0, 39));
        assert!(!player(0xFF, 0, 3, 0, 40));
    }

    #[test]
    fn quad_player_is_32_pixels_wide() {
        assert!(player(0x01, 0, 7, 0, 28));
        assert!(player(0x01, 0, 7, 0, 31));
        assert!(!player(0x01, 0, 7, 0, 27));
        assert!(!player(0x01, 0, 7, 0, 32));
    }

    #[test]
    fn player_wraps_around_the_right_edge() {
        assert!(player(0xFF, 156, 0, 0, 159));
        assert!(player(0xFF, 156, 0, 0, 2));
        assert!(!player(0xFF, 156, 0, 0, 4));
    }

    #[test]
    fn missile_width_and_enable() {
        assert!(!missile(0, 20, 0, 20));
        assert!(missile(2, 20, 0, 20));
        assert!(!missile(2, 20, 0, 21));
        assert!(missile(2, 20, 0x30, 27));
        assert!(!missile(2, 20, 0x30, 28));
    }

    #[test]
    fn ball_width_from_ctrlpf() {
        assert!(ball(2, 100, 0x20, 103));
        assert!(!ball(2, 100, 0x20, 104));
        assert!(!ball(0, 100, 0x20, 100));
    }
}
