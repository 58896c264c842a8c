//! Beam timing, object positioning and collision behaviour, driven through
//! the public register interface one colour clock at a time.

use atari_tia::registers::{
    COLUBK, COLUP0, COLUP1, COLUPF, CTRLPF, CXCLR, CXP0FB, CXP1FB, CXPPMM, GRP0, GRP1, HMOVE,
    PF0, PF1, PF2, RESP0, RESP1, VBLANK, VSYNC, WSYNC,
};
use atari_tia::{BLACK, LINE_CLOCKS, Object, Tia, TvStandard, WIDTH, argb};

fn run_to(tia: &mut Tia, hclock: u16) {
    while tia.hclock() != hclock {
        tia.step();
    }
}

fn finish_line(tia: &mut Tia) {
    tia.step();
    run_to(tia, 0);
}

/// Make the current scanline the first visible row by toggling VBLANK.
fn open_window(tia: &mut Tia) {
    tia.write(VBLANK, 0x02);
    tia.step();
    tia.write(VBLANK, 0x00);
}

fn pixel(tia: &Tia, x: usize, y: usize) -> u32 {
    tia.framebuffer()[y * WIDTH + x]
}

#[test]
fn wsync_holds_until_the_line_wraps() {
    let mut tia = Tia::new();
    run_to(&mut tia, 10);
    tia.write(WSYNC, 0);
    assert!(tia.wsync());

    let mut held = 0;
    while !tia.step() {
        held += 1;
    }
    // Clocks 10..=226 report the hold; the clock at 227 wraps and releases.
    assert_eq!(held, 217);
    assert_eq!(tia.hclock(), 0);
    assert_eq!(tia.scanline(), 1);
    assert!(!tia.wsync());
}

#[test]
fn resp0_during_hblank_lands_at_the_left_edge() {
    let mut tia = Tia::new();
    run_to(&mut tia, 30);
    tia.write(RESP0, 0);
    assert_eq!(tia.position(Object::Player0), 0);

    run_to(&mut tia, 65);
    tia.write(RESP0, 0);
    assert!(tia.position(Object::Player0) < 8);
    assert_eq!(tia.position(Object::Player0), 2);
}

#[test]
fn strobes_in_the_visible_region_track_the_beam() {
    let mut tia = Tia::new();
    run_to(&mut tia, 100);
    tia.write(RESP1, 0);
    assert_eq!(tia.position(Object::Player1), 37);

    run_to(&mut tia, 227);
    tia.write(RESP0, 0);
    assert_eq!(tia.position(Object::Player0), 4);
}

#[test]
fn delayed_strobe_uses_the_landing_clock() {
    let mut tia = Tia::new();
    run_to(&mut tia, 100);
    tia.write_with_delay(RESP0, 0, 8);
    for _ in 0..8 {
        tia.step();
    }
    // Applied during the step at hclock 107.
    assert_eq!(tia.position(Object::Player0), 107 - 68 + 5);
}

#[test]
fn hmove_in_hblank_blanks_the_first_eight_pixels_of_that_line_only() {
    let mut tia = Tia::new();
    tia.write(COLUBK, 0x0E);
    open_window(&mut tia);
    run_to(&mut tia, 10);
    tia.write(HMOVE, 0);
    assert!(tia.hmove_blank());
    finish_line(&mut tia);
    assert!(!tia.hmove_blank());

    let lit = argb(TvStandard::Ntsc, 0x0E, false);
    for x in 0..8 {
        assert_eq!(pixel(&tia, x, 0), BLACK, "pixel {x}");
    }
    assert_eq!(pixel(&tia, 8, 0), lit);

    finish_line(&mut tia);
    assert_eq!(pixel(&tia, 0, 1), lit);
}

#[test]
fn hmove_outside_hblank_does_not_blank() {
    let mut tia = Tia::new();
    tia.write(COLUBK, 0x0E);
    open_window(&mut tia);
    run_to(&mut tia, 100);
    tia.write(HMOVE, 0);
    assert!(!tia.hmove_blank());
    finish_line(&mut tia);
    finish_line(&mut tia);
    assert_eq!(pixel(&tia, 0, 1), argb(TvStandard::Ntsc, 0x0E, false));
}

#[test]
fn delayed_hmove_landing_in_hblank_arms_the_blank() {
    let mut tia = Tia::new();
    run_to(&mut tia, 60);
    tia.write_with_delay(HMOVE, 0, 6);
    assert!(tia.hmove_blank());

    let mut tia = Tia::new();
    run_to(&mut tia, 64);
    tia.write_with_delay(HMOVE, 0, 6);
    assert!(!tia.hmove_blank());
}

#[test]
fn player_playfield_collision_latches_until_cxclr() {
    let mut tia = Tia::new();
    tia.write(PF0, 0xF0);
    tia.write(GRP0, 0xFF);
    tia.write(GRP1, 0xFF);
    // Position both players on a blanked line, then draw the next one.
    tia.write(VBLANK, 0x02);
    run_to(&mut tia, 30);
    tia.write(RESP0, 0);
    run_to(&mut tia, 163);
    tia.write(RESP1, 0);
    assert_eq!(tia.position(Object::Player1), 100);
    finish_line(&mut tia);
    open_window(&mut tia);
    finish_line(&mut tia);

    assert_eq!(tia.read(CXP0FB) & 0x80, 0x80);
    assert_eq!(tia.read(CXP0FB) & 0x40, 0);
    assert_eq!(tia.read(CXP1FB), 0);
    assert_eq!(tia.read(CXPPMM), 0);

    tia.write(CXCLR, 0);
    assert_eq!(tia.collisions(), [0; 8]);
}

#[test]
fn overlapping_players_set_ppmm() {
    let mut tia = Tia::new();
    tia.write(GRP0, 0x80);
    tia.write(GRP1, 0x80);
    open_window(&mut tia);
    run_to(&mut tia, 100);
    tia.write(RESP0, 0);
    tia.write(RESP1, 0);
    finish_line(&mut tia);
    finish_line(&mut tia);
    assert_eq!(tia.read(CXPPMM), 0x80);
}

#[test]
fn no_collisions_while_vblank_is_on() {
    let mut tia = Tia::new();
    tia.write(PF0, 0xF0);
    tia.write(GRP0, 0xFF);
    tia.write(VBLANK, 0x02);
    for _ in 0..u32::from(LINE_CLOCKS) * 300 {
        tia.step();
    }
    assert_eq!(tia.collisions(), [0; 8]);
}

#[test]
fn playfield_priority_puts_playfield_over_players() {
    let mut tia = Tia::new();
    tia.write(PF0, 0xF0);
    tia.write(COLUPF, 0x44);
    tia.write(COLUP0, 0x86);
    tia.write(GRP0, 0xFF);
    open_window(&mut tia);
    run_to(&mut tia, 30);
    tia.write(RESP0, 0);
    finish_line(&mut tia);
    assert_eq!(pixel(&tia, 2, 0), argb(TvStandard::Ntsc, 0x86, false));

    tia.write(CTRLPF, 0x04);
    finish_line(&mut tia);
    assert_eq!(pixel(&tia, 2, 1), argb(TvStandard::Ntsc, 0x44, false));
}

#[test]
fn score_mode_colours_each_half_by_player() {
    let mut tia = Tia::new();
    tia.write(PF0, 0xF0);
    tia.write(PF1, 0xFF);
    tia.write(PF2, 0xFF);
    tia.write(COLUP0, 0x44);
    tia.write(COLUP1, 0x86);
    tia.write(CTRLPF, 0x02);
    open_window(&mut tia);
    finish_line(&mut tia);
    assert_eq!(pixel(&tia, 20, 0), argb(TvStandard::Ntsc, 0x44, false));
    assert_eq!(pixel(&tia, 120, 0), argb(TvStandard::Ntsc, 0x86, false));
}

#[test]
fn first_visible_row_follows_vblank() {
    let mut tia = Tia::new();
    tia.write(COLUBK, 0x0E);
    tia.write(VBLANK, 0x02);
    for _ in 0..5 {
        finish_line(&mut tia);
    }
    tia.write(VBLANK, 0x00);
    finish_line(&mut tia);
    assert_eq!(pixel(&tia, 80, 0), argb(TvStandard::Ntsc, 0x0E, false));
    assert_eq!(pixel(&tia, 80, 1), BLACK);
}

#[test]
fn vsync_edges_mark_and_restart_the_frame() {
    let mut tia = Tia::new();
    for _ in 0..20 {
        finish_line(&mut tia);
    }
    tia.write(VSYNC, 0x02);
    assert!(tia.take_frame_ready());
    for _ in 0..3 {
        finish_line(&mut tia);
    }
    assert_eq!(tia.scanline(), 23);
    tia.write(VSYNC, 0x00);
    assert_eq!(tia.scanline(), 0);
    assert!(!tia.frame_ready());
}

#[test]
fn pal_frames_are_longer() {
    let mut tia = Tia::new();
    tia.set_standard(TvStandard::Pal);
    for _ in 0..300 {
        finish_line(&mut tia);
    }
    assert!(!tia.frame_ready());
    for _ in 0..22 {
        finish_line(&mut tia);
    }
    assert!(tia.frame_ready());
    assert_eq!(tia.scanline(), 0);
}
