//! The TIA beam: one `step()` per colour clock.
//!
//! A scanline is 228 colour clocks: 68 of horizontal blank followed by 160
//! visible pixels. The chip has no frame memory on real hardware; here each
//! visible pixel is resolved as the beam passes it and stored in a 160x192
//! ARGB framebuffer.
//!
//! Register writes can be scheduled a number of colour clocks into the
//! future so that a store lands on the colour clock of the CPU's write
//! cycle rather than at the start of the instruction.

use emu_core::{Observable, Tickable, Value};

use crate::audio::AudioChannel;
use crate::graphics::{self, MISSILE_CENTER};
use crate::palette::{self, BLACK};
use crate::registers::{
    AUDC0, AUDC1, AUDF0, AUDF1, AUDV0, AUDV1, COLUBK, COLUP0, COLUP1, COLUPF, CTRLPF, CXCLR,
    ENABL, ENAM0, ENAM1, GRP0, GRP1, HMBL, HMCLR, HMM0, HMM1, HMOVE, HMP0, HMP1, INPT4, INPT5,
    NUSIZ0, NUSIZ1, PF0, PF1, PF2, REFP0, REFP1, RESBL, RESM0, RESM1, RESMP0, RESMP1, RESP0,
    RESP1, RSYNC, VBLANK, VDELBL, VDELP0, VDELP1, VSYNC, WSYNC,
};
use crate::TvStandard;

/// Visible pixels per scanline.
pub const WIDTH: usize = 160;
/// Visible scanlines per frame.
pub const HEIGHT: usize = 192;
/// Colour clocks of horizontal blank at the start of each line.
pub const HBLANK_CLOCKS: u16 = 68;
/// Colour clocks per scanline.
pub const LINE_CLOCKS: u16 = 228;

/// Lines past the nominal frame length before the beam wraps on its own.
const OVERSCAN_SLACK: u16 = 10;

/// Positionable objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Object {
    Player0,
    Player1,
    Missile0,
    Missile1,
    Ball,
}

impl Object {
    const ALL: [Self; 5] = [
        Self::Player0,
        Self::Player1,
        Self::Missile0,
        Self::Missile1,
        Self::Ball,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Colour clock offset added when the object's reset register is strobed.
    fn strobe_offset(self) -> i32 {
        match self {
            Self::Player0 | Self::Player1 => 5,
            Self::Missile0 | Self::Missile1 | Self::Ball => 4,
        }
    }

    fn motion_register(self) -> u8 {
        match self {
            Self::Player0 => HMP0,
            Self::Player1 => HMP1,
            Self::Missile0 => HMM0,
            Self::Missile1 => HMM1,
            Self::Ball => HMBL,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Player0 => "p0",
            Self::Player1 => "p1",
            Self::Missile0 => "m0",
            Self::Missile1 => "m1",
            Self::Ball => "bl",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingWrite {
    /// Colour clocks left before the write lands. Always non-zero in the queue.
    delay: u32,
    reg: u8,
    value: u8,
}

/// Television Interface Adapter.
pub struct Tia {
    /// Last value written to each write register, indexed by address.
    regs: [u8; 0x40],
    /// Horizontal positions in `0..160`, indexed by [`Object`].
    positions: [u8; 5],
    /// Vertical-delay copies of GRP0, GRP1 and ENABL.
    grp0_old: u8,
    grp1_old: u8,
    enabl_old: u8,
    /// CXM0P..CXPPMM latches.
    collisions: [u8; 8],
    /// INPT4/INPT5: bit 7 clear while the fire button is held.
    fire: [u8; 2],

    hclock: u16,
    scanline: u16,
    wsync: bool,
    prev_vblank: bool,
    /// Scanline where VBLANK last went low in this frame.
    dynamic_start: Option<u16>,
    frame_ready: bool,
    hmove_blank: bool,
    frame_count: u64,

    pending: Vec<PendingWrite>,
    framebuffer: Vec<u32>,
    audio: [AudioChannel; 2],

    standard: TvStandard,
    monochrome: bool,
}

impl Default for Tia {
    fn default() -> Self {
        Self::new()
    }
}

impl Tia {
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: [0; 0x40],
            positions: [0; 5],
            grp0_old: 0,
            grp1_old: 0,
            enabl_old: 0,
            collisions: [0; 8],
            fire: [0x80; 2],
            hclock: 0,
            scanline: 0,
            wsync: false,
            prev_vblank: false,
            dynamic_start: None,
            frame_ready: false,
            hmove_blank: false,
            frame_count: 0,
            pending: Vec::new(),
            framebuffer: vec![BLACK; WIDTH * HEIGHT],
            audio: [AudioChannel::default(); 2],
            standard: TvStandard::default(),
            monochrome: false,
        }
    }

    /// Return to power-on state. The standard and colour mode are kept.
    pub fn reset(&mut self) {
        self.regs = [0; 0x40];
        self.positions = [0; 5];
        self.grp0_old = 0;
        self.grp1_old = 0;
        self.enabl_old = 0;
        self.collisions = [0; 8];
        self.fire = [0x80; 2];
        self.hclock = 0;
        self.scanline = 0;
        self.wsync = false;
        self.prev_vblank = false;
        self.dynamic_start = None;
        self.frame_ready = false;
        self.hmove_blank = false;
        self.pending.clear();
        self.framebuffer.fill(BLACK);
        self.audio = [AudioChannel::default(); 2];
    }

    pub fn set_standard(&mut self, standard: TvStandard) {
        if self.standard != standard {
            log::info!("TIA standard set to {standard:?}");
        }
        self.standard = standard;
    }

    #[must_use]
    pub fn standard(&self) -> TvStandard {
        self.standard
    }

    pub fn set_monochrome(&mut self, monochrome: bool) {
        self.monochrome = monochrome;
    }

    #[must_use]
    pub fn monochrome(&self) -> bool {
        self.monochrome
    }

    /// Drive the fire button of `player` (0 or 1).
    pub fn set_fire_button(&mut self, player: usize, pressed: bool) {
        if let Some(input) = self.fire.get_mut(player) {
            *input = if pressed { 0x00 } else { 0x80 };
        }
    }

    /// Advance one colour clock.
    ///
    /// Returns `false` while WSYNC is holding the CPU. The hold is released
    /// when the beam wraps to the next line, so the call that completes a
    /// line returns `true`.
    pub fn step(&mut self) -> bool {
        self.apply_due_writes();

        let vblank = self.regs[usize::from(VBLANK)] & 0x02 != 0;
        if !vblank && self.prev_vblank && self.dynamic_start.is_none() {
            self.dynamic_start = Some(self.scanline);
        }
        let visible_start = self
            .dynamic_start
            .unwrap_or_else(|| self.standard.visible_start());

        if !vblank
            && self.hclock >= HBLANK_CLOCKS
            && self.scanline >= visible_start
            && usize::from(self.scanline - visible_start) < HEIGHT
        {
            self.render_pixel(
                (self.hclock - HBLANK_CLOCKS) as u8,
                self.scanline - visible_start,
            );
        }

        self.hclock += 1;
        if self.hclock >= LINE_CLOCKS {
            self.hclock = 0;
            self.scanline += 1;
            self.wsync = false;
            self.hmove_blank = false;
            if self.scanline >= self.standard.scanlines_per_frame() + OVERSCAN_SLACK {
                self.scanline = 0;
                self.end_frame();
            }
        }

        self.prev_vblank = vblank;
        !self.wsync
    }

    /// Immediate register write.
    pub fn write(&mut self, addr: u8, value: u8) {
        self.write_with_delay(addr, value, 0);
    }

    /// Register write that lands `delay` colour clocks from now.
    ///
    /// An HMOVE whose landing clock falls in horizontal blank arms the
    /// 8-pixel HMOVE blank immediately.
    pub fn write_with_delay(&mut self, addr: u8, value: u8, delay: u32) {
        let reg = addr & 0x3F;
        if reg == HMOVE
            && (u32::from(self.hclock) + delay) % u32::from(LINE_CLOCKS)
                < u32::from(HBLANK_CLOCKS)
        {
            self.hmove_blank = true;
        }
        if delay > 0 {
            self.pending.push(PendingWrite { delay, reg, value });
        } else {
            self.apply_write(reg, value);
        }
    }

    /// Read a collision or input register.
    #[must_use]
    pub fn read(&self, addr: u8) -> u8 {
        match addr & 0x0F {
            reg @ 0x00..=0x07 => self.collisions[usize::from(reg)],
            INPT4 => self.fire[0],
            INPT5 => self.fire[1],
            _ => 0,
        }
    }

    fn apply_due_writes(&mut self) {
        let mut i = 0;
        while i < self.pending.len() {
            self.pending[i].delay -= 1;
            if self.pending[i].delay == 0 {
                let write = self.pending.remove(i);
                self.apply_write(write.reg, write.value);
            } else {
                i += 1;
            }
        }
    }

    fn apply_write(&mut self, reg: u8, value: u8) {
        match reg {
            VSYNC => {
                let was_on = self.regs[usize::from(VSYNC)] & 0x02 != 0;
                let on = value & 0x02 != 0;
                self.regs[usize::from(VSYNC)] = value;
                if on && !was_on {
                    log::debug!("VSYNC on at scanline {}", self.scanline);
                    self.end_frame();
                } else if was_on && !on {
                    self.scanline = 0;
                    self.prev_vblank = self.regs[usize::from(VBLANK)] & 0x02 != 0;
                    self.dynamic_start = None;
                    self.framebuffer.fill(BLACK);
                }
            }
            WSYNC => self.wsync = true,
            RSYNC => self.hclock = 0,
            RESP0 => self.strobe(Object::Player0),
            RESP1 => self.strobe(Object::Player1),
            RESM0 => self.strobe(Object::Missile0),
            RESM1 => self.strobe(Object::Missile1),
            RESBL => self.strobe(Object::Ball),
            AUDC0 => self.audio[0].set_control(value),
            AUDC1 => self.audio[1].set_control(value),
            AUDF0 => self.audio[0].set_frequency(value),
            AUDF1 => self.audio[1].set_frequency(value),
            AUDV0 => self.audio[0].set_volume(value),
            AUDV1 => self.audio[1].set_volume(value),
            GRP0 => {
                self.grp1_old = self.regs[usize::from(GRP1)];
                self.regs[usize::from(GRP0)] = value;
            }
            GRP1 => {
                self.grp0_old = self.regs[usize::from(GRP0)];
                self.regs[usize::from(GRP1)] = value;
            }
            ENABL => {
                self.enabl_old = self.regs[usize::from(ENABL)];
                self.regs[usize::from(ENABL)] = value;
            }
            RESMP0 => self.lock_missile(Object::Missile0, Object::Player0, NUSIZ0, value),
            RESMP1 => self.lock_missile(Object::Missile1, Object::Player1, NUSIZ1, value),
            HMOVE => self.apply_motion(),
            HMCLR => {
                for obj in Object::ALL {
                    self.regs[usize::from(obj.motion_register())] = 0;
                }
            }
            CXCLR => self.collisions = [0; 8],
            VBLANK | NUSIZ0 | NUSIZ1 | COLUP0 | COLUP1 | COLUPF | COLUBK | CTRLPF | REFP0
            | REFP1 | PF0 | PF1 | PF2 | ENAM0 | ENAM1 | HMP0 | HMP1 | HMM0 | HMM1 | HMBL
            | VDELP0 | VDELP1 | VDELBL => self.regs[usize::from(reg)] = value,
            _ => {}
        }
    }

    /// Position an object at the current beam location.
    fn strobe(&mut self, obj: Object) {
        let eff = i32::from(self.hclock % LINE_CLOCKS);
        let pos = eff - i32::from(HBLANK_CLOCKS) + obj.strobe_offset();
        let pos = if self.hclock < HBLANK_CLOCKS {
            pos.max(0)
        } else if pos >= WIDTH as i32 {
            pos - WIDTH as i32
        } else {
            pos
        };
        self.positions[obj.index()] = pos as u8;
    }

    fn lock_missile(&mut self, missile: Object, player: Object, nusiz: u8, value: u8) {
        if value & 0x02 != 0 {
            let mode = usize::from(self.regs[usize::from(nusiz)] & 7);
            let centred = self.positions[player.index()] + MISSILE_CENTER[mode];
            self.positions[missile.index()] = centred % WIDTH as u8;
        }
    }

    /// HMOVE: shift every object by the signed high nibble of its motion
    /// register. Positive values move left.
    fn apply_motion(&mut self) {
        for obj in Object::ALL {
            let shift = i16::from((self.regs[usize::from(obj.motion_register())] as i8) >> 4);
            let pos = i16::from(self.positions[obj.index()]);
            self.positions[obj.index()] = ((pos - shift + 160) % 160) as u8;
        }
    }

    fn end_frame(&mut self) {
        self.frame_ready = true;
        self.frame_count += 1;
        log::debug!("frame {} complete", self.frame_count);
    }

    fn render_pixel(&mut self, x: u8, y: u16) {
        let index = usize::from(y) * WIDTH + usize::from(x);

        if self.hmove_blank && x < 8 {
            self.framebuffer[index] = BLACK;
            return;
        }

        let r = &self.regs;
        let reg = |addr: u8| r[usize::from(addr)];
        let pos = &self.positions;

        let pf = graphics::playfield(reg(PF0), reg(PF1), reg(PF2), reg(CTRLPF), x);

        let grp0 = if reg(VDELP0) & 1 != 0 { self.grp0_old } else { reg(GRP0) };
        let grp1 = if reg(VDELP1) & 1 != 0 { self.grp1_old } else { reg(GRP1) };
        let p0 = graphics::player(grp0, pos[0], reg(NUSIZ0), reg(REFP0), x);
        let p1 = graphics::player(grp1, pos[1], reg(NUSIZ1), reg(REFP1), x);

        let m0 = graphics::missile(reg(ENAM0), pos[2], reg(NUSIZ0), x);
        let m1 = graphics::missile(reg(ENAM1), pos[3], reg(NUSIZ1), x);

        let enable = if reg(VDELBL) & 1 != 0 { self.enabl_old } else { reg(ENABL) };
        let bl = graphics::ball(enable, pos[4], reg(CTRLPF), x);

        let pf_colour = if reg(CTRLPF) & 0x02 != 0 {
            if x < 80 { reg(COLUP0) } else { reg(COLUP1) }
        } else {
            reg(COLUPF)
        };

        let colour = if reg(CTRLPF) & 0x04 != 0 {
            if pf {
                pf_colour
            } else if bl {
                reg(COLUPF)
            } else if p0 || m0 {
                reg(COLUP0)
            } else if p1 || m1 {
                reg(COLUP1)
            } else {
                reg(COLUBK)
            }
        } else if p0 || m0 {
            reg(COLUP0)
        } else if p1 || m1 {
            reg(COLUP1)
        } else if pf {
            pf_colour
        } else if bl {
            reg(COLUPF)
        } else {
            reg(COLUBK)
        };

        self.latch_collisions(p0, p1, m0, m1, bl, pf);
        self.framebuffer[index] = palette::argb(self.standard, colour, self.monochrome);
    }

    #[allow(clippy::fn_params_excessive_bools)]
    fn latch_collisions(&mut self, p0: bool, p1: bool, m0: bool, m1: bool, bl: bool, pf: bool) {
        let pairs: [(usize, u8, bool); 15] = [
            (0, 0x80, m0 && p1),
            (0, 0x40, m0 && p0),
            (1, 0x80, m1 && p0),
            (1, 0x40, m1 && p1),
            (2, 0x80, p0 && pf),
            (2, 0x40, p0 && bl),
            (3, 0x80, p1 && pf),
            (3, 0x40, p1 && bl),
            (4, 0x80, m0 && pf),
            (4, 0x40, m0 && bl),
            (5, 0x80, m1 && pf),
            (5, 0x40, m1 && bl),
            (6, 0x80, bl && pf),
            (7, 0x80, p0 && p1),
            (7, 0x40, m0 && m1),
        ];
        for (reg, bit, hit) in pairs {
            if hit {
                self.collisions[reg] |= bit;
            }
        }
    }

    /// ARGB framebuffer, 160x192, row-major.
    #[must_use]
    pub fn framebuffer(&self) -> &[u32] {
        &self.framebuffer
    }

    #[must_use]
    pub fn hclock(&self) -> u16 {
        self.hclock
    }

    #[must_use]
    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    /// True while WSYNC holds the CPU.
    #[must_use]
    pub fn wsync(&self) -> bool {
        self.wsync
    }

    #[must_use]
    pub fn frame_ready(&self) -> bool {
        self.frame_ready
    }

    /// Return and clear the frame-ready flag.
    pub fn take_frame_ready(&mut self) -> bool {
        std::mem::take(&mut self.frame_ready)
    }

    /// Frames completed since power-on.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[must_use]
    pub fn hmove_blank(&self) -> bool {
        self.hmove_blank
    }

    #[must_use]
    pub fn position(&self, obj: Object) -> u8 {
        self.positions[obj.index()]
    }

    /// Raw collision latches CXM0P..CXPPMM.
    #[must_use]
    pub fn collisions(&self) -> [u8; 8] {
        self.collisions
    }

    /// Writes still waiting for their colour clock.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn audio_channels(&self) -> &[AudioChannel; 2] {
        &self.audio
    }
}

impl Tickable for Tia {
    fn tick(&mut self) {
        self.step();
    }
}

impl Observable for Tia {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(name) = path.strip_prefix("pos.") {
            return Object::ALL
                .into_iter()
                .find(|obj| obj.name() == name)
                .map(|obj| self.position(obj).into());
        }
        match path {
            "hclock" => Some(self.hclock.into()),
            "scanline" => Some(self.scanline.into()),
            "frame_ready" => Some(self.frame_ready.into()),
            "wsync" => Some(self.wsync.into()),
            "vblank" => Some((self.regs[usize::from(VBLANK)] & 0x02 != 0).into()),
            "vsync" => Some((self.regs[usize::from(VSYNC)] & 0x02 != 0).into()),
            "hmove_blank" => Some(self.hmove_blank.into()),
            "pending" => Some(Value::U32(self.pending.len() as u32)),
            "frame_count" => Some(self.frame_count.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "hclock",
            "scanline",
            "frame_ready",
            "wsync",
            "vblank",
            "vsync",
            "hmove_blank",
            "pos.p0",
            "pos.p1",
            "pos.m0",
            "pos.m1",
            "pos.bl",
            "pending",
            "frame_count",
        ]
    }
}
