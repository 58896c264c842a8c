//! MOS 6532 RIOT (RAM, I/O, Timer) as wired in the Atari 2600.
//!
//! - 128 bytes of RAM
//! - Port A (SWCHA): both joysticks, four direction bits each, active low
//! - Port B (SWCHB): console switches
//! - An 8-bit interval timer with 1, 8, 64 or 1024 cycle prescale
//!
//! # I/O registers (`addr & 7`)
//!
//! | Reg | Read   | Write                        |
//! |-----|--------|------------------------------|
//! | 0   | SWCHA  | ignored                      |
//! | 1   | SWACNT | SWACNT                       |
//! | 2   | SWCHB  | SWCHB (bits 2, 4, 5 only)    |
//! | 3   | SWBCNT | SWBCNT                       |
//! | 4/6 | INTIM  | -                            |
//! | 5/7 | INSTAT | -                            |
//!
//! A write with address bit 4 set loads the timer instead: `addr & 3`
//! selects TIM1T, TIM8T, TIM64T or T1024T.
//!
//! The timer runs at the selected interval until it passes zero, then
//! counts down once per cycle from $FF with INSTAT bits 7 and 6 set.
//! Reading INTIM clears bit 6 and restores the programmed interval.

use emu_core::{Observable, Tickable, Value};

/// Prescale intervals selected by `addr & 3` on a timer write.
const INTERVALS: [u16; 4] = [1, 8, 64, 1024];

/// SWCHB after power-on: both difficulties B, colour, no switches held.
const SWCHB_RESET: u8 = 0x0B;

/// Bits of SWCHB the CPU can change.
const SWCHB_WRITABLE: u8 = 0x34;

/// Console switches on port B.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    /// Game reset, bit 0. Active low.
    Reset,
    /// Game select, bit 1. Active low.
    Select,
    /// Colour / black-and-white, bit 3. Set for colour.
    Color,
    /// Left difficulty, bit 6. Set for A.
    Difficulty0,
    /// Right difficulty, bit 7. Set for A.
    Difficulty1,
}

impl Switch {
    fn mask(self) -> u8 {
        match self {
            Self::Reset => 0x01,
            Self::Select => 0x02,
            Self::Color => 0x08,
            Self::Difficulty0 => 0x40,
            Self::Difficulty1 => 0x80,
        }
    }

    /// Whether the switch being "on" sets its bit. Buttons pull low.
    fn active_high(self) -> bool {
        !matches!(self, Self::Reset | Self::Select)
    }
}

/// Joystick directions on port A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn bit(self) -> u8 {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }
}

/// MOS 6532 RIOT.
pub struct Riot6532 {
    ram: [u8; 128],
    swcha: u8,
    swacnt: u8,
    swchb: u8,
    swbcnt: u8,
    intim: u8,
    instat: u8,
    /// Cycles left before the next INTIM decrement.
    timer_count: u16,
    /// Interval in effect: the programmed one, or 1 after underflow.
    interval: u16,
    /// Interval selected by the last timer write.
    programmed_interval: u16,
}

impl Default for Riot6532 {
    fn default() -> Self {
        Self::new()
    }
}

impl Riot6532 {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: [0; 128],
            swcha: 0xFF,
            swacnt: 0,
            swchb: SWCHB_RESET,
            swbcnt: 0,
            intim: 0xFF,
            instat: 0,
            timer_count: 1024,
            interval: 1024,
            programmed_interval: 1024,
        }
    }

    /// Return to power-on state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn read_ram(&self, addr: u16) -> u8 {
        self.ram[usize::from(addr & 0x7F)]
    }

    pub fn write_ram(&mut self, addr: u16, value: u8) {
        self.ram[usize::from(addr & 0x7F)] = value;
    }

    /// Read an I/O or timer register. Reading INTIM has side effects.
    pub fn read_io(&mut self, addr: u16) -> u8 {
        match addr & 0x07 {
            0 => self.swcha,
            1 => self.swacnt,
            2 => self.swchb,
            3 => self.swbcnt,
            4 | 6 => {
                self.instat &= !0x40;
                if self.interval == 1 {
                    self.interval = self.programmed_interval;
                    self.timer_count = self.programmed_interval;
                }
                self.intim
            }
            _ => self.instat,
        }
    }

    /// Write an I/O register, or load the timer when address bit 4 is set.
    pub fn write_io(&mut self, addr: u16, value: u8) {
        if addr & 0x10 != 0 {
            self.set_timer(value, INTERVALS[usize::from(addr & 0x03)]);
            return;
        }
        match addr & 0x07 {
            1 => self.swacnt = value,
            2 => self.swchb = (self.swchb & !SWCHB_WRITABLE) | (value & SWCHB_WRITABLE),
            3 => self.swbcnt = value,
            _ => {}
        }
    }

    fn set_timer(&mut self, value: u8, interval: u16) {
        self.intim = value;
        self.instat &= 0x3F;
        self.interval = interval;
        self.programmed_interval = interval;
        self.timer_count = interval;
        // The first decrement happens on the write itself.
        self.decrement_timer();
    }

    fn decrement_timer(&mut self) {
        if self.intim == 0 {
            self.instat |= 0xC0;
            self.intim = 0xFF;
            self.interval = 1;
        } else {
            self.intim -= 1;
        }
        self.timer_count = self.interval;
    }

    /// One CPU cycle of the timer.
    pub fn clock_pulse(&mut self) {
        self.timer_count = self.timer_count.saturating_sub(1);
        if self.timer_count == 0 {
            self.decrement_timer();
        }
    }

    /// Set or clear a console switch.
    ///
    /// `on` means pressed for Reset and Select, colour for Color, and
    /// difficulty A for the difficulty switches.
    pub fn set_switch(&mut self, switch: Switch, on: bool) {
        let mask = switch.mask();
        if on == switch.active_high() {
            self.swchb |= mask;
        } else {
            self.swchb &= !mask;
        }
    }

    /// Press or release a joystick direction for `player` (0 or 1).
    pub fn set_joystick(&mut self, player: usize, direction: Direction, pressed: bool) {
        let shift = match player {
            0 => 4,
            1 => 0,
            _ => return,
        };
        let mask = 1 << (direction.bit() + shift);
        if pressed {
            self.swcha &= !mask;
        } else {
            self.swcha |= mask;
        }
    }

    #[must_use]
    pub fn swcha(&self) -> u8 {
        self.swcha
    }

    #[must_use]
    pub fn swchb(&self) -> u8 {
        self.swchb
    }

    /// INTIM without the read side effects.
    #[must_use]
    pub fn intim(&self) -> u8 {
        self.intim
    }

    #[must_use]
    pub fn instat(&self) -> u8 {
        self.instat
    }
}

impl Tickable for Riot6532 {
    fn tick(&mut self) {
        self.clock_pulse();
    }
}

impl Observable for Riot6532 {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(offset) = path.strip_prefix("ram.") {
            let addr = offset
                .strip_prefix('$')
                .map_or_else(|| offset.parse().ok(), |hex| u16::from_str_radix(hex, 16).ok())?;
            return (addr < 128).then(|| self.read_ram(addr).into());
        }
        match path {
            "swcha" => Some(self.swcha.into()),
            "swacnt" => Some(self.swacnt.into()),
            "swchb" => Some(self.swchb.into()),
            "swbcnt" => Some(self.swbcnt.into()),
            "intim" => Some(self.intim.into()),
            "instat" => Some(self.instat.into()),
            "interval" => Some(self.interval.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "swcha", "swacnt", "swchb", "swbcnt", "intim", "instat", "interval", "ram.<offset>",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_state() {
        let mut riot = Riot6532::new();
        assert_eq!(riot.read_io(0x280), 0xFF);
        assert_eq!(riot.read_io(0x282), 0x0B);
        assert_eq!(riot.intim(), 0xFF);
        assert_eq!(riot.instat(), 0);
    }

    #[test]
    fn ram_is_mirrored_on_seven_bits() {
        let mut riot = Riot6532::new();
        riot.write_ram(0x80, 0x42);
        assert_eq!(riot.read_ram(0x00), 0x42);
        assert_eq!(riot.read_ram(0x180), 0x42);
    }

    #[test]
    fn timer_write_decrements_immediately() {
        let mut riot = Riot6532::new();
        riot.write_io(0x296, 10);
        assert_eq!(riot.intim(), 9);
    }

    #[test]
    fn tim64t_counts_every_64_cycles() {
        let mut riot = Riot6532::new();
        riot.write_io(0x296, 10);
        for _ in 0..63 {
            riot.clock_pulse();
        }
        assert_eq!(riot.intim(), 9);
        riot.clock_pulse();
        assert_eq!(riot.intim(), 8);
    }

    #[test]
    fn underflow_sets_flags_and_switches_to_single_cycle() {
        let mut riot = Riot6532::new();
        riot.write_io(0x294, 1);
        assert_eq!(riot.intim(), 0);
        riot.clock_pulse();
        assert_eq!(riot.intim(), 0xFF);
        assert_eq!(riot.instat(), 0xC0);
        riot.clock_pulse();
        assert_eq!(riot.intim(), 0xFE);
    }

    #[test]
    fn reading_intim_clears_bit_6_and_restores_interval() {
        let mut riot = Riot6532::new();
        riot.write_io(0x295, 0);
        // Loading 0 underflows on the write itself.
        assert_eq!(riot.instat(), 0xC0);
        assert_eq!(riot.read_io(0x284), 0xFF);
        assert_eq!(riot.instat(), 0x80);
        for _ in 0..7 {
            riot.clock_pulse();
        }
        assert_eq!(riot.intim(), 0xFF);
        riot.clock_pulse();
        assert_eq!(riot.intim(), 0xFE);
    }

    #[test]
    fn timer_write_clears_instat() {
        let mut riot = Riot6532::new();
        riot.write_io(0x294, 0);
        assert_eq!(riot.read_io(0x285), 0xC0);
        riot.write_io(0x297, 5);
        assert_eq!(riot.read_io(0x285), 0);
    }

    #[test]
    fn swchb_writes_only_touch_writable_bits() {
        let mut riot = Riot6532::new();
        riot.write_io(0x282, 0xFF);
        assert_eq!(riot.swchb(), 0x0B | 0x34);
        riot.write_io(0x282, 0x00);
        assert_eq!(riot.swchb(), 0x0B);
    }

    #[test]
    fn ddr_registers_are_stored() {
        let mut riot = Riot6532::new();
        riot.write_io(0x281, 0x0F);
        riot.write_io(0x283, 0xF0);
        assert_eq!(riot.read_io(0x281), 0x0F);
        assert_eq!(riot.read_io(0x283), 0xF0);
    }

    #[test]
    fn console_switches() {
        let mut riot = Riot6532::new();
        riot.set_switch(Switch::Reset, true);
        assert_eq!(riot.swchb() & 0x01, 0);
        riot.set_switch(Switch::Reset, false);
        assert_eq!(riot.swchb() & 0x01, 0x01);
        riot.set_switch(Switch::Color, false);
        assert_eq!(riot.swchb() & 0x08, 0);
        riot.set_switch(Switch::Difficulty1, true);
        assert_eq!(riot.swchb() & 0x80, 0x80);
    }

    #[test]
    fn joysticks_are_active_low() {
        let mut riot = Riot6532::new();
        riot.set_joystick(0, Direction::Right, true);
        assert_eq!(riot.swcha(), 0x7F);
        riot.set_joystick(1, Direction::Up, true);
        assert_eq!(riot.swcha(), 0x7E);
        riot.set_joystick(0, Direction::Right, false);
        assert_eq!(riot.swcha(), 0xFE);
    }

    #[test]
    fn observable_ram() {
        let mut riot = Riot6532::new();
        riot.write_ram(0x85, 0x99);
        assert_eq!(riot.query("ram.$05"), Some(Value::U8(0x99)));
        assert_eq!(riot.query("ram.5"), Some(Value::U8(0x99)));
        assert_eq!(riot.query("ram.200"), None);
    }
}
