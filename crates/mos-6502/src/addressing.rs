//! Addressing modes and operand resolution.
//!
//! No dummy reads are issued: each mode touches only the bytes that carry
//! data. Devices with read side effects (timers, collision latches) see
//! exactly one access per operand.

use emu_core::Bus;

use crate::Mos6502;

/// 6502 addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// JMP ($nnnn), with the page-wrap bug.
    Indirect,
    /// ($nn,X)
    IndexedIndirect,
    /// ($nn),Y
    IndirectIndexed,
    Relative,
}

impl AddressingMode {
    /// Operand bytes following the opcode.
    #[must_use]
    pub const fn operand_len(self) -> u16 {
        match self {
            Self::Implied | Self::Accumulator => 0,
            Self::Immediate
            | Self::ZeroPage
            | Self::ZeroPageX
            | Self::ZeroPageY
            | Self::IndexedIndirect
            | Self::IndirectIndexed
            | Self::Relative => 1,
            Self::Absolute | Self::AbsoluteX | Self::AbsoluteY | Self::Indirect => 2,
        }
    }
}

pub(crate) const fn crosses_page(base: u16, addr: u16) -> bool {
    base & 0xFF00 != addr & 0xFF00
}

impl Mos6502 {
    pub(crate) fn fetch(&mut self, bus: &mut dyn Bus) -> u8 {
        let value = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    pub(crate) fn fetch_word(&mut self, bus: &mut dyn Bus) -> u16 {
        let lo = self.fetch(bus);
        let hi = self.fetch(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Read a little-endian pointer from page zero; the high byte wraps
    /// within the page.
    fn read_zp_word(bus: &mut dyn Bus, ptr: u8) -> u16 {
        let lo = bus.read(u16::from(ptr));
        let hi = bus.read(u16::from(ptr.wrapping_add(1)));
        u16::from_le_bytes([lo, hi])
    }

    pub(crate) fn read_word(bus: &mut dyn Bus, addr: u16) -> u16 {
        let lo = bus.read(addr);
        let hi = bus.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Resolve the effective address for `mode`, consuming operand bytes.
    ///
    /// Returns the base address before indexing alongside the final address
    /// so callers that need the high byte (SHA, SHX, SHY, TAS) can use it.
    pub(crate) fn resolve(&mut self, bus: &mut dyn Bus, mode: AddressingMode) -> (u16, u16) {
        match mode {
            AddressingMode::Immediate => {
                let addr = self.regs.pc;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                (addr, addr)
            }
            AddressingMode::ZeroPage => {
                let addr = u16::from(self.fetch(bus));
                (addr, addr)
            }
            AddressingMode::ZeroPageX => {
                let base = self.fetch(bus);
                (u16::from(base), u16::from(base.wrapping_add(self.regs.x)))
            }
            AddressingMode::ZeroPageY => {
                let base = self.fetch(bus);
                (u16::from(base), u16::from(base.wrapping_add(self.regs.y)))
            }
            AddressingMode::Absolute => {
                let addr = self.fetch_word(bus);
                (addr, addr)
            }
            AddressingMode::AbsoluteX => {
                let base = self.fetch_word(bus);
                (base, base.wrapping_add(u16::from(self.regs.x)))
            }
            AddressingMode::AbsoluteY => {
                let base = self.fetch_word(bus);
                (base, base.wrapping_add(u16::from(self.regs.y)))
            }
            AddressingMode::Indirect => {
                let ptr = self.fetch_word(bus);
                let lo = bus.read(ptr);
                // The high byte is fetched without carrying into the page.
                let hi = bus.read((ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF));
                let addr = u16::from_le_bytes([lo, hi]);
                (addr, addr)
            }
            AddressingMode::IndexedIndirect => {
                let ptr = self.fetch(bus).wrapping_add(self.regs.x);
                let addr = Self::read_zp_word(bus, ptr);
                (addr, addr)
            }
            AddressingMode::IndirectIndexed => {
                let ptr = self.fetch(bus);
                let base = Self::read_zp_word(bus, ptr);
                (base, base.wrapping_add(u16::from(self.regs.y)))
            }
            AddressingMode::Relative => {
                let offset = self.fetch(bus) as i8;
                let base = self.regs.pc;
                (base, base.wrapping_add_signed(i16::from(offset)))
            }
            AddressingMode::Implied | AddressingMode::Accumulator => (self.regs.pc, self.regs.pc),
        }
    }

    /// Effective address and whether indexing crossed a page.
    pub(crate) fn address(&mut self, bus: &mut dyn Bus, mode: AddressingMode) -> (u16, bool) {
        let (base, addr) = self.resolve(bus, mode);
        let crossed = matches!(
            mode,
            AddressingMode::AbsoluteX | AddressingMode::AbsoluteY | AddressingMode::IndirectIndexed
        ) && crosses_page(base, addr);
        (addr, crossed)
    }

    /// Read the operand for a read instruction. Returns the value and the
    /// page-crossing penalty (0 or 1).
    pub(crate) fn read_operand(&mut self, bus: &mut dyn Bus, mode: AddressingMode) -> (u8, u32) {
        if mode == AddressingMode::Accumulator {
            return (self.regs.a, 0);
        }
        let (addr, crossed) = self.address(bus, mode);
        (bus.read(addr), u32::from(crossed))
    }
}
