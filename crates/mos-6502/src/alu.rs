//! Arithmetic, logic and shift primitives shared by the documented and
//! illegal opcodes.

use crate::Mos6502;
use crate::flags::{C, D, N, V, Z};

impl Mos6502 {
    /// ADC, binary or NMOS decimal depending on D.
    pub(crate) fn adc(&mut self, value: u8) {
        let a = u16::from(self.regs.a);
        let v = u16::from(value);
        let carry = u16::from(self.regs.p.carry());

        if self.regs.p.is_set(D) {
            let binary = a + v + carry;
            self.regs.p.set_if(Z, binary & 0xFF == 0);

            let mut lo = (a & 0x0F) + (v & 0x0F) + carry;
            if lo > 0x09 {
                lo += 0x06;
            }
            let mut hi = (a & 0xF0) + (v & 0xF0) + if lo > 0x0F { 0x10 } else { 0 } + (lo & 0x0F);

            // N and V are taken before the high nibble is adjusted.
            self.regs.p.set_if(N, hi & 0x80 != 0);
            self.regs.p.set_if(V, (a ^ hi) & !(a ^ v) & 0x80 != 0);

            if hi & 0x1F0 > 0x90 {
                hi += 0x60;
            }
            self.regs.p.set_if(C, hi > 0xFF);
            self.regs.a = hi as u8;
        } else {
            let sum = a + v + carry;
            let result = sum as u8;
            self.regs.p.set_if(C, sum > 0xFF);
            self.regs.p.set_if(V, !(a ^ v) & (a ^ sum) & 0x80 != 0);
            self.regs.a = result;
            self.regs.p.update_nz(result);
        }
    }

    /// SBC. Flags always come from the binary subtraction; in decimal mode
    /// only the accumulator gets the BCD result.
    pub(crate) fn sbc(&mut self, value: u8) {
        let a = u16::from(self.regs.a);
        let inverted = u16::from(value ^ 0xFF);
        let carry = u16::from(self.regs.p.carry());
        let binary = a + inverted + carry;

        self.regs.p.set_if(C, binary > 0xFF);
        self.regs.p.set_if(V, (a ^ binary) & (inverted ^ binary) & 0x80 != 0);
        self.regs.p.update_nz(binary as u8);

        if self.regs.p.is_set(D) {
            let borrow = 1 - carry as i16;
            let mut lo = i16::from(self.regs.a & 0x0F) - i16::from(value & 0x0F) - borrow;
            if lo < 0 {
                lo = ((lo - 0x06) & 0x0F) - 0x10;
            }
            let mut hi = i16::from(self.regs.a & 0xF0) - i16::from(value & 0xF0) + lo;
            if hi < 0 {
                hi -= 0x60;
            }
            self.regs.a = (hi & 0xFF) as u8;
        } else {
            self.regs.a = binary as u8;
        }
    }

    /// CMP/CPX/CPY and the compare half of DCP and SBX.
    pub(crate) fn compare(&mut self, register: u8, value: u8) {
        let result = register.wrapping_sub(value);
        self.regs.p.set_if(C, register >= value);
        self.regs.p.update_nz(result);
    }

    pub(crate) fn asl(&mut self, value: u8) -> u8 {
        let result = value << 1;
        self.regs.p.set_if(C, value & 0x80 != 0);
        self.regs.p.update_nz(result);
        result
    }

    pub(crate) fn lsr(&mut self, value: u8) -> u8 {
        let result = value >> 1;
        self.regs.p.set_if(C, value & 0x01 != 0);
        self.regs.p.update_nz(result);
        result
    }

    pub(crate) fn rol(&mut self, value: u8) -> u8 {
        let result = (value << 1) | self.regs.p.carry();
        self.regs.p.set_if(C, value & 0x80 != 0);
        self.regs.p.update_nz(result);
        result
    }

    pub(crate) fn ror(&mut self, value: u8) -> u8 {
        let result = (value >> 1) | (self.regs.p.carry() << 7);
        self.regs.p.set_if(C, value & 0x01 != 0);
        self.regs.p.update_nz(result);
        result
    }

    pub(crate) fn bit(&mut self, value: u8) {
        self.regs.p.set_if(Z, self.regs.a & value == 0);
        self.regs.p.set_if(N, value & 0x80 != 0);
        self.regs.p.set_if(V, value & 0x40 != 0);
    }
}
