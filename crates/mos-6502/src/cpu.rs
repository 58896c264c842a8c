//! The 6502 execution engine.

use emu_core::{Bus, Cpu, Observable, Value};

use crate::flags::{C, D, I, N, V, Z};
use crate::{OPCODES, Registers};

const NMI_VECTOR: u16 = 0xFFFA;
const RESET_VECTOR: u16 = 0xFFFC;
const IRQ_VECTOR: u16 = 0xFFFE;

/// Entry point used when the reset vector reads $0000.
const FALLBACK_ENTRY: u16 = 0xF000;

const INTERRUPT_CYCLES: u32 = 7;

/// The MOS 6502 CPU.
///
/// Instruction-stepped: [`Cpu::execute`] runs one whole instruction and
/// returns the cycles it took. Interrupt requests are latched and serviced
/// before the next opcode fetch.
#[derive(Debug)]
pub struct Mos6502 {
    pub regs: Registers,

    /// Opcode of the instruction being executed.
    pub(crate) opcode: u8,

    /// Set once a JAM opcode has executed; cleared by reset.
    pub(crate) jammed: bool,

    nmi_pending: bool,
    irq_pending: bool,

    total_cycles: u64,
}

impl Default for Mos6502 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mos6502 {
    /// A CPU in reset state with PC = 0. Call [`Cpu::reset`] to load the
    /// reset vector, or set `regs.pc` directly.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            opcode: 0,
            jammed: false,
            nmi_pending: false,
            irq_pending: false,
            total_cycles: 0,
        }
    }

    /// Total cycles executed since reset.
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    fn step(&mut self, bus: &mut dyn Bus) -> u32 {
        let cycles = if self.nmi_pending && !self.jammed {
            self.nmi_pending = false;
            self.service_interrupt(bus, NMI_VECTOR)
        } else if self.irq_pending && !self.jammed && !self.regs.p.is_set(I) {
            self.irq_pending = false;
            self.service_interrupt(bus, IRQ_VECTOR)
        } else {
            let opcode = self.fetch(bus);
            self.opcode = opcode;
            let entry = &OPCODES[usize::from(opcode)];
            u32::from(entry.cycles) + (entry.handler)(self, bus, entry.mode)
        };
        self.total_cycles += u64::from(cycles);
        cycles
    }

    fn service_interrupt(&mut self, bus: &mut dyn Bus, vector: u16) -> u32 {
        let pc = self.regs.pc;
        self.push_word(bus, pc);
        let p = self.regs.p.to_byte_irq();
        self.push(bus, p);
        self.regs.p.set(I);
        self.regs.pc = Self::read_word(bus, vector);
        INTERRUPT_CYCLES
    }

    /// Write for a store instruction. Tells the bus which cycle of the
    /// instruction the write lands on (the opcode's base cost).
    pub(crate) fn store(&mut self, bus: &mut dyn Bus, addr: u16, value: u8) {
        bus.store_cycle(OPCODES[usize::from(self.opcode)].cycles);
        bus.write(addr, value);
    }

    pub(crate) fn push(&mut self, bus: &mut dyn Bus, value: u8) {
        let addr = self.regs.push();
        bus.write(addr, value);
    }

    pub(crate) fn pull(&mut self, bus: &mut dyn Bus) -> u8 {
        let addr = self.regs.pop();
        bus.read(addr)
    }

    pub(crate) fn push_word(&mut self, bus: &mut dyn Bus, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push(bus, hi);
        self.push(bus, lo);
    }

    pub(crate) fn pull_word(&mut self, bus: &mut dyn Bus) -> u16 {
        let lo = self.pull(bus);
        let hi = self.pull(bus);
        u16::from_le_bytes([lo, hi])
    }
}

impl Cpu for Mos6502 {
    type Registers = Registers;

    fn execute<B: Bus>(&mut self, bus: &mut B) -> u32 {
        self.step(bus)
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.jammed
    }

    fn interrupt(&mut self) -> bool {
        if self.regs.p.is_set(I) {
            return false;
        }
        self.irq_pending = true;
        true
    }

    fn nmi(&mut self) {
        self.nmi_pending = true;
    }

    fn reset<B: Bus>(&mut self, bus: &mut B) {
        *self = Self::new();
        let vector = Self::read_word(bus, RESET_VECTOR);
        self.regs.pc = if vector == 0 {
            log::warn!("reset vector is $0000, starting at ${FALLBACK_ENTRY:04X}");
            FALLBACK_ENTRY
        } else {
            vector
        };
    }
}

impl Observable for Mos6502 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" => Some(self.regs.s.into()),
            "p" => Some(self.regs.p.0.into()),
            "flags.c" => Some(self.regs.p.is_set(C).into()),
            "flags.z" => Some(self.regs.p.is_set(Z).into()),
            "flags.i" => Some(self.regs.p.is_set(I).into()),
            "flags.d" => Some(self.regs.p.is_set(D).into()),
            "flags.v" => Some(self.regs.p.is_set(V).into()),
            "flags.n" => Some(self.regs.p.is_set(N).into()),
            "opcode" => Some(OPCODES[usize::from(self.opcode)].mnemonic.into()),
            "cycle" => Some(self.total_cycles.into()),
            "halted" => Some(self.jammed.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc", "a", "x", "y", "s", "p", "flags.c", "flags.z", "flags.i", "flags.d", "flags.v",
            "flags.n", "opcode", "cycle", "halted",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::SimpleBus;

    #[test]
    fn reset_reads_vector() {
        let mut bus = SimpleBus::new();
        bus.load(0xFFFC, &[0x34, 0x12]);
        let mut cpu = Mos6502::new();
        cpu.reset(&mut bus);
        assert_eq!(cpu.regs.pc, 0x1234);
        assert_eq!(cpu.regs.s, 0xFD);
        assert!(cpu.regs.p.is_set(I));
    }

    #[test]
    fn zero_reset_vector_falls_back() {
        let mut bus = SimpleBus::new();
        let mut cpu = Mos6502::new();
        cpu.reset(&mut bus);
        assert_eq!(cpu.regs.pc, FALLBACK_ENTRY);
    }

    #[test]
    fn irq_is_refused_while_masked() {
        let mut cpu = Mos6502::new();
        assert!(!cpu.interrupt());
        cpu.regs.p.clear(I);
        assert!(cpu.interrupt());
    }

    #[test]
    fn nmi_pushes_state_and_takes_seven_cycles() {
        let mut bus = SimpleBus::new();
        bus.load(0xFFFA, &[0x00, 0x30]);
        let mut cpu = Mos6502::new();
        cpu.regs.pc = 0x0200;
        cpu.regs.s = 0xFF;
        cpu.nmi();

        assert_eq!(cpu.execute(&mut bus), 7);
        assert_eq!(cpu.regs.pc, 0x3000);
        assert_eq!(bus.peek(0x01FF), 0x02);
        assert_eq!(bus.peek(0x01FE), 0x00);
        // B clear in the pushed status
        assert_eq!(bus.peek(0x01FD) & crate::flags::B, 0);
    }

    #[test]
    fn observable_reports_registers() {
        let mut cpu = Mos6502::new();
        cpu.regs.a = 0x42;
        assert_eq!(cpu.query("a"), Some(Value::U8(0x42)));
        assert_eq!(cpu.query("flags.i"), Some(Value::Bool(true)));
        assert_eq!(cpu.query("bogus"), None);
        for path in cpu.query_paths() {
            assert!(cpu.query(path).is_some(), "{path}");
        }
    }
}
