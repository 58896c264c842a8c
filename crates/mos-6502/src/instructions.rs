//! Instruction handlers.
//!
//! Every handler has the same shape: it receives the CPU, the bus and the
//! addressing mode from the opcode table, and returns the cycles it adds on
//! top of the table's base cost (page crossings, taken branches).

use emu_core::Bus;

use crate::addressing::crosses_page;
use crate::flags::{C, D, I, N, V, Z};
use crate::{AddressingMode, Mos6502, Status};

/// Magic constant for the unstable LXA and ANE opcodes.
const UNSTABLE_MAGIC: u8 = 0xEE;

const IRQ_VECTOR: u16 = 0xFFFE;

/// Read-modify-write on memory or the accumulator. Returns the new value.
fn modify(
    cpu: &mut Mos6502,
    bus: &mut dyn Bus,
    mode: AddressingMode,
    op: fn(&mut Mos6502, u8) -> u8,
) -> u8 {
    if mode == AddressingMode::Accumulator {
        let a = cpu.regs.a;
        let result = op(cpu, a);
        cpu.regs.a = result;
        return result;
    }
    let (addr, _) = cpu.address(bus, mode);
    let value = bus.read(addr);
    let result = op(cpu, value);
    bus.write(addr, result);
    result
}

fn increment(cpu: &mut Mos6502, value: u8) -> u8 {
    let result = value.wrapping_add(1);
    cpu.regs.p.update_nz(result);
    result
}

fn decrement(cpu: &mut Mos6502, value: u8) -> u8 {
    let result = value.wrapping_sub(1);
    cpu.regs.p.update_nz(result);
    result
}

fn branch(cpu: &mut Mos6502, bus: &mut dyn Bus, taken: bool) -> u32 {
    let (next, target) = cpu.resolve(bus, AddressingMode::Relative);
    if !taken {
        return 0;
    }
    cpu.regs.pc = target;
    1 + u32::from(crosses_page(next, target))
}

// =============================================================================
// Loads and stores
// =============================================================================

pub(crate) fn lda(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, extra) = cpu.read_operand(bus, mode);
    cpu.regs.a = value;
    cpu.regs.p.update_nz(value);
    extra
}

pub(crate) fn ldx(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, extra) = cpu.read_operand(bus, mode);
    cpu.regs.x = value;
    cpu.regs.p.update_nz(value);
    extra
}

pub(crate) fn ldy(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, extra) = cpu.read_operand(bus, mode);
    cpu.regs.y = value;
    cpu.regs.p.update_nz(value);
    extra
}

pub(crate) fn sta(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (addr, _) = cpu.address(bus, mode);
    let value = cpu.regs.a;
    cpu.store(bus, addr, value);
    0
}

pub(crate) fn stx(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (addr, _) = cpu.address(bus, mode);
    let value = cpu.regs.x;
    cpu.store(bus, addr, value);
    0
}

pub(crate) fn sty(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (addr, _) = cpu.address(bus, mode);
    let value = cpu.regs.y;
    cpu.store(bus, addr, value);
    0
}

// =============================================================================
// Transfers and stack
// =============================================================================

pub(crate) fn tax(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.x = cpu.regs.a;
    cpu.regs.p.update_nz(cpu.regs.x);
    0
}

pub(crate) fn tay(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.y = cpu.regs.a;
    cpu.regs.p.update_nz(cpu.regs.y);
    0
}

pub(crate) fn txa(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.a = cpu.regs.x;
    cpu.regs.p.update_nz(cpu.regs.a);
    0
}

pub(crate) fn tya(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.a = cpu.regs.y;
    cpu.regs.p.update_nz(cpu.regs.a);
    0
}

pub(crate) fn tsx(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.x = cpu.regs.s;
    cpu.regs.p.update_nz(cpu.regs.x);
    0
}

pub(crate) fn txs(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.s = cpu.regs.x;
    0
}

pub(crate) fn pha(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let a = cpu.regs.a;
    cpu.push(bus, a);
    0
}

pub(crate) fn pla(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.a = cpu.pull(bus);
    cpu.regs.p.update_nz(cpu.regs.a);
    0
}

pub(crate) fn php(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let p = cpu.regs.p.to_byte_brk();
    cpu.push(bus, p);
    0
}

pub(crate) fn plp(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let p = cpu.pull(bus);
    cpu.regs.p = Status::from_stack(p);
    0
}

// =============================================================================
// Logic and arithmetic
// =============================================================================

pub(crate) fn ora(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, extra) = cpu.read_operand(bus, mode);
    cpu.regs.a |= value;
    cpu.regs.p.update_nz(cpu.regs.a);
    extra
}

pub(crate) fn and(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, extra) = cpu.read_operand(bus, mode);
    cpu.regs.a &= value;
    cpu.regs.p.update_nz(cpu.regs.a);
    extra
}

pub(crate) fn eor(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, extra) = cpu.read_operand(bus, mode);
    cpu.regs.a ^= value;
    cpu.regs.p.update_nz(cpu.regs.a);
    extra
}

pub(crate) fn adc(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, extra) = cpu.read_operand(bus, mode);
    cpu.adc(value);
    extra
}

pub(crate) fn sbc(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, extra) = cpu.read_operand(bus, mode);
    cpu.sbc(value);
    extra
}

pub(crate) fn cmp(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, extra) = cpu.read_operand(bus, mode);
    let register = cpu.regs.a;
    cpu.compare(register, value);
    extra
}

pub(crate) fn cpx(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, extra) = cpu.read_operand(bus, mode);
    let register = cpu.regs.x;
    cpu.compare(register, value);
    extra
}

pub(crate) fn cpy(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, extra) = cpu.read_operand(bus, mode);
    let register = cpu.regs.y;
    cpu.compare(register, value);
    extra
}

pub(crate) fn bit(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, _) = cpu.read_operand(bus, mode);
    cpu.bit(value);
    0
}

// =============================================================================
// Read-modify-write
// =============================================================================

pub(crate) fn asl(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    modify(cpu, bus, mode, Mos6502::asl);
    0
}

pub(crate) fn lsr(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    modify(cpu, bus, mode, Mos6502::lsr);
    0
}

pub(crate) fn rol(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    modify(cpu, bus, mode, Mos6502::rol);
    0
}

pub(crate) fn ror(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    modify(cpu, bus, mode, Mos6502::ror);
    0
}

pub(crate) fn inc(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    modify(cpu, bus, mode, increment);
    0
}

pub(crate) fn dec(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    modify(cpu, bus, mode, decrement);
    0
}

pub(crate) fn inx(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let value = cpu.regs.x;
    cpu.regs.x = increment(cpu, value);
    0
}

pub(crate) fn iny(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let value = cpu.regs.y;
    cpu.regs.y = increment(cpu, value);
    0
}

pub(crate) fn dex(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let value = cpu.regs.x;
    cpu.regs.x = decrement(cpu, value);
    0
}

pub(crate) fn dey(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let value = cpu.regs.y;
    cpu.regs.y = decrement(cpu, value);
    0
}

// =============================================================================
// Control flow
// =============================================================================

pub(crate) fn bpl(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let taken = !cpu.regs.p.is_set(N);
    branch(cpu, bus, taken)
}

pub(crate) fn bmi(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let taken = cpu.regs.p.is_set(N);
    branch(cpu, bus, taken)
}

pub(crate) fn bvc(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let taken = !cpu.regs.p.is_set(V);
    branch(cpu, bus, taken)
}

pub(crate) fn bvs(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let taken = cpu.regs.p.is_set(V);
    branch(cpu, bus, taken)
}

pub(crate) fn bcc(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let taken = !cpu.regs.p.is_set(C);
    branch(cpu, bus, taken)
}

pub(crate) fn bcs(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let taken = cpu.regs.p.is_set(C);
    branch(cpu, bus, taken)
}

pub(crate) fn bne(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let taken = !cpu.regs.p.is_set(Z);
    branch(cpu, bus, taken)
}

pub(crate) fn beq(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let taken = cpu.regs.p.is_set(Z);
    branch(cpu, bus, taken)
}

pub(crate) fn jmp(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (addr, _) = cpu.address(bus, mode);
    cpu.regs.pc = addr;
    0
}

pub(crate) fn jsr(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let target = cpu.fetch_word(bus);
    // The pushed address is the last byte of the JSR instruction.
    let ret = cpu.regs.pc.wrapping_sub(1);
    cpu.push_word(bus, ret);
    cpu.regs.pc = target;
    0
}

pub(crate) fn rts(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.pc = cpu.pull_word(bus).wrapping_add(1);
    0
}

pub(crate) fn rti(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    let p = cpu.pull(bus);
    cpu.regs.p = Status::from_stack(p);
    cpu.regs.pc = cpu.pull_word(bus);
    0
}

pub(crate) fn brk(cpu: &mut Mos6502, bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    // BRK skips a padding byte.
    let ret = cpu.regs.pc.wrapping_add(1);
    cpu.push_word(bus, ret);
    let p = cpu.regs.p.to_byte_brk();
    cpu.push(bus, p);
    cpu.regs.p.set(I);
    cpu.regs.pc = Mos6502::read_word(bus, IRQ_VECTOR);
    0
}

// =============================================================================
// Flags
// =============================================================================

pub(crate) fn clc(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.p.clear(C);
    0
}

pub(crate) fn sec(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.p.set(C);
    0
}

pub(crate) fn cli(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.p.clear(I);
    0
}

pub(crate) fn sei(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.p.set(I);
    0
}

pub(crate) fn clv(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.p.clear(V);
    0
}

pub(crate) fn cld(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.p.clear(D);
    0
}

pub(crate) fn sed(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.p.set(D);
    0
}

// =============================================================================
// NOP and JAM
// =============================================================================

/// NOP in all its widths. Operand forms still perform their read, and the
/// abs,X forms pay the page-crossing penalty.
pub(crate) fn nop(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    if mode == AddressingMode::Implied {
        return 0;
    }
    let (_, extra) = cpu.read_operand(bus, mode);
    extra
}

/// JAM locks the CPU: PC is rewound onto the opcode so every subsequent
/// `execute` re-runs it.
pub(crate) fn jam(cpu: &mut Mos6502, _bus: &mut dyn Bus, _mode: AddressingMode) -> u32 {
    cpu.regs.pc = cpu.regs.pc.wrapping_sub(1);
    if !cpu.jammed {
        log::trace!("CPU jammed at ${:04X}", cpu.regs.pc);
    }
    cpu.jammed = true;
    0
}

// =============================================================================
// Illegal: combined read-modify-write
// =============================================================================

/// ASL then ORA.
pub(crate) fn slo(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let value = modify(cpu, bus, mode, Mos6502::asl);
    cpu.regs.a |= value;
    cpu.regs.p.update_nz(cpu.regs.a);
    0
}

/// ROL then AND.
pub(crate) fn rla(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let value = modify(cpu, bus, mode, Mos6502::rol);
    cpu.regs.a &= value;
    cpu.regs.p.update_nz(cpu.regs.a);
    0
}

/// LSR then EOR.
pub(crate) fn sre(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let value = modify(cpu, bus, mode, Mos6502::lsr);
    cpu.regs.a ^= value;
    cpu.regs.p.update_nz(cpu.regs.a);
    0
}

/// ROR then ADC; the carry out of the rotate feeds the add.
pub(crate) fn rra(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let value = modify(cpu, bus, mode, Mos6502::ror);
    cpu.adc(value);
    0
}

/// DEC then CMP.
pub(crate) fn dcp(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let value = modify(cpu, bus, mode, decrement);
    let register = cpu.regs.a;
    cpu.compare(register, value);
    0
}

/// INC then SBC.
pub(crate) fn isc(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let value = modify(cpu, bus, mode, increment);
    cpu.sbc(value);
    0
}

// =============================================================================
// Illegal: loads, stores and immediates
// =============================================================================

pub(crate) fn sax(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (addr, _) = cpu.address(bus, mode);
    let value = cpu.regs.a & cpu.regs.x;
    cpu.store(bus, addr, value);
    0
}

pub(crate) fn lax(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, extra) = cpu.read_operand(bus, mode);
    cpu.regs.a = value;
    cpu.regs.x = value;
    cpu.regs.p.update_nz(value);
    extra
}

/// A = X = S = M & S.
pub(crate) fn las(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, extra) = cpu.read_operand(bus, mode);
    let result = value & cpu.regs.s;
    cpu.regs.a = result;
    cpu.regs.x = result;
    cpu.regs.s = result;
    cpu.regs.p.update_nz(result);
    extra
}

/// AND then copy bit 7 into C.
pub(crate) fn anc(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, _) = cpu.read_operand(bus, mode);
    cpu.regs.a &= value;
    cpu.regs.p.update_nz(cpu.regs.a);
    cpu.regs.p.set_if(C, cpu.regs.a & 0x80 != 0);
    0
}

/// AND then LSR A.
pub(crate) fn alr(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, _) = cpu.read_operand(bus, mode);
    let masked = cpu.regs.a & value;
    cpu.regs.a = cpu.lsr(masked);
    0
}

/// AND then ROR A, with flags from the adder in decimal mode.
pub(crate) fn arr(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, _) = cpu.read_operand(bus, mode);
    let masked = cpu.regs.a & value;
    let mut result = (masked >> 1) | (cpu.regs.p.carry() << 7);
    cpu.regs.p.update_nz(result);

    if cpu.regs.p.is_set(D) {
        cpu.regs.p.set_if(V, (masked ^ result) & 0x40 != 0);
        if masked & 0x0F >= 0x05 {
            result = (result & 0xF0) | (result.wrapping_add(0x06) & 0x0F);
        }
        if masked & 0xF0 >= 0x50 {
            result = result.wrapping_add(0x60);
            cpu.regs.p.set(C);
        } else {
            cpu.regs.p.clear(C);
        }
    } else {
        cpu.regs.p.set_if(C, result & 0x40 != 0);
        cpu.regs.p.set_if(V, ((result >> 6) ^ (result >> 5)) & 0x01 != 0);
    }
    cpu.regs.a = result;
    0
}

/// X = (A & X) - imm, flags as CMP.
pub(crate) fn sbx(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, _) = cpu.read_operand(bus, mode);
    let masked = cpu.regs.a & cpu.regs.x;
    cpu.compare(masked, value);
    cpu.regs.x = masked.wrapping_sub(value);
    0
}

pub(crate) fn lxa(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, _) = cpu.read_operand(bus, mode);
    let result = (cpu.regs.a | UNSTABLE_MAGIC) & value;
    cpu.regs.a = result;
    cpu.regs.x = result;
    cpu.regs.p.update_nz(result);
    0
}

pub(crate) fn ane(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (value, _) = cpu.read_operand(bus, mode);
    cpu.regs.a = (cpu.regs.a | UNSTABLE_MAGIC) & cpu.regs.x & value;
    cpu.regs.p.update_nz(cpu.regs.a);
    0
}

// =============================================================================
// Illegal: stores masked by the address high byte
// =============================================================================

fn high_plus_one(base: u16) -> u8 {
    ((base >> 8) as u8).wrapping_add(1)
}

pub(crate) fn sha(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let (base, addr) = cpu.resolve(bus, mode);
    let value = cpu.regs.a & cpu.regs.x & high_plus_one(base);
    bus.write(addr, value);
    0
}

/// SHX and SHY: on a page crossing the stored value replaces the high byte
/// of the target address.
fn store_high_masked(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode, register: u8) {
    let (base, mut addr) = cpu.resolve(bus, mode);
    let value = register & high_plus_one(base);
    if crosses_page(base, addr) {
        addr = (addr & 0x00FF) | (u16::from(value) << 8);
    }
    bus.write(addr, value);
}

pub(crate) fn shx(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let x = cpu.regs.x;
    store_high_masked(cpu, bus, mode, x);
    0
}

pub(crate) fn shy(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    let y = cpu.regs.y;
    store_high_masked(cpu, bus, mode, y);
    0
}

/// S = A & X, then store S & (high + 1).
pub(crate) fn tas(cpu: &mut Mos6502, bus: &mut dyn Bus, mode: AddressingMode) -> u32 {
    cpu.regs.s = cpu.regs.a & cpu.regs.x;
    let (base, addr) = cpu.resolve(bus, mode);
    let value = cpu.regs.s & high_plus_one(base);
    bus.write(addr, value);
    0
}
