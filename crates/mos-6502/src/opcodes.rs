//! Opcode dispatch table.
//!
//! One entry per opcode byte: mnemonic, addressing mode, base cycle cost and
//! handler. Base costs are the NMOS figures; handlers add page-crossing and
//! branch penalties on top.

use std::fmt;

use emu_core::Bus;

use crate::instructions::{
    adc, alr, anc, and, ane, arr, asl, bcc, bcs, beq, bit, bmi, bne, bpl, brk, bvc, bvs, clc,
    cld, cli, clv, cmp, cpx, cpy, dcp, dec, dex, dey, eor, inc, inx, iny, isc, jam, jmp, jsr,
    las, lax, lda, ldx, ldy, lsr, lxa, nop, ora, pha, php, pla, plp, rla, rol, ror, rra, rti,
    rts, sax, sbc, sbx, sec, sed, sei, sha, shx, shy, slo, sre, sta, stx, sty, tas, tax, tay,
    tsx, txa, txs, tya,
};
use crate::{AddressingMode, Mos6502};

pub(crate) type Handler = fn(&mut Mos6502, &mut dyn Bus, AddressingMode) -> u32;

/// A decoded opcode.
#[derive(Clone, Copy)]
pub struct Opcode {
    pub mnemonic: &'static str,
    pub mode: AddressingMode,
    /// Base cycle cost. For stores this is also the cycle the write lands on.
    pub cycles: u8,
    pub(crate) handler: Handler,
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opcode")
            .field("mnemonic", &self.mnemonic)
            .field("mode", &self.mode)
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

const fn op(mnemonic: &'static str, mode: AddressingMode, cycles: u8, handler: Handler) -> Opcode {
    Opcode {
        mnemonic,
        mode,
        cycles,
        handler,
    }
}

const IMP: AddressingMode = AddressingMode::Implied;
const ACC: AddressingMode = AddressingMode::Accumulator;
const IMM: AddressingMode = AddressingMode::Immediate;
const ZP: AddressingMode = AddressingMode::ZeroPage;
const ZPX: AddressingMode = AddressingMode::ZeroPageX;
const ZPY: AddressingMode = AddressingMode::ZeroPageY;
const ABS: AddressingMode = AddressingMode::Absolute;
const ABX: AddressingMode = AddressingMode::AbsoluteX;
const ABY: AddressingMode = AddressingMode::AbsoluteY;
const IND: AddressingMode = AddressingMode::Indirect;
const IZX: AddressingMode = AddressingMode::IndexedIndirect;
const IZY: AddressingMode = AddressingMode::IndirectIndexed;
const REL: AddressingMode = AddressingMode::Relative;

/// The full 256-entry NMOS 6502 opcode table.
pub static OPCODES: [Opcode; 256] = [
    op("BRK", IMP, 7, brk), // $00
    op("ORA", IZX, 6, ora), // $01
    op("JAM", IMP, 2, jam), // $02
    op("SLO", IZX, 8, slo), // $03
    op("NOP", ZP, 3, nop), // $04
    op("ORA", ZP, 3, ora), // $05
    op("ASL", ZP, 5, asl), // $06
    op("SLO", ZP, 5, slo), // $07
    op("PHP", IMP, 3, php), // $08
    op("ORA", IMM, 2, ora), // $09
    op("ASL", ACC, 2, asl), // $0A
    op("ANC", IMM, 2, anc), // $0B
    op("NOP", ABS, 4, nop), // $0C
    op("ORA", ABS, 4, ora), // $0D
    op("ASL", ABS, 6, asl), // $0E
    op("SLO", ABS, 6, slo), // $0F
    op("BPL", REL, 2, bpl), // $10
    op("ORA", IZY, 5, ora), // $11
    op("JAM", IMP, 2, jam), // $12
    op("SLO", IZY, 8, slo), // $13
    op("NOP", ZPX, 4, nop), // $14
    op("ORA", ZPX, 4, ora), // $15
    op("ASL", ZPX, 6, asl), // $16
    op("SLO", ZPX, 6, slo), // $17
    op("CLC", IMP, 2, clc), // $18
    op("ORA", ABY, 4, ora), // $19
    op("NOP", IMP, 2, nop), // $1A
    op("SLO", ABY, 7, slo), // $1B
    op("NOP", ABX, 4, nop), // $1C
    op("ORA", ABX, 4, ora), // $1D
    op("ASL", ABX, 7, asl), // $1E
    op("SLO", ABX, 7, slo), // $1F
    op("JSR", ABS, 6, jsr), // $20
    op("AND", IZX, 6, and), // $21
    op("JAM", IMP, 2, jam), // $22
    op("RLA", IZX, 8, rla), // $23
    op("BIT", ZP, 3, bit), // $24
    op("AND", ZP, 3, and), // $25
    op("ROL", ZP, 5, rol), // $26
    op("RLA", ZP, 5, rla), // $27
    op("PLP", IMP, 4, plp), // $28
    op("AND", IMM, 2, and), // $29
    op("ROL", ACC, 2, rol), // $2A
    op("ANC", IMM, 2, anc), // $2B
    op("BIT", ABS, 4, bit), // $2C
    op("AND", ABS, 4, and), // $2D
    op("ROL", ABS, 6, rol), // $2E
    op("RLA", ABS, 6, rla), // $2F
    op("BMI", REL, 2, bmi), // $30
    op("AND", IZY, 5, and), // $31
    op("JAM", IMP, 2, jam), // $32
    op("RLA", IZY, 8, rla), // $33
    op("NOP", ZPX, 4, nop), // $34
    op("AND", ZPX, 4, and), // $35
    op("ROL", ZPX, 6, rol), // $36
    op("RLA", ZPX, 6, rla), // $37
    op("SEC", IMP, 2, sec), // $38
    op("AND", ABY, 4, and), // $39
    op("NOP", IMP, 2, nop), // $3A
    op("RLA", ABY, 7, rla), // $3B
    op("NOP", ABX, 4, nop), // $3C
    op("AND", ABX, 4, and), // $3D
    op("ROL", ABX, 7, rol), // $3E
    op("RLA", ABX, 7, rla), // $3F
    op("RTI", IMP, 6, rti), // $40
    op("EOR", IZX, 6, eor), // $41
    op("JAM", IMP, 2, jam), // $42
    op("SRE", IZX, 8, sre), // $43
    op("NOP", ZP, 3, nop), // $44
    op("EOR", ZP, 3, eor), // $45
    op("LSR", ZP, 5, lsr), // $46
    op("SRE", ZP, 5, sre), // $47
    op("PHA", IMP, 3, pha), // $48
    op("EOR", IMM, 2, eor), // $49
    op("LSR", ACC, 2, lsr), // $4A
    op("ALR", IMM, 2, alr), // $4B
    op("JMP", ABS, 3, jmp), // $4C
    op("EOR", ABS, 4, eor), // $4D
    op("LSR", ABS, 6, lsr), // $4E
    op("SRE", ABS, 6, sre), // $4F
    op("BVC", REL, 2, bvc), // $50
    op("EOR", IZY, 5, eor), // $51
    op("JAM", IMP, 2, jam), // $52
    op("SRE", IZY, 8, sre), // $53
    op("NOP", ZPX, 4, nop), // $54
    op("EOR", ZPX, 4, eor), // $55
    op("LSR", ZPX, 6, lsr), // $56
    op("SRE", ZPX, 6, sre), // $57
    op("CLI", IMP, 2, cli), // $58
    op("EOR", ABY, 4, eor), // $59
    op("NOP", IMP, 2, nop), // $5A
    op("SRE", ABY, 7, sre), // $5B
    op("NOP", ABX, 4, nop), // $5C
    op("EOR", ABX, 4, eor), // $5D
    op("LSR", ABX, 7, lsr), // $5E
    op("SRE", ABX, 7, sre), // $5F
    op("RTS", IMP, 6, rts), // $60
    op("ADC", IZX, 6, adc), // $61
    op("JAM", IMP, 2, jam), // $62
    op("RRA", IZX, 8, rra), // $63
    op("NOP", ZP, 3, nop), // $64
    op("ADC", ZP, 3, adc), // $65
    op("ROR", ZP, 5, ror), // $66
    op("RRA", ZP, 5, rra), // $67
    op("PLA", IMP, 4, pla), // $68
    op("ADC", IMM, 2, adc), // $69
    op("ROR", ACC, 2, ror), // $6A
    op("ARR", IMM, 2, arr), // $6B
    op("JMP", IND, 5, jmp), // $6C
    op("ADC", ABS, 4, adc), // $6D
    op("ROR", ABS, 6, ror), // $6E
    op("RRA", ABS, 6, rra), // $6F
    op("BVS", REL, 2, bvs), // $70
    op("ADC", IZY, 5, adc), // $71
    op("JAM", IMP, 2, jam), // $72
    op("RRA", IZY, 8, rra), // $73
    op("NOP", ZPX, 4, nop), // $74
    op("ADC", ZPX, 4, adc), // $75
    op("ROR", ZPX, 6, ror), // $76
    op("RRA", ZPX, 6, rra), // $77
    op("SEI", IMP, 2, sei), // $78
    op("ADC", ABY, 4, adc), // $79
    op("NOP", IMP, 2, nop), // $7A
    op("RRA", ABY, 7, rra), // $7B
    op("NOP", ABX, 4, nop), // $7C
    op("ADC", ABX, 4, adc), // $7D
    op("ROR", ABX, 7, ror), // $7E
    op("RRA", ABX, 7, rra), // $7F
    op("NOP", IMM, 2, nop), // $80
    op("STA", IZX, 6, sta), // $81
    op("NOP", IMM, 2, nop), // $82
    op("SAX", IZX, 6, sax), // $83
    op("STY", ZP, 3, sty), // $84
    op("STA", ZP, 3, sta), // $85
    op("STX", ZP, 3, stx), // $86
    op("SAX", ZP, 3, sax), // $87
    op("DEY", IMP, 2, dey), // $88
    op("NOP", IMM, 2, nop), // $89
    op("TXA", IMP, 2, txa), // $8A
    op("ANE", IMM, 2, ane), // $8B
    op("STY", ABS, 4, sty), // $8C
    op("STA", ABS, 4, sta), // $8D
    op("STX", ABS, 4, stx), // $8E
    op("SAX", ABS, 4, sax), // $8F
    op("BCC", REL, 2, bcc), // $90
    op("STA", IZY, 6, sta), // $91
    op("JAM", IMP, 2, jam), // $92
    op("SHA", IZY, 6, sha), // $93
    op("STY", ZPX, 4, sty), // $94
    op("STA", ZPX, 4, sta), // $95
    op("STX", ZPY, 4, stx), // $96
    op("SAX", ZPY, 4, sax), // $97
    op("TYA", IMP, 2, tya), // $98
    op("STA", ABY, 5, sta), // $99
    op("TXS", IMP, 2, txs), // $9A
    op("TAS", ABY, 5, tas), // $9B
    op("SHY", ABX, 5, shy), // $9C
    op("STA", ABX, 5, sta), // $9D
    op("SHX", ABY, 5, shx), // $9E
    op("SHA", ABY, 5, sha), // $9F
    op("LDY", IMM, 2, ldy), // $A0
    op("LDA", IZX, 6, lda), // $A1
    op("LDX", IMM, 2, ldx), // $A2
    op("LAX", IZX, 6, lax), // $A3
    op("LDY", ZP, 3, ldy), // $A4
    op("LDA", ZP, 3, lda), // $A5
    op("LDX", ZP, 3, ldx), // $A6
    op("LAX", ZP, 3, lax), // $A7
    op("TAY", IMP, 2, tay), // $A8
    op("LDA", IMM, 2, lda), // $A9
    op("TAX", IMP, 2, tax), // $AA
    op("LXA", IMM, 2, lxa), // $AB
    op("LDY", ABS, 4, ldy), // $AC
    op("LDA", ABS, 4, lda), // $AD
    op("LDX", ABS, 4, ldx), // $AE
    op("LAX", ABS, 4, lax), // $AF
    op("BCS", REL, 2, bcs), // $B0
    op("LDA", IZY, 5, lda), // $B1
    op("JAM", IMP, 2, jam), // $B2
    op("LAX", IZY, 5, lax), // $B3
    op("LDY", ZPX, 4, ldy), // $B4
    op("LDA", ZPX, 4, lda), // $B5
    op("LDX", ZPY, 4, ldx), // $B6
    op("LAX", ZPY, 4, lax), // $B7
    op("CLV", IMP, 2, clv), // $B8
    op("LDA", ABY, 4, lda), // $B9
    op("TSX", IMP, 2, tsx), // $BA
    op("LAS", ABY, 4, las), // $BB
    op("LDY", ABX, 4, ldy), // $BC
    op("LDA", ABX, 4, lda), // $BD
    op("LDX", ABY, 4, ldx), // $BE
    op("LAX", ABY, 4, lax), // $BF
    op("CPY", IMM, 2, cpy), // $C0
    op("CMP", IZX, 6, cmp), // $C1
    op("NOP", IMM, 2, nop), // $C2
    op("DCP", IZX, 8, dcp), // $C3
    op("CPY", ZP, 3, cpy), // $C4
    op("CMP", ZP, 3, cmp), // $C5
    op("DEC", ZP, 5, dec), // $C6
    op("DCP", ZP, 5, dcp), // $C7
    op("INY", IMP, 2, iny), // $C8
    op("CMP", IMM, 2, cmp), // $C9
    op("DEX", IMP, 2, dex), // $CA
    op("SBX", IMM, 2, sbx), // $CB
    op("CPY", ABS, 4, cpy), // $CC
    op("CMP", ABS, 4, cmp), // $CD
    op("DEC", ABS, 6, dec), // $CE
    op("DCP", ABS, 6, dcp), // $CF
    op("BNE", REL, 2, bne), // $D0
    op("CMP", IZY, 5, cmp), // $D1
    op("JAM", IMP, 2, jam), // $D2
    op("DCP", IZY, 8, dcp), // $D3
    op("NOP", ZPX, 4, nop), // $D4
    op("CMP", ZPX, 4, cmp), // $D5
    op("DEC", ZPX, 6, dec), // $D6
    op("DCP", ZPX, 6, dcp), // $D7
    op("CLD", IMP, 2, cld), // $D8
    op("CMP", ABY, 4, cmp), // $D9
    op("NOP", IMP, 2, nop), // $DA
    op("DCP", ABY, 7, dcp), // $DB
    op("NOP", ABX, 4, nop), // $DC
    op("CMP", ABX, 4, cmp), // $DD
    op("DEC", ABX, 7, dec), // $DE
    op("DCP", ABX, 7, dcp), // $DF
    op("CPX", IMM, 2, cpx), // $E0
    op("SBC", IZX, 6, sbc), // $E1
    op("NOP", IMM, 2, nop), // $E2
    op("ISC", IZX, 8, isc), // $E3
    op("CPX", ZP, 3, cpx), // $E4
    op("SBC", ZP, 3, sbc), // $E5
    op("INC", ZP, 5, inc), // $E6
    op("ISC", ZP, 5, isc), // $E7
    op("INX", IMP, 2, inx), // $E8
    op("SBC", IMM, 2, sbc), // $E9
    op("NOP", IMP, 2, nop), // $EA
    op("SBC", IMM, 2, sbc), // $EB
    op("CPX", ABS, 4, cpx), // $EC
    op("SBC", ABS, 4, sbc), // $ED
    op("INC", ABS, 6, inc), // $EE
    op("ISC", ABS, 6, isc), // $EF
    op("BEQ", REL, 2, beq), // $F0
    op("SBC", IZY, 5, sbc), // $F1
    op("JAM", IMP, 2, jam), // $F2
    op("ISC", IZY, 8, isc), // $F3
    op("NOP", ZPX, 4, nop), // $F4
    op("SBC", ZPX, 4, sbc), // $F5
    op("INC", ZPX, 6, inc), // $F6
    op("ISC", ZPX, 6, isc), // $F7
    op("SED", IMP, 2, sed), // $F8
    op("SBC", ABY, 4, sbc), // $F9
    op("NOP", IMP, 2, nop), // $FA
    op("ISC", ABY, 7, isc), // $FB
    op("NOP", ABX, 4, nop), // $FC
    op("SBC", ABX, 4, sbc), // $FD
    op("INC", ABX, 7, inc), // $FE
    op("ISC", ABX, 7, isc), // $FF
];
