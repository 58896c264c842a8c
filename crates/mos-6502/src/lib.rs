//! NMOS 6502 CPU core.
//!
//! Each call to [`Mos6502::execute`] runs one whole instruction and returns
//! the cycles it took, including page-crossing and branch penalties. All 256
//! opcodes are defined: the documented set, the stable and unstable illegal
//! opcodes, and the JAM opcodes that lock the CPU.
//!
//! Decimal mode follows NMOS behavior, including the flag results on
//! invalid BCD operands.

mod addressing;
mod alu;
mod cpu;
pub mod flags;
mod instructions;
mod opcodes;
mod registers;

pub use addressing::AddressingMode;
pub use cpu::Mos6502;
pub use flags::Status;
pub use opcodes::{OPCODES, Opcode};
pub use registers::Registers;
