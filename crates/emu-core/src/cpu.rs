//! CPU core trait.

use crate::Bus;

/// A CPU core.
///
/// CPUs execute whole instructions against a bus and report how many cycles
/// each one took. The bus is passed in, not owned, so the system that owns
/// it can also clock the other chips behind it.
///
/// CPUs expose their internal state for observation and debugging.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Execute one instruction and return the cycles it consumed.
    fn execute<B: Bus>(&mut self, bus: &mut B) -> u32;

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU is halted.
    fn is_halted(&self) -> bool;

    /// Request an interrupt. Returns true if accepted.
    fn interrupt(&mut self) -> bool;

    /// Request a non-maskable interrupt.
    fn nmi(&mut self);

    /// Reset the CPU to its initial state, reading vectors from `bus`.
    fn reset<B: Bus>(&mut self, bus: &mut B);
}
