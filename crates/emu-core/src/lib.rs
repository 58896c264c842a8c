//! Core traits and types for cycle-aware emulation.
//!
//! The CPU reports elapsed cycles per instruction and the system derives every
//! other component's timing from that count. No component reaches into
//! another; the machine that owns them wires the clocks together.

mod bus;
mod clock;
mod cpu;
mod observable;
mod peripheral;
mod tickable;
mod ticks;

pub use bus::{Bus, SimpleBus};
pub use clock::MasterClock;
pub use cpu::Cpu;
pub use observable::{Observable, Value};
pub use peripheral::Peripheral;
pub use tickable::Tickable;
pub use ticks::Ticks;
