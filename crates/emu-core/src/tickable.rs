//! Trait for components that can be advanced by clock ticks.

use crate::Ticks;

/// A component driven by an external clock.
///
/// The owner decides the clock: a video chip ticks once per color clock, a
/// timer chip once per CPU cycle. The CPU is not `Tickable`; it advances a
/// whole instruction at a time through [`crate::Cpu::execute`].
pub trait Tickable {
    /// Advance the component by one tick of its clock.
    fn tick(&mut self);

    /// Advance the component by multiple ticks.
    ///
    /// Default implementation calls `tick()` in a loop. Components may
    /// override for efficiency, but must produce identical results.
    fn tick_n(&mut self, count: Ticks) {
        for _ in 0..count.get() {
            self.tick();
        }
    }
}
