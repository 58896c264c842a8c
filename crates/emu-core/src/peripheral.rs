//! Memory-mapped peripheral interface.

/// A memory-mapped device occupying a window of the address space.
///
/// The bus translates an absolute address into an offset within the
/// device's window and never interprets the register semantics itself.
pub trait Peripheral {
    /// Read the register at `offset`. Reads may have side effects.
    fn read(&mut self, offset: u16) -> u8;

    /// Write the register at `offset`.
    fn write(&mut self, offset: u16, value: u8);

    /// Return the device to its power-on state.
    fn reset(&mut self) {}
}
