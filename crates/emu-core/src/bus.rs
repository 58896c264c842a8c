//! Memory and I/O bus interface.

/// Memory and I/O bus interface.
///
/// Components access memory and peripherals through this trait. The bus
/// handles address decoding and routing to the appropriate device.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);

    /// Announce that the next write lands on `cycle` of the current
    /// instruction (1-based).
    ///
    /// Store instructions call this immediately before their write so that
    /// buses with beam-timed devices can place the write within the
    /// instruction. The hint applies to the next write only.
    fn store_cycle(&mut self, _cycle: u8) {}
}

/// Flat 64K RAM bus.
///
/// Every address is plain read/write memory. Used by CPU tests and
/// conformance images that expect no I/O.
pub struct SimpleBus {
    ram: Box<[u8; 0x10000]>,
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: Box::new([0; 0x10000]),
        }
    }

    /// Copy `data` into memory starting at `address`, wrapping at $FFFF.
    pub fn load(&mut self, address: u16, data: &[u8]) {
        for (i, &byte) in data.iter().enumerate() {
            let addr = address.wrapping_add(i as u16);
            self.ram[usize::from(addr)] = byte;
        }
    }

    /// Read memory without going through the bus.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.ram[usize::from(address)]
    }

    /// Write memory without going through the bus.
    pub fn poke(&mut self, address: u16, value: u8) {
        self.ram[usize::from(address)] = value;
    }
}

impl Bus for SimpleBus {
    fn read(&mut self, address: u16) -> u8 {
        self.ram[usize::from(address)]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.ram[usize::from(address)] = value;
    }
}
