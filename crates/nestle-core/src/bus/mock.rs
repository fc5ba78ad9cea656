use crate::bus::Bus;

/// Flat 64 KiB RAM for exercising the CPU without any devices attached.
#[derive(Debug)]
pub(crate) struct MockBus {
    pub(crate) mem: Box<[u8; 0x10000]>,
}

impl Default for MockBus {
    fn default() -> Self {
        Self {
            mem: Box::new([0; 0x10000]),
        }
    }
}

impl MockBus {
    /// Copies `program` into memory starting at `addr`.
    pub(crate) fn with_program(addr: u16, program: &[u8]) -> Self {
        let mut bus = Self::default();
        let start = addr as usize;
        bus.mem[start..start + program.len()].copy_from_slice(program);
        bus
    }

    pub(crate) fn read(&self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    pub(crate) fn write(&mut self, addr: u16, data: u8) {
        self.mem[addr as usize] = data;
    }
}

impl Bus for MockBus {
    fn read(&mut self, addr: u16) -> u8 {
        MockBus::read(self, addr)
    }

    fn write(&mut self, addr: u16, data: u8) {
        MockBus::write(self, addr, data)
    }
}
