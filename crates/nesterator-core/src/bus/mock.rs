use crate::bus::Bus;

/// One observed bus access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Read(u16),
    Write(u16, u8),
}

/// Flat 64 KiB RAM bus that records every access.
#[derive(Debug)]
pub(crate) struct MockBus {
    pub(crate) mem: Box<[u8]>,
    pub(crate) cycles: u64,
    pub(crate) log: Vec<Access>,
}

impl Default for MockBus {
    fn default() -> Self {
        Self {
            mem: vec![0; 0x1_0000].into_boxed_slice(),
            cycles: 0,
            log: Vec::new(),
        }
    }
}

impl MockBus {
    /// Places `program` at `origin` and points the reset vector at it.
    pub(crate) fn with_program(origin: u16, program: &[u8]) -> Self {
        let mut bus = Self::default();
        bus.load(origin, program);
        bus.load(0xFFFC, &origin.to_le_bytes());
        bus
    }

    pub(crate) fn load(&mut self, addr: u16, bytes: &[u8]) {
        let start = addr as usize;
        self.mem[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub(crate) fn writes(&self) -> Vec<(u16, u8)> {
        self.log
            .iter()
            .filter_map(|access| match *access {
                Access::Write(addr, value) => Some((addr, value)),
                Access::Read(_) => None,
            })
            .collect()
    }
}

impl Bus for MockBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.cycles += 1;
        self.log.push(Access::Read(addr));
        self.mem[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.cycles += 1;
        self.log.push(Access::Write(addr, value));
        self.mem[addr as usize] = value;
    }

    fn peek(&mut self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    fn cycles(&self) -> u64 {
        self.cycles
    }
}
