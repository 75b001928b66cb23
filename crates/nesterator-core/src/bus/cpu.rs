use crate::{
    bus::{Bus, CpuMemory, Signal},
    ppu::Ppu,
};

/// CPU-side bus view borrowing the hardware for one step.
///
/// Reads and writes go through [`CpuMemory`] with the PPU attached as the
/// register port. Signals raised by write observers are queued for the
/// machine to apply once the step completes.
#[derive(Debug)]
pub struct CpuBus<'a> {
    memory: &'a mut CpuMemory,
    ppu: &'a mut Ppu,
    cycles: &'a mut u64,
    signals: &'a mut Vec<Signal>,
}

impl<'a> CpuBus<'a> {
    pub fn new(
        memory: &'a mut CpuMemory,
        ppu: &'a mut Ppu,
        cycles: &'a mut u64,
        signals: &'a mut Vec<Signal>,
    ) -> Self {
        Self {
            memory,
            ppu,
            cycles,
            signals,
        }
    }
}

impl Bus for CpuBus<'_> {
    fn read(&mut self, addr: u16) -> u8 {
        *self.cycles += 1;
        self.memory.read(addr, &mut *self.ppu)
    }

    fn write(&mut self, addr: u16, value: u8) {
        *self.cycles += 1;
        if let Some(signal) = self.memory.write(addr, value, &mut *self.ppu) {
            self.signals.push(signal);
        }
    }

    fn peek(&mut self, addr: u16) -> u8 {
        match self.memory.peek(addr) {
            Some(value) => value,
            None => self.ppu.peek_register(addr),
        }
    }

    fn cycles(&self) -> u64 {
        *self.cycles
    }
}
