//! CPU-side bus plumbing.
//!
//! [`CpuMemory`] owns the CPU-visible address space and the write-observer
//! registry. [`cpu::CpuBus`] borrows it together with the PPU for the duration
//! of one step and counts every access as one CPU cycle.

use std::collections::BTreeMap;

use crate::{
    address_space::{AddressSpace, Port},
    error::Error,
    memory::cpu as cpu_mem,
    memory::ppu as ppu_mem,
};

pub mod cpu;
#[cfg(test)]
pub(crate) mod mock;
pub mod observer;

pub use observer::{FrameIrqTrigger, OamDmaTrigger, Signal, WriteObserver};

/// Expose the CPU stack page start address for stack helpers.
pub(crate) const STACK_ADDR: u16 = cpu_mem::STACK_PAGE_START;

/// Timed CPU bus.
///
/// Every call to [`Bus::read`] or [`Bus::write`] is one CPU cycle, including
/// the dummy accesses performed by addressing modes. Instruction timing is the
/// number of accesses an instruction makes.
pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;

    fn write(&mut self, addr: u16, value: u8);

    /// Untimed, side-effect-free read used for vector fetches during reset.
    fn peek(&mut self, addr: u16) -> u8;

    /// Total CPU cycles elapsed on this bus.
    fn cycles(&self) -> u64;
}

// Allow mutable references to Bus implementors to be used wherever a Bus is
// expected.
impl<T: Bus + ?Sized> Bus for &mut T {
    fn read(&mut self, addr: u16) -> u8 {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        (**self).write(addr, value)
    }

    fn peek(&mut self, addr: u16) -> u8 {
        (**self).peek(addr)
    }

    fn cycles(&self) -> u64 {
        (**self).cycles()
    }
}

/// The 64 KiB CPU-visible address space plus its write observers.
///
/// Layout:
/// - `$0000-$1FFF`: 2 KiB internal RAM mirrored 4 times
/// - `$2000-$3FFF`: the 8 PPU registers mirrored 1024 times (port window)
/// - `$4000-$5FFF`: APU / I/O / expansion window, plain storage
/// - `$6000-$7FFF`: cartridge save RAM
/// - `$8000-$BFFF`, `$C000-$FFFF`: the two program banks
#[derive(Debug, Clone)]
pub struct CpuMemory {
    space: AddressSpace,
    observers: BTreeMap<u16, Box<dyn WriteObserver>>,
}

impl CpuMemory {
    /// Assembles the CPU map around two 16 KiB program banks.
    pub fn new(prg_lower: Vec<u8>, prg_upper: Vec<u8>) -> Result<Self, Error> {
        for bank in [&prg_lower, &prg_upper] {
            if bank.len() != cpu_mem::PRG_BANK_SIZE {
                return Err(Error::UnsupportedPrgSize { actual: bank.len() });
            }
        }

        let ram = AddressSpace::block(cpu_mem::INTERNAL_RAM_START, cpu_mem::INTERNAL_RAM_SIZE)?;
        let registers = AddressSpace::port(ppu_mem::REGISTER_BASE, ppu_mem::REGISTER_COUNT)?;
        let space = AddressSpace::composite(vec![
            AddressSpace::mirrored(ram, cpu_mem::INTERNAL_RAM_MIRRORS)?,
            AddressSpace::mirrored(registers, cpu_mem::PPU_REGISTER_MIRRORS)?,
            AddressSpace::block(cpu_mem::EXPANSION_START, cpu_mem::EXPANSION_SIZE)?,
            AddressSpace::block(cpu_mem::PRG_RAM_START, cpu_mem::PRG_RAM_SIZE)?,
            AddressSpace::block_with(cpu_mem::PRG_ROM_LOWER, prg_lower)?,
            AddressSpace::block_with(cpu_mem::PRG_ROM_UPPER, prg_upper)?,
        ])?;

        Ok(Self {
            space,
            observers: BTreeMap::new(),
        })
    }

    /// Attaches `observer` to the exact address `addr`, replacing and
    /// returning any observer already registered there.
    pub fn add_observer(
        &mut self,
        addr: u16,
        observer: Box<dyn WriteObserver>,
    ) -> Option<Box<dyn WriteObserver>> {
        self.observers.insert(addr, observer)
    }

    pub fn read(&self, addr: u16, port: &mut dyn Port) -> u8 {
        self.space.read_via(addr, port)
    }

    /// Commits the write, then notifies the observer registered at `addr`.
    pub fn write(&mut self, addr: u16, value: u8, port: &mut dyn Port) -> Option<Signal> {
        self.space.write_via(addr, value, port);
        self.observers
            .get_mut(&addr)
            .and_then(|observer| observer.on_write(value))
    }

    /// Untimed read that never reaches a port. Port windows read as `None`.
    pub fn peek(&self, addr: u16) -> Option<u8> {
        let registers = cpu_mem::PPU_REGISTER_BASE..cpu_mem::EXPANSION_START;
        if registers.contains(&addr) {
            None
        } else {
            Some(self.space.read(addr))
        }
    }

    /// Zeroes internal RAM and the save RAM window.
    pub(crate) fn clear_ram(&mut self) {
        for addr in 0..cpu_mem::INTERNAL_RAM_SIZE as u16 {
            self.space.write(addr, 0);
        }
        for offset in 0..cpu_mem::PRG_RAM_SIZE as u16 {
            self.space.write(cpu_mem::PRG_RAM_START + offset, 0);
        }
    }

    pub fn space(&self) -> &AddressSpace {
        &self.space
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Registers {
        writes: Vec<(u16, u8)>,
    }

    impl Port for Registers {
        fn read_port(&mut self, addr: u16) -> u8 {
            (addr & 0x07) as u8
        }

        fn write_port(&mut self, addr: u16, value: u8) {
            self.writes.push((addr, value));
        }
    }

    fn memory() -> CpuMemory {
        let lower = vec![0x11; cpu_mem::PRG_BANK_SIZE];
        let upper = vec![0x22; cpu_mem::PRG_BANK_SIZE];
        CpuMemory::new(lower, upper).expect("cpu memory")
    }

    #[test]
    fn map_covers_the_whole_bus() {
        let memory = memory();
        let range = memory.space().range();
        assert_eq!((range.start(), range.end()), (0x0000, 0x1_0000));
        assert_eq!(memory.peek(0x8000), Some(0x11));
        assert_eq!(memory.peek(0xFFFF), Some(0x22));
        assert_eq!(memory.peek(0x2002), None);
    }

    #[test]
    fn ram_is_mirrored_four_times() {
        let mut memory = memory();
        let mut regs = Registers::default();
        memory.write(0x1803, 0x5C, &mut regs);
        assert_eq!(memory.read(0x0003, &mut regs), 0x5C);
        assert_eq!(memory.read(0x0803, &mut regs), 0x5C);
        assert_eq!(memory.read(0x1003, &mut regs), 0x5C);
    }

    #[test]
    fn ppu_registers_are_mirrored_through_the_port() {
        let mut memory = memory();
        let mut regs = Registers::default();
        memory.write(0x3456, 0x01, &mut regs);
        assert_eq!(regs.writes, vec![(0x2006, 0x01)]);
        assert_eq!(memory.read(0x2FFA, &mut regs), 0x02);
    }

    #[test]
    fn observers_fire_after_the_write_commits() {
        let mut memory = memory();
        let mut regs = Registers::default();
        memory.add_observer(cpu_mem::OAM_DMA, Box::new(OamDmaTrigger));
        memory.add_observer(cpu_mem::FRAME_COUNTER, Box::new(FrameIrqTrigger));

        assert_eq!(
            memory.write(cpu_mem::OAM_DMA, 0x02, &mut regs),
            Some(Signal::StartOamDma { page: 0x02 })
        );
        assert_eq!(memory.peek(cpu_mem::OAM_DMA), Some(0x02));
        assert_eq!(memory.write(cpu_mem::FRAME_COUNTER, 0x40, &mut regs), None);
        assert_eq!(
            memory.write(cpu_mem::FRAME_COUNTER, 0x00, &mut regs),
            Some(Signal::RequestIrq)
        );
        assert_eq!(memory.write(0x4015, 0x00, &mut regs), None);
    }

    #[test]
    fn rejects_odd_sized_banks() {
        let result = CpuMemory::new(vec![0; 0x2000], vec![0; cpu_mem::PRG_BANK_SIZE]);
        assert!(matches!(
            result,
            Err(Error::UnsupportedPrgSize { actual: 0x2000 })
        ));
    }
}
