//! Cycle-counting NES hardware core: 6502 CPU, PPU background pipeline,
//! OAM DMA and the composable address spaces that wire them together.
//!
//! [`Nes`] is the system clock. It runs the CPU one instruction at a time
//! (or one DMA step while a transfer is active), then advances the PPU by
//! three dots per elapsed CPU cycle and forwards any NMI edge back to the CPU.

use core::fmt;

use crate::{
    bus::{CpuMemory, FrameIrqTrigger, OamDmaTrigger, Signal, WriteObserver, cpu::CpuBus},
    cartridge::Cartridge,
    cpu::Cpu,
    dma::OamDma,
    memory::{cpu as cpu_mem, ppu as ppu_mem},
    ppu::{Ppu, palette::FRAME_BYTES},
};

pub mod address_space;
pub mod bus;
pub mod cartridge;
pub mod clock;
pub mod config;
pub mod cpu;
pub mod dma;
pub mod error;
pub mod memory;
pub mod ppu;

pub use config::{Config, ResetKind};
pub use cpu::{CpuSnapshot, TraceLine};
pub use error::Error;
pub use ppu::palette::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// One emulated console: CPU, PPU, DMA engine and the CPU-side bus.
#[derive(Clone)]
pub struct Nes {
    cpu: Cpu,
    ppu: Ppu,
    dma: OamDma,
    memory: CpuMemory,
    config: Config,
    /// CPU cycles since power-on.
    cycles: u64,
    /// Observer signals raised during the current step.
    signals: Vec<Signal>,
    frame: Box<[u8]>,
}

impl fmt::Debug for Nes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nes")
            .field("cpu", &self.cpu)
            .field("ppu", &self.ppu)
            .field("dma", &self.dma)
            .field("config", &self.config)
            .field("cycles", &self.cycles)
            .finish()
    }
}

impl Nes {
    /// Powers on a machine around raw PRG (16 or 32 KiB) and CHR (0 or 8 KiB)
    /// data with the default configuration.
    pub fn new(prg_rom: &[u8], chr_rom: &[u8]) -> Result<Self, Error> {
        Self::with_config(prg_rom, chr_rom, Config::default())
    }

    pub fn with_config(prg_rom: &[u8], chr_rom: &[u8], config: Config) -> Result<Self, Error> {
        let (lower, upper) = match prg_rom.len() {
            cpu_mem::PRG_BANK_SIZE => (prg_rom.to_vec(), prg_rom.to_vec()),
            len if len == 2 * cpu_mem::PRG_BANK_SIZE => {
                let (lower, upper) = prg_rom.split_at(cpu_mem::PRG_BANK_SIZE);
                (lower.to_vec(), upper.to_vec())
            }
            actual => return Err(Error::UnsupportedPrgSize { actual }),
        };
        if !matches!(chr_rom.len(), 0 | ppu_mem::CHR_SIZE) {
            return Err(Error::UnsupportedChrSize {
                actual: chr_rom.len(),
            });
        }

        let mut memory = CpuMemory::new(lower, upper)?;
        memory.add_observer(cpu_mem::OAM_DMA, Box::new(OamDmaTrigger));
        memory.add_observer(cpu_mem::FRAME_COUNTER, Box::new(FrameIrqTrigger));

        let mut ppu = Ppu::new()?;
        ppu.set_skip_odd_frame_dot(config.skip_odd_frame_dot);
        ppu.load_chr(chr_rom);

        let mut cpu = Cpu::new();
        cpu.set_trace_enabled(config.trace_cpu);

        let mut nes = Self {
            cpu,
            ppu,
            dma: OamDma::new(),
            memory,
            config,
            cycles: 0,
            signals: Vec::new(),
            frame: vec![0; FRAME_BYTES].into_boxed_slice(),
        };
        nes.reset(ResetKind::PowerOn);
        Ok(nes)
    }

    pub fn from_cartridge(cartridge: &Cartridge, config: Config) -> Result<Self, Error> {
        Self::with_config(cartridge.prg_rom(), cartridge.chr(), config)
    }

    /// Applies a reset. Power-on clears RAM, OAM, nametables and palette and
    /// zeroes the cycle counter; a soft reset keeps memory and the counter.
    pub fn reset(&mut self, kind: ResetKind) {
        if kind == ResetKind::PowerOn {
            self.memory.clear_ram();
            self.cycles = 0;
        }
        self.ppu.reset(kind);
        self.dma = OamDma::new();
        self.signals.clear();
        let mut bus = CpuBus::new(
            &mut self.memory,
            &mut self.ppu,
            &mut self.cycles,
            &mut self.signals,
        );
        self.cpu.reset(kind, &mut bus);
    }

    /// Runs one CPU instruction (or one DMA step), then the matching PPU
    /// dots. Returns the CPU cycles consumed.
    pub fn step(&mut self) -> u8 {
        let cycles = if self.dma.is_active() {
            let memory = &self.memory;
            let ppu = &mut self.ppu;
            let taken = self.dma.step(self.cycles, |src, offset| {
                let value = memory.read(src, &mut *ppu);
                ppu.oam_mut()[offset as usize] = value;
            });
            self.cycles += taken as u64;
            taken
        } else {
            let mut bus = CpuBus::new(
                &mut self.memory,
                &mut self.ppu,
                &mut self.cycles,
                &mut self.signals,
            );
            self.cpu.step(&mut bus)
        };

        for signal in std::mem::take(&mut self.signals) {
            match signal {
                Signal::StartOamDma { page } => self.dma.start(page),
                Signal::RequestIrq => self.cpu.request_irq(),
            }
        }

        self.ppu.clock_n(clock::ppu_dots_for(cycles as u64));
        if self.ppu.take_nmi() {
            self.cpu.signal_nmi();
        }
        cycles
    }

    /// Steps until at least `budget` CPU cycles have elapsed. The last
    /// instruction always completes, so the result may overshoot the budget.
    pub fn run_cycles(&mut self, budget: u64) -> u64 {
        let mut elapsed = 0;
        while elapsed < budget {
            elapsed += self.step() as u64;
        }
        elapsed
    }

    /// Advances emulated time by `seconds` of wall time.
    pub fn advance(&mut self, seconds: f64) -> u64 {
        self.run_cycles(clock::cpu_cycles_for(seconds))
    }

    /// Steps until the PPU starts its next frame. Returns the CPU cycles run.
    pub fn run_frame(&mut self) -> u64 {
        let frame = self.ppu.frame_count();
        let mut elapsed = 0;
        while self.ppu.frame_count() == frame {
            elapsed += self.step() as u64;
        }
        elapsed
    }

    /// Renders the background into the internal frame buffer and returns it
    /// as packed RGB24.
    pub fn frame(&mut self) -> Result<&[u8], Error> {
        self.ppu.render_frame(&mut self.frame)?;
        Ok(&self.frame)
    }

    /// Renders the background into a caller-owned RGB24 buffer.
    pub fn render_frame(&self, out: &mut [u8]) -> Result<(), Error> {
        self.ppu.render_frame(out)
    }

    pub fn cpu_cycles(&self) -> u64 {
        self.cycles
    }

    pub fn cpu_snapshot(&self) -> CpuSnapshot {
        self.cpu.snapshot()
    }

    pub fn set_cpu_snapshot(&mut self, snapshot: CpuSnapshot) {
        self.cpu.restore(snapshot);
    }

    /// Reads a CPU-visible byte without cycles or register side effects.
    pub fn peek_cpu_byte(&self, addr: u16) -> u8 {
        match self.memory.peek(addr) {
            Some(value) => value,
            None => self.ppu.peek_register(addr),
        }
    }

    pub fn set_trace_enabled(&mut self, enabled: bool) {
        self.config.trace_cpu = enabled;
        self.cpu.set_trace_enabled(enabled);
    }

    pub fn last_trace(&self) -> Option<&TraceLine> {
        self.cpu.last_trace()
    }

    /// Registers a host observer for writes to `addr`, returning the one it
    /// replaces. Replacing `$4014` or `$4017` disables the built-in trigger.
    pub fn add_write_observer(
        &mut self,
        addr: u16,
        observer: Box<dyn WriteObserver>,
    ) -> Option<Box<dyn WriteObserver>> {
        self.memory.add_observer(addr, observer)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn ppu_mut(&mut self) -> &mut Ppu {
        &mut self.ppu
    }

    pub fn dma(&self) -> &OamDma {
        &self.dma
    }

    pub fn memory(&self) -> &CpuMemory {
        &self.memory
    }
}
