//! Picture Processing Unit (PPU).
//!
//! The PPU exposes eight CPU-facing registers between `$2000` and `$2007`,
//! mirrored up to `$3FFF`. The CPU reaches them through the
//! [`Port`](crate::address_space::Port) window of its address space, so the
//! register file stays owned here.
//!
//! Timing follows the conventional numbering: line `-1` is the pre-render
//! line, `0..=239` are visible, `240` is post-render and `241..=260` are
//! vertical blank. Every line has 341 dots and dot 0 is idle.

pub mod palette;

mod open_bus;
mod registers;
mod render;
mod vram;

use core::fmt;

use crate::{
    address_space::{AddressSpace, Port},
    clock,
    config::ResetKind,
    error::Error,
    memory::ppu::{self as ppu_mem, Register as PpuRegister},
};
pub use open_bus::DECAY_DOTS;
pub use registers::{Control, Mask, Status};
use open_bus::OpenBus;
use registers::Registers;

const DOTS_PER_SCANLINE: u16 = clock::DOTS_PER_SCANLINE as u16;
const PRE_RENDER_LINE: i16 = -1;
const POST_RENDER_LINE: i16 = 240;
const VBLANK_LINE: i16 = 241;
const LAST_LINE: i16 = PRE_RENDER_LINE + clock::SCANLINES_PER_FRAME as i16 - 1;

/// Register bits driven by a `$2002` read.
const STATUS_BITS: u8 = 0xE0;
/// Register bits driven by a palette read through `$2007`.
const PALETTE_BITS: u8 = 0x3F;

#[derive(Clone, PartialEq, Eq)]
pub struct Ppu {
    registers: Registers,
    open_bus: OpenBus,
    /// Pattern tables, nametables and palette RAM as one address space.
    vram: AddressSpace,
    /// Primary sprite memory reached through `$2003/$2004` and OAM DMA.
    oam: [u8; ppu_mem::OAM_RAM_SIZE],
    /// Current dot (0..=340) within the active scanline.
    dot: u16,
    /// Current scanline. `-1` is the pre-render line.
    scanline: i16,
    /// Completed frames since power-on.
    frame: u64,
    /// NMI edge waiting to be collected by the CPU.
    nmi_pending: bool,
    skip_odd_frame_dot: bool,
}

impl fmt::Debug for Ppu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ppu")
            .field("registers", &self.registers)
            .field("open_bus", &self.open_bus)
            .field("dot", &self.dot)
            .field("scanline", &self.scanline)
            .field("frame", &self.frame)
            .field("nmi_pending", &self.nmi_pending)
            .finish()
    }
}

impl Ppu {
    /// Creates a PPU with cleared memory and power-on register values.
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            registers: Registers::new(),
            open_bus: OpenBus::new(),
            vram: vram::build()?,
            oam: [0; ppu_mem::OAM_RAM_SIZE],
            dot: 0,
            scanline: PRE_RENDER_LINE,
            frame: 0,
            nmi_pending: false,
            skip_odd_frame_dot: false,
        })
    }

    /// Returns registers, timing and the bus latch to their initial values.
    /// A power-on reset also clears nametables, palette RAM and OAM; pattern
    /// tables keep the cartridge's CHR data.
    pub fn reset(&mut self, kind: ResetKind) {
        self.registers = Registers::new();
        self.open_bus = OpenBus::new();
        self.dot = 0;
        self.scanline = PRE_RENDER_LINE;
        self.frame = 0;
        self.nmi_pending = false;
        if kind == ResetKind::PowerOn {
            self.oam.fill(0);
            let nametables = ppu_mem::NAMETABLE_BASE..ppu_mem::NAMETABLE_MIRROR_START;
            let palette = ppu_mem::PALETTE_BASE
                ..ppu_mem::PALETTE_BASE + ppu_mem::PALETTE_RAM_SIZE as u16;
            for addr in nametables.chain(palette) {
                self.vram.write(addr, 0);
            }
        }
    }

    pub fn set_skip_odd_frame_dot(&mut self, enabled: bool) {
        self.skip_odd_frame_dot = enabled;
    }

    /// Copies character ROM into the pattern tables.
    pub(crate) fn load_chr(&mut self, chr: &[u8]) {
        self.vram.load(ppu_mem::PATTERN_TABLE_0, chr);
    }

    /// Advances the PPU by a single dot.
    pub fn clock(&mut self) {
        self.open_bus.tick();

        match (self.scanline, self.dot) {
            (PRE_RENDER_LINE, 1) => {
                self.registers.status.remove(
                    Status::VERTICAL_BLANK | Status::SPRITE_ZERO_HIT | Status::SPRITE_OVERFLOW,
                );
            }
            (VBLANK_LINE, 1) => {
                self.registers.status.insert(Status::VERTICAL_BLANK);
                if self.registers.control.nmi_enabled() {
                    self.nmi_pending = true;
                }
            }
            _ => {}
        }

        // Sprite evaluation reloads OAMADDR on every rendered line.
        if self.scanline <= POST_RENDER_LINE && (257..=320).contains(&self.dot) {
            self.registers.oam_addr = 0;
        }

        self.dot += 1;
        if self.scanline == PRE_RENDER_LINE
            && self.dot == DOTS_PER_SCANLINE - 1
            && self.skip_odd_frame_dot
            && self.frame % 2 == 1
            && self.registers.mask.rendering_enabled()
        {
            self.dot = DOTS_PER_SCANLINE;
        }
        if self.dot >= DOTS_PER_SCANLINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline > LAST_LINE {
                self.scanline = PRE_RENDER_LINE;
                self.frame += 1;
            }
        }
    }

    /// Advances the PPU by `dots` dots.
    pub fn clock_n(&mut self, dots: u64) {
        for _ in 0..dots {
            self.clock();
        }
    }

    /// Collects the pending NMI edge, if any.
    pub fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi_pending)
    }

    /// What a CPU read of `addr` would return, without its side effects.
    pub fn peek_register(&self, addr: u16) -> u8 {
        let bus = self.open_bus.value();
        match PpuRegister::from_cpu_addr(addr) {
            PpuRegister::Status => (self.registers.status.bits() & STATUS_BITS) | (bus & !STATUS_BITS),
            PpuRegister::OamData => self.oam_data(),
            PpuRegister::Data => {
                let addr = self.registers.vram_addr & ppu_mem::VRAM_ADDR_MASK;
                if addr < ppu_mem::PALETTE_BASE {
                    self.registers.read_buffer
                } else {
                    (self.vram.read(addr) & PALETTE_BITS) | (bus & !PALETTE_BITS)
                }
            }
            _ => bus,
        }
    }

    pub fn scanline(&self) -> i16 {
        self.scanline
    }

    pub fn dot(&self) -> u16 {
        self.dot
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn control(&self) -> Control {
        self.registers.control
    }

    pub fn mask(&self) -> Mask {
        self.registers.mask
    }

    pub fn status(&self) -> Status {
        self.registers.status
    }

    pub fn open_bus(&self) -> u8 {
        self.open_bus.value()
    }

    pub fn vram_addr(&self) -> u16 {
        self.registers.vram_addr
    }

    pub fn oam(&self) -> &[u8; ppu_mem::OAM_RAM_SIZE] {
        &self.oam
    }

    pub fn oam_mut(&mut self) -> &mut [u8; ppu_mem::OAM_RAM_SIZE] {
        &mut self.oam
    }

    pub fn memory(&self) -> &AddressSpace {
        &self.vram
    }

    pub fn memory_mut(&mut self) -> &mut AddressSpace {
        &mut self.vram
    }

    fn oam_data(&self) -> u8 {
        let addr = self.registers.oam_addr;
        let value = self.oam[addr as usize];
        // Attribute bytes have no storage for bits 2-4.
        if addr % 4 == 2 { value & 0xE3 } else { value }
    }

    fn rendering_line(&self) -> bool {
        self.scanline < POST_RENDER_LINE && self.registers.mask.rendering_enabled()
    }

    fn increment_vram_addr(&mut self) {
        let step = self.registers.control.vram_increment();
        self.registers.vram_addr =
            self.registers.vram_addr.wrapping_add(step) & ppu_mem::VRAM_ADDR_MASK;
    }

    fn read_status(&mut self) -> u8 {
        self.open_bus.refresh(STATUS_BITS);
        let value =
            (self.registers.status.bits() & STATUS_BITS) | (self.open_bus.value() & !STATUS_BITS);
        self.registers.status.remove(Status::VERTICAL_BLANK);
        self.registers.second_write = false;
        value
    }

    fn read_oam(&mut self) -> u8 {
        self.open_bus.refresh(0xFF);
        self.oam_data()
    }

    fn read_data(&mut self) -> u8 {
        let addr = self.registers.vram_addr & ppu_mem::VRAM_ADDR_MASK;
        let value = if addr < ppu_mem::PALETTE_BASE {
            self.open_bus.refresh(0xFF);
            std::mem::replace(&mut self.registers.read_buffer, self.vram.read(addr))
        } else {
            // Palette reads bypass the buffer for the low six bits.
            self.open_bus.refresh(PALETTE_BITS);
            self.registers.read_buffer = self.vram.read(addr);
            (self.registers.read_buffer & PALETTE_BITS) | (self.open_bus.value() & !PALETTE_BITS)
        };
        self.increment_vram_addr();
        value
    }

    fn write_control(&mut self, value: u8) {
        let was_enabled = self.registers.control.nmi_enabled();
        self.registers.control = Control::from_bits_retain(value);
        if !was_enabled
            && self.registers.control.nmi_enabled()
            && self.registers.status.contains(Status::VERTICAL_BLANK)
        {
            self.nmi_pending = true;
        }
    }

    fn write_oam(&mut self, value: u8) {
        if self.rendering_line() {
            return;
        }
        self.oam[self.registers.oam_addr as usize] = value;
        self.registers.oam_addr = self.registers.oam_addr.wrapping_add(1);
    }

    /// Scroll is not rendered; the write only advances the shared toggle.
    fn write_scroll(&mut self) {
        self.registers.toggle();
    }

    fn write_addr(&mut self, value: u8) {
        let addr = self.registers.vram_addr;
        self.registers.vram_addr = if self.registers.toggle() {
            (((value & 0x3F) as u16) << 8) | (addr & 0x00FF)
        } else {
            (addr & 0xFF00) | value as u16
        };
    }

    fn write_data(&mut self, value: u8) {
        let addr = self.registers.vram_addr & ppu_mem::VRAM_ADDR_MASK;
        self.vram.write(addr, value);
        self.increment_vram_addr();
    }
}

impl Port for Ppu {
    /// CPU reads from `$2000-$3FFF`. Write-only registers return the open bus.
    fn read_port(&mut self, addr: u16) -> u8 {
        let value = match PpuRegister::from_cpu_addr(addr) {
            PpuRegister::Status => self.read_status(),
            PpuRegister::OamData => self.read_oam(),
            PpuRegister::Data => self.read_data(),
            _ => self.open_bus.value(),
        };
        self.open_bus.latch(value);
        value
    }

    /// CPU writes to `$2000-$3FFF`. Every write drives the whole bus.
    fn write_port(&mut self, addr: u16, value: u8) {
        self.open_bus.drive(value);
        match PpuRegister::from_cpu_addr(addr) {
            PpuRegister::Control => self.write_control(value),
            PpuRegister::Mask => self.registers.mask = Mask::from_bits_retain(value),
            PpuRegister::Status => {}
            PpuRegister::OamAddr => self.registers.oam_addr = value,
            PpuRegister::OamData => self.write_oam(value),
            PpuRegister::Scroll => self.write_scroll(),
            PpuRegister::Addr => self.write_addr(value),
            PpuRegister::Data => self.write_data(value),
        }
    }
}
