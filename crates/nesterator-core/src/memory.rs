//! Shared definitions for the NES memory map.
//!
//! Both address spaces are assembled from these constants by
//! [`crate::bus::CpuMemory`] and the PPU's VRAM builder, so every window
//! boundary lives in one place.

/// CPU memory map details.
pub mod cpu {
    /// First address of the hardware stack page.
    pub const STACK_PAGE_START: u16 = 0x0100;

    /// Reset vector low byte address (`$FFFC`).
    pub const RESET_VECTOR_LO: u16 = 0xFFFC;
    /// Reset vector high byte address (`$FFFD`).
    pub const RESET_VECTOR_HI: u16 = 0xFFFD;
    /// NMI vector low byte address (`$FFFA`).
    pub const NMI_VECTOR_LO: u16 = 0xFFFA;
    /// NMI vector high byte address (`$FFFB`).
    pub const NMI_VECTOR_HI: u16 = 0xFFFB;
    /// IRQ/BRK vector low byte address (`$FFFE`).
    pub const IRQ_VECTOR_LO: u16 = 0xFFFE;
    /// IRQ/BRK vector high byte address (`$FFFF`).
    pub const IRQ_VECTOR_HI: u16 = 0xFFFF;

    /// First byte of CPU internal RAM.
    pub const INTERNAL_RAM_START: u16 = 0x0000;
    /// Size of the CPU internal RAM block (2 KiB mirrored through `$1FFF`).
    pub const INTERNAL_RAM_SIZE: usize = 0x0800;
    /// Number of times internal RAM repeats inside `$0000-$1FFF`.
    pub const INTERNAL_RAM_MIRRORS: u32 = 4;

    /// First CPU address mapped to the PPU register mirror.
    pub const PPU_REGISTER_BASE: u16 = 0x2000;
    /// Number of times the 8 PPU registers repeat inside `$2000-$3FFF`.
    pub const PPU_REGISTER_MIRRORS: u32 = 1024;

    /// APU / I/O / expansion window. Present but not backed by any device.
    pub const EXPANSION_START: u16 = 0x4000;
    pub const EXPANSION_SIZE: usize = 0x2000;

    /// OAM DMA trigger register (`$4014`).
    pub const OAM_DMA: u16 = 0x4014;
    /// Frame counter register (`$4017`).
    pub const FRAME_COUNTER: u16 = 0x4017;

    /// PRG RAM window start address (`$6000`).
    pub const PRG_RAM_START: u16 = 0x6000;
    pub const PRG_RAM_SIZE: usize = 0x2000;

    /// Lower PRG ROM window (`$8000-$BFFF`).
    pub const PRG_ROM_LOWER: u16 = 0x8000;
    /// Upper PRG ROM window (`$C000-$FFFF`).
    pub const PRG_ROM_UPPER: u16 = 0xC000;
    /// Size of a single program bank.
    pub const PRG_BANK_SIZE: usize = 0x4000;
}

/// PPU register layout and VRAM mirror rules.
pub mod ppu {
    /// First CPU-visible PPU register address.
    pub const REGISTER_BASE: u16 = 0x2000;
    /// Number of distinct registers before mirroring repeats.
    pub const REGISTER_COUNT: usize = 8;
    /// Mask for decoding register mirrors (`addr & 0x0007`).
    pub const REGISTER_SELECT_MASK: u16 = 0x0007;

    /// Pattern table base address for table 0.
    pub const PATTERN_TABLE_0: u16 = 0x0000;
    /// Pattern table base address for table 1.
    pub const PATTERN_TABLE_1: u16 = 0x1000;
    /// Total size of both pattern tables ($0000-$1FFF = 8 KiB).
    pub const CHR_SIZE: usize = 0x2000;

    /// Base address of nametable 0.
    pub const NAMETABLE_BASE: u16 = 0x2000;
    /// Size of a single nametable (tiles plus attributes).
    pub const NAMETABLE_SIZE: u16 = 0x0400;
    /// Tile index bytes at the start of every nametable.
    pub const NAMETABLE_TILES: usize = 0x03C0;
    /// Attribute bytes closing every nametable.
    pub const ATTRIBUTE_TABLE_SIZE: usize = 0x0040;
    pub const NAMETABLE_COUNT: usize = 4;

    /// Start of the nametable mirror window (`$3000-$3EFF`).
    pub const NAMETABLE_MIRROR_START: u16 = 0x3000;
    pub const NAMETABLE_MIRROR_SIZE: usize = 0x0F00;

    /// Palette RAM base address (`$3F00`).
    pub const PALETTE_BASE: u16 = 0x3F00;
    /// Palette RAM byte count (32 bytes mirrored every 32 bytes).
    pub const PALETTE_RAM_SIZE: usize = 0x20;
    /// Palette repeats 8 times inside `$3F00-$3FFF`.
    pub const PALETTE_MIRRORS: u32 = 8;

    /// The 16 KiB PPU space repeats 4 times across the 16-bit bus.
    pub const VRAM_SIZE: usize = 0x4000;
    pub const VRAM_MIRRORS: u32 = 4;
    /// Address mask applied to the internal VRAM address.
    pub const VRAM_ADDR_MASK: u16 = 0x3FFF;

    /// Primary Object Attribute Memory (OAM) byte count.
    pub const OAM_RAM_SIZE: usize = 0x100;

    /// CPU-visible PPU register identifiers.
    #[repr(u16)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Register {
        /// `$2000` - PPUCTRL
        Control = 0x2000,
        /// `$2001` - PPUMASK
        Mask = 0x2001,
        /// `$2002` - PPUSTATUS
        Status = 0x2002,
        /// `$2003` - OAMADDR
        OamAddr = 0x2003,
        /// `$2004` - OAMDATA
        OamData = 0x2004,
        /// `$2005` - PPUSCROLL
        Scroll = 0x2005,
        /// `$2006` - PPUADDR
        Addr = 0x2006,
        /// `$2007` - PPUDATA
        Data = 0x2007,
    }

    impl Register {
        /// Raw address backing the register.
        pub const fn addr(self) -> u16 {
            self as u16
        }

        /// Resolves the canonical register for a CPU address in `$2000-$3FFF`.
        pub const fn from_cpu_addr(addr: u16) -> Self {
            match addr & REGISTER_SELECT_MASK {
                0 => Self::Control,
                1 => Self::Mask,
                2 => Self::Status,
                3 => Self::OamAddr,
                4 => Self::OamData,
                5 => Self::Scroll,
                6 => Self::Addr,
                _ => Self::Data,
            }
        }
    }
}
