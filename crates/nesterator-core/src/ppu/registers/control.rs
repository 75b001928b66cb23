use bitflags::bitflags;

use crate::memory::ppu as ppu_mem;

bitflags! {
    /// PPUCTRL (`$2000`).
    ///
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// N M S B s I n n
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Control: u8 {
        /// Base nametable select: `$2000`, `$2400`, `$2800` or `$2C00`.
        const NAMETABLE = 0b0000_0011;

        /// `$2007` accesses step by 32 (down one tile row) instead of 1.
        const INCREMENT_32 = 0b0000_0100;

        /// Sprite pattern table for 8x8 sprites: `$0000` or `$1000`.
        const SPRITE_TABLE = 0b0000_1000;

        /// Background pattern table: `$0000` or `$1000`.
        const BACKGROUND_TABLE = 0b0001_0000;

        const SPRITE_SIZE_16 = 0b0010_0000;

        const MASTER_SLAVE = 0b0100_0000;

        /// Raise NMI at the start of vertical blank.
        const GENERATE_NMI = 0b1000_0000;
    }
}

impl Control {
    pub fn base_nametable_addr(self) -> u16 {
        ppu_mem::NAMETABLE_BASE + (self.bits() as u16 & 0b11) * ppu_mem::NAMETABLE_SIZE
    }

    pub fn vram_increment(self) -> u16 {
        if self.contains(Control::INCREMENT_32) {
            32
        } else {
            1
        }
    }

    pub fn background_pattern_table(self) -> u16 {
        if self.contains(Control::BACKGROUND_TABLE) {
            ppu_mem::PATTERN_TABLE_1
        } else {
            ppu_mem::PATTERN_TABLE_0
        }
    }

    pub fn nmi_enabled(self) -> bool {
        self.contains(Control::GENERATE_NMI)
    }
}
