use crate::{
    error::Error,
    memory::ppu as ppu_mem,
    ppu::{
        Ppu,
        palette::{FRAME_BYTES, SCREEN_WIDTH, rgb},
    },
};

const TILES_WIDE: usize = 32;
const TILES_HIGH: usize = 30;
const TILE_BYTES: u16 = 16;

impl Ppu {
    /// Draws the background of the selected nametable into `out` as packed
    /// RGB24, 256x240, row-major.
    ///
    /// Pure with respect to PPU state: registers, timers and memory are left
    /// untouched. Pixels with pattern value 0 are drawn black.
    pub fn render_frame(&self, out: &mut [u8]) -> Result<(), Error> {
        if out.len() < FRAME_BYTES {
            return Err(Error::FrameBufferTooSmall {
                expected: FRAME_BYTES,
                actual: out.len(),
            });
        }

        let nametable = self.registers.control.base_nametable_addr();
        let attributes = nametable + ppu_mem::NAMETABLE_TILES as u16;
        let pattern_table = self.registers.control.background_pattern_table();

        for ty in 0..TILES_HIGH {
            for tx in 0..TILES_WIDE {
                let tile = self.vram.read(nametable + (ty * TILES_WIDE + tx) as u16) as u16;
                let attr_byte = self
                    .vram
                    .read(attributes + ((ty / 4) * 8 + tx / 4) as u16);
                let shift = ((ty % 4) / 2) * 4 + ((tx % 4) / 2) * 2;
                let palette = (attr_byte >> shift) & 0x03;

                for row in 0..8u16 {
                    let addr = pattern_table + tile * TILE_BYTES + row;
                    let lo = self.vram.read(addr);
                    let hi = self.vram.read(addr + 8);
                    for col in 0..8 {
                        let bit = 7 - col;
                        let pixel = ((lo >> bit) & 1) | (((hi >> bit) & 1) << 1);
                        let color = if pixel == 0 {
                            [0, 0, 0]
                        } else {
                            rgb(((palette << 2) | pixel) as usize)
                        };
                        let x = tx * 8 + col;
                        let y = ty * 8 + row as usize;
                        let offset = (y * SCREEN_WIDTH + x) * 3;
                        out[offset..offset + 3].copy_from_slice(&color);
                    }
                }
            }
        }
        Ok(())
    }
}
