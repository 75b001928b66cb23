use crate::{address_space::AddressSpace, error::Error, memory::ppu as ppu_mem};

/// Builds the PPU-visible bus:
///
/// - `$0000-$1FFF`: pattern tables (CHR)
/// - `$2000-$2FFF`: four nametables, each 960 tile bytes plus 64 attribute bytes
/// - `$3000-$3EFF`: alias of `$2000-$2EFF`
/// - `$3F00-$3FFF`: 32 bytes of palette RAM mirrored 8 times
///
/// The 16 KiB result is itself mirrored up to `$FFFF`.
pub(crate) fn build() -> Result<AddressSpace, Error> {
    let mut children = vec![AddressSpace::block(
        ppu_mem::PATTERN_TABLE_0,
        ppu_mem::CHR_SIZE,
    )?];

    for index in 0..ppu_mem::NAMETABLE_COUNT as u16 {
        let start = ppu_mem::NAMETABLE_BASE + index * ppu_mem::NAMETABLE_SIZE;
        let attributes = start + ppu_mem::NAMETABLE_TILES as u16;
        children.push(AddressSpace::composite(vec![
            AddressSpace::block(start, ppu_mem::NAMETABLE_TILES)?,
            AddressSpace::block(attributes, ppu_mem::ATTRIBUTE_TABLE_SIZE)?,
        ])?);
    }

    children.push(AddressSpace::mirror_of(
        ppu_mem::NAMETABLE_BASE,
        ppu_mem::NAMETABLE_MIRROR_START,
        ppu_mem::NAMETABLE_MIRROR_SIZE,
    )?);
    children.push(AddressSpace::mirrored(
        AddressSpace::block(ppu_mem::PALETTE_BASE, ppu_mem::PALETTE_RAM_SIZE)?,
        ppu_mem::PALETTE_MIRRORS,
    )?);

    AddressSpace::mirrored(AddressSpace::composite(children)?, ppu_mem::VRAM_MIRRORS)
}
