/// Output frame width in pixels.
pub const SCREEN_WIDTH: usize = 256;
/// Output frame height in pixels.
pub const SCREEN_HEIGHT: usize = 240;
/// Bytes in one packed RGB24 frame.
pub const FRAME_BYTES: usize = SCREEN_WIDTH * SCREEN_HEIGHT * 3;

/// Fixed 16-entry hardware palette used by the background renderer, as
/// `0xRRGGBB`. Entries 13 to 15 are all black.
pub const PALETTE: [u32; 16] = [
    0x7C7C7C, 0x0000FC, 0x0000BC, 0x4428BC, 0x940084, 0xA80020, 0xA81000, 0x881400, 0x503000,
    0x007800, 0x006800, 0x005800, 0x004058, 0x000000, 0x000000, 0x000000,
];

/// Splits a palette entry into its RGB bytes.
pub const fn rgb(index: usize) -> [u8; 3] {
    let color = PALETTE[index & 0x0F];
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_channels() {
        assert_eq!(rgb(0), [0x7C, 0x7C, 0x7C]);
        assert_eq!(rgb(3), [0x44, 0x28, 0xBC]);
        assert_eq!(rgb(15), [0, 0, 0]);
        assert_eq!(rgb(0x11), rgb(1));
    }
}
