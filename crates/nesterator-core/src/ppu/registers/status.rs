use bitflags::bitflags;

bitflags! {
    /// PPUSTATUS (`$2002`). Only the top three bits are driven; the rest
    /// read back from the open bus.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Status: u8 {
        const SPRITE_OVERFLOW = 0b0010_0000;
        const SPRITE_ZERO_HIT = 0b0100_0000;
        /// Cleared by reading `$2002` and on the pre-render line.
        const VERTICAL_BLANK = 0b1000_0000;
    }
}

impl Status {
    /// Value after power-up and reset.
    pub const fn power_on() -> Self {
        Self::from_bits_truncate(0b1010_0000)
    }
}
