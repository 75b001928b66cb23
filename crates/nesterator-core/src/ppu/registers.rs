//! CPU-visible PPU register file.

mod control;
mod mask;
mod status;

pub use control::Control;
pub use mask::Mask;
pub use status::Status;

/// Latched state behind `$2000-$2007`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Registers {
    pub(crate) control: Control,
    pub(crate) mask: Mask,
    pub(crate) status: Status,
    /// OAMADDR, the `$2004` pointer.
    pub(crate) oam_addr: u8,
    /// VRAM pointer used by `$2007`, 14 bits wide.
    pub(crate) vram_addr: u16,
    /// Shared `$2005`/`$2006` toggle: `false` before the first write.
    pub(crate) second_write: bool,
    /// Delayed `$2007` read buffer.
    pub(crate) read_buffer: u8,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    pub(crate) fn new() -> Self {
        Self {
            control: Control::default(),
            mask: Mask::default(),
            status: Status::power_on(),
            oam_addr: 0,
            vram_addr: 0,
            second_write: false,
            read_buffer: 0,
        }
    }

    /// Flips the shared write toggle, returning whether this was the first
    /// half of the pair.
    pub(crate) fn toggle(&mut self) -> bool {
        let first = !self.second_write;
        self.second_write = first;
        first
    }
}
