use thiserror::Error;

use crate::cartridge::HEADER_LEN;

#[derive(Debug, Error)]
pub enum Error {
    /// Provided buffer is shorter than the 16-byte header.
    #[error("header expected {HEADER_LEN} bytes, got {actual}")]
    HeaderTooShort { actual: usize },

    /// Magic number ("NES<EOF>") is missing.
    #[error("missing NES magic bytes")]
    InvalidMagic,

    /// A ROM section (trainer/PRG/CHR) is shorter than advertised.
    #[error("{section} section expected {expected} bytes, got {actual}")]
    SectionTooShort {
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Only one or two 16 KiB program banks can be mapped without a mapper.
    #[error("unsupported PRG ROM size: {actual} bytes (expected 16 KiB or 32 KiB)")]
    UnsupportedPrgSize { actual: usize },

    /// Pattern tables hold at most one 8 KiB character bank.
    #[error("unsupported CHR ROM size: {actual} bytes (expected 0 or 8 KiB)")]
    UnsupportedChrSize { actual: usize },

    #[error("invalid address range [{start:#06x}, {end:#06x})")]
    InvalidRange { start: u32, end: u32 },

    #[error("composite address space needs at least one child")]
    EmptyComposite,

    /// Composite children must tile their window without gaps or overlaps.
    #[error("composite children are not contiguous: expected start {expected:#06x}, got {actual:#06x}")]
    NonContiguous { expected: u32, actual: u32 },

    #[error("invalid mirror: {reason}")]
    InvalidMirror { reason: &'static str },

    #[error("frame buffer too small (expected {expected} bytes, got {actual})")]
    FrameBufferTooSmall { expected: usize, actual: usize },

    /// Wrapper for I/O errors raised while reading ROMs from disk.
    #[error("i/o error while reading cartridge: {0}")]
    Io(#[from] std::io::Error),
}
