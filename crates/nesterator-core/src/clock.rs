//! Timing constants and conversions between wall time, CPU cycles and PPU
//! dots (NTSC).

/// CPU clock rate in Hz.
pub const CPU_CLOCK_HZ: u64 = 1_789_773;

/// The PPU runs three dots for every CPU cycle.
pub const PPU_DOTS_PER_CPU_CYCLE: u64 = 3;

pub const DOTS_PER_SCANLINE: u64 = 341;

pub const SCANLINES_PER_FRAME: u64 = 262;

/// CPU cycles covering `seconds` of emulated time, truncated. Negative and
/// non-finite inputs yield zero.
pub fn cpu_cycles_for(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * CPU_CLOCK_HZ as f64) as u64
}

pub const fn ppu_dots_for(cpu_cycles: u64) -> u64 {
    cpu_cycles * PPU_DOTS_PER_CPU_CYCLE
}
