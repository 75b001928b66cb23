use crate::clock::{CPU_CLOCK_HZ, PPU_DOTS_PER_CPU_CYCLE};

/// Dots a driven bit survives on the PPU data bus: 0.6 s of CPU time,
/// expressed in PPU dots.
pub const DECAY_DOTS: u64 = (0.6 * CPU_CLOCK_HZ as f64) as u64 * PPU_DOTS_PER_CPU_CYCLE;

/// PPU-local open-bus latch with per-bit decay.
///
/// Each bit carries its own countdown. Driving a bit reloads its counter;
/// when a counter runs out the bit falls back to 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct OpenBus {
    value: u8,
    timers: [u64; 8],
}

impl Default for OpenBus {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenBus {
    pub(crate) fn new() -> Self {
        Self {
            value: 0,
            timers: [0; 8],
        }
    }

    pub(crate) fn value(&self) -> u8 {
        self.value
    }

    /// Drives every bit with `value`.
    pub(crate) fn drive(&mut self, value: u8) {
        self.value = value;
        self.timers = [DECAY_DOTS; 8];
    }

    /// Reloads the timers of the bits set in `mask` without changing the
    /// latched value.
    pub(crate) fn refresh(&mut self, mask: u8) {
        for (bit, timer) in self.timers.iter_mut().enumerate() {
            if mask & (1 << bit) != 0 {
                *timer = DECAY_DOTS;
            }
        }
    }

    /// Latches the byte a register read put on the bus.
    pub(crate) fn latch(&mut self, value: u8) {
        self.value = value;
    }

    /// One PPU dot of decay.
    pub(crate) fn tick(&mut self) {
        for (bit, timer) in self.timers.iter_mut().enumerate() {
            match *timer {
                0 => {}
                1 => {
                    self.value &= !(1 << bit);
                    *timer = 0;
                }
                _ => *timer -= 1,
            }
        }
    }
}
