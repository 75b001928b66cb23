use std::fmt::Display;

use crate::{clock::DOTS_PER_SCANLINE, clock::PPU_DOTS_PER_CPU_CYCLE};

/// Instruction bytes consumed by the current instruction, opcode first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Fetched {
    bytes: [u8; 3],
    len: u8,
}

impl Fetched {
    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    pub(crate) fn push(&mut self, byte: u8) {
        if let Some(slot) = self.bytes.get_mut(self.len as usize) {
            *slot = byte;
            self.len += 1;
        }
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

/// One line of the golden-log style execution trace.
///
/// Registers and the cycle counter are sampled before the instruction runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine {
    pub pc: u16,
    pub bytes: Vec<u8>,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    pub s: u8,
    /// Total CPU cycles elapsed when the instruction started.
    pub cycles: u64,
}

impl TraceLine {
    /// PPU dot within the scanline at which the instruction started.
    pub fn ppu_dot(&self) -> u64 {
        (self.cycles * PPU_DOTS_PER_CPU_CYCLE) % DOTS_PER_SCANLINE
    }
}

impl Display for TraceLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self
            .bytes
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        write!(
            f,
            "{:04X}  {:<8}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{:>3}",
            self.pc,
            bytes,
            self.a,
            self.x,
            self.y,
            self.p,
            self.s,
            self.ppu_dot()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_a_golden_log() {
        let line = TraceLine {
            pc: 0xC000,
            bytes: vec![0x4C, 0xF5, 0xC5],
            a: 0,
            x: 0,
            y: 0,
            p: 0x24,
            s: 0xFD,
            cycles: 7,
        };
        assert_eq!(
            line.to_string(),
            "C000  4C F5 C5  A:00 X:00 Y:00 P:24 SP:FD CYC: 21"
        );
    }

    #[test]
    fn short_instructions_are_padded() {
        let line = TraceLine {
            pc: 0xC72E,
            bytes: vec![0xEA],
            a: 0x01,
            x: 0x02,
            y: 0x03,
            p: 0x25,
            s: 0xFB,
            cycles: 114,
        };
        // 114 * 3 = 342, one dot into the next line.
        assert_eq!(
            line.to_string(),
            "C72E  EA        A:01 X:02 Y:03 P:25 SP:FB CYC:  1"
        );
    }

    #[test]
    fn fetched_keeps_at_most_three_bytes() {
        let mut fetched = Fetched::default();
        for b in [1, 2, 3, 4] {
            fetched.push(b);
        }
        assert_eq!(fetched.as_slice(), &[1, 2, 3]);
        fetched.clear();
        assert!(fetched.as_slice().is_empty());
    }
}
