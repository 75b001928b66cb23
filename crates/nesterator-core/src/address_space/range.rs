use core::fmt;

use crate::error::Error;

/// One past the last address of the 16-bit bus.
pub const ADDRESS_SPACE_END: u32 = 0x1_0000;

/// Half-open window `[start, end)` over the 16-bit address space.
///
/// `end` is stored as `u32` so a window can close exactly at `$10000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    start: u32,
    end: u32,
}

impl AddressRange {
    /// Builds a range, rejecting empty or inverted windows and windows that
    /// run past the end of the bus.
    pub fn new(start: u32, end: u32) -> Result<Self, Error> {
        if start >= end || end > ADDRESS_SPACE_END {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn with_len(start: u32, len: usize) -> Result<Self, Error> {
        let end = u32::try_from(len)
            .ok()
            .and_then(|len| start.checked_add(len))
            .ok_or(Error::InvalidRange {
                start,
                end: u32::MAX,
            })?;
        Self::new(start, end)
    }

    #[inline]
    pub const fn start(self) -> u32 {
        self.start
    }

    #[inline]
    pub const fn end(self) -> u32 {
        self.end
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    /// Never true; ranges are non-empty by construction.
    #[inline]
    pub const fn is_empty(self) -> bool {
        false
    }

    #[inline]
    pub const fn contains(self, addr: u16) -> bool {
        let addr = addr as u32;
        addr >= self.start && addr < self.end
    }

    /// Returns `true` when the two windows share at least one address.
    pub const fn overlaps(self, other: AddressRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Offset of `addr` from the start of the window.
    #[inline]
    pub(crate) const fn offset(self, addr: u16) -> usize {
        (addr as u32 - self.start) as usize
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[${:04X}, ${:05X})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_oversized_windows() {
        assert!(AddressRange::new(0x10, 0x10).is_err());
        assert!(AddressRange::new(0x20, 0x10).is_err());
        assert!(AddressRange::new(0xFF00, 0x1_0001).is_err());
        assert!(AddressRange::with_len(0xC000, 0x4001).is_err());
    }

    #[test]
    fn contains_is_half_open() {
        let range = AddressRange::with_len(0x2000, 8).expect("valid range");
        assert!(range.contains(0x2000));
        assert!(range.contains(0x2007));
        assert!(!range.contains(0x2008));
        assert!(!range.contains(0x1FFF));
        assert_eq!(range.len(), 8);
    }

    #[test]
    fn full_bus_window_is_allowed() {
        let range = AddressRange::new(0, ADDRESS_SPACE_END).expect("valid range");
        assert!(range.contains(0xFFFF));
        assert_eq!(range.to_string(), "[$0000, $10000)");
    }
}
