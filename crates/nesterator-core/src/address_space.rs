//! Composable address spaces.
//!
//! Both the CPU and the PPU see a 16-bit bus stitched together from a handful
//! of fixed windows. Instead of hand-written decode logic, each bus is built
//! once at power-on from a small closed set of combinators:
//!
//! - [`AddressSpace::Block`]: plain byte storage.
//! - [`AddressSpace::Composite`]: contiguous children, dispatched by binary
//!   search over their sorted ranges.
//! - [`AddressSpace::Mirrored`]: a base space repeated `times` times.
//! - [`AddressSpace::MirrorOf`]: a window that aliases another window of the
//!   same enclosing space at a constant offset. Its target must not be
//!   another mirror window.
//! - [`AddressSpace::Port`]: a window forwarded to a device supplied at
//!   access time (see [`Port`]).
//!
//! Every access is range checked. Touching an address outside a space is a
//! construction or decoding bug and panics; it is never a runtime condition.

mod range;

pub use range::{ADDRESS_SPACE_END, AddressRange};

use crate::error::Error;

/// A device that backs an [`AddressSpace::Port`] window.
///
/// The address handed to the device is already folded through any mirrors,
/// so it always lies inside the port's own window.
pub trait Port {
    fn read_port(&mut self, addr: u16) -> u8;

    fn write_port(&mut self, addr: u16, value: u8);
}

/// Stand-in device for plain reads and writes that never expect a port.
struct Detached;

impl Port for Detached {
    fn read_port(&mut self, addr: u16) -> u8 {
        panic!("read from port window at ${addr:04X} without an attached device")
    }

    fn write_port(&mut self, addr: u16, _value: u8) {
        panic!("write to port window at ${addr:04X} without an attached device")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AddressSpace {
    Block {
        range: AddressRange,
        data: Box<[u8]>,
    },
    Composite {
        range: AddressRange,
        children: Vec<AddressSpace>,
    },
    Mirrored {
        range: AddressRange,
        base: Box<AddressSpace>,
        times: u32,
    },
    MirrorOf {
        range: AddressRange,
        target: u32,
    },
    Port {
        range: AddressRange,
    },
}

/// Outcome of walking the tree for one access.
enum Resolved<T> {
    Done(T),
    /// A [`AddressSpace::MirrorOf`] window was hit; restart at this address.
    Redirect(u16),
    /// A [`AddressSpace::Port`] window was hit at this (folded) address.
    Port(u16),
}

impl AddressSpace {
    /// Zero-filled storage covering `[start, start + len)`.
    pub fn block(start: u16, len: usize) -> Result<Self, Error> {
        Self::block_with(start, vec![0; len])
    }

    /// Storage covering `[start, start + data.len())`, initialised from `data`.
    pub fn block_with(start: u16, data: Vec<u8>) -> Result<Self, Error> {
        let range = AddressRange::with_len(start as u32, data.len())?;
        Ok(Self::Block {
            range,
            data: data.into_boxed_slice(),
        })
    }

    /// Joins children whose ranges tile a single window, in address order.
    ///
    /// Each child's end must equal the next child's start; gaps and overlaps
    /// are rejected.
    pub fn composite(children: Vec<AddressSpace>) -> Result<Self, Error> {
        let (first, last) = match (children.first(), children.last()) {
            (Some(first), Some(last)) => (first.range(), last.range()),
            _ => return Err(Error::EmptyComposite),
        };
        for pair in children.windows(2) {
            let (left, right) = (pair[0].range(), pair[1].range());
            if left.end() != right.start() {
                return Err(Error::NonContiguous {
                    expected: left.end(),
                    actual: right.start(),
                });
            }
        }
        let range = AddressRange::new(first.start(), last.end())?;
        Ok(Self::Composite { range, children })
    }

    /// Repeats `base` `times` times, starting at the base's own start address.
    pub fn mirrored(base: AddressSpace, times: u32) -> Result<Self, Error> {
        if times == 0 {
            return Err(Error::InvalidMirror {
                reason: "repeat count must be positive",
            });
        }
        let inner = base.range();
        let end = (times - 1)
            .checked_mul(inner.len())
            .and_then(|extra| inner.end().checked_add(extra))
            .ok_or(Error::InvalidRange {
                start: inner.start(),
                end: u32::MAX,
            })?;
        let range = AddressRange::new(inner.start(), end)?;
        Ok(Self::Mirrored {
            range,
            base: Box::new(base),
            times,
        })
    }

    /// Window `[start, start + len)` that aliases `[target, target + len)` of
    /// the enclosing space by constant offset.
    pub fn mirror_of(target: u16, start: u16, len: usize) -> Result<Self, Error> {
        let range = AddressRange::with_len(start as u32, len)?;
        let aliased = AddressRange::with_len(target as u32, len)?;
        if range.overlaps(aliased) {
            return Err(Error::InvalidMirror {
                reason: "mirror window overlaps its target",
            });
        }
        Ok(Self::MirrorOf {
            range,
            target: target as u32,
        })
    }

    /// Window forwarded to the device passed to [`AddressSpace::read_via`] /
    /// [`AddressSpace::write_via`].
    pub fn port(start: u16, len: usize) -> Result<Self, Error> {
        let range = AddressRange::with_len(start as u32, len)?;
        Ok(Self::Port { range })
    }

    pub fn range(&self) -> AddressRange {
        match self {
            Self::Block { range, .. }
            | Self::Composite { range, .. }
            | Self::Mirrored { range, .. }
            | Self::MirrorOf { range, .. }
            | Self::Port { range } => *range,
        }
    }

    /// Reads one byte.
    ///
    /// # Panics
    /// When `addr` is outside the space or resolves to a port window.
    pub fn read(&self, addr: u16) -> u8 {
        self.read_via(addr, &mut Detached)
    }

    /// Writes one byte.
    ///
    /// # Panics
    /// When `addr` is outside the space or resolves to a port window.
    pub fn write(&mut self, addr: u16, value: u8) {
        self.write_via(addr, value, &mut Detached)
    }

    /// Reads one byte, forwarding port windows to `port`.
    ///
    /// # Panics
    /// When a mirror window redirects into another mirror window.
    pub fn read_via(&self, addr: u16, port: &mut dyn Port) -> u8 {
        let mut at = addr;
        let mut redirected = false;
        loop {
            match self.resolve_read(at) {
                Resolved::Done(value) => return value,
                Resolved::Redirect(_) if redirected => chained_mirror(addr, at),
                Resolved::Redirect(next) => (at, redirected) = (next, true),
                Resolved::Port(folded) => return port.read_port(folded),
            }
        }
    }

    /// Writes one byte, forwarding port windows to `port`.
    ///
    /// # Panics
    /// When a mirror window redirects into another mirror window.
    pub fn write_via(&mut self, addr: u16, value: u8, port: &mut dyn Port) {
        let mut at = addr;
        let mut redirected = false;
        loop {
            match self.resolve_write(at, value) {
                Resolved::Done(()) => return,
                Resolved::Redirect(_) if redirected => chained_mirror(addr, at),
                Resolved::Redirect(next) => (at, redirected) = (next, true),
                Resolved::Port(folded) => return port.write_port(folded, value),
            }
        }
    }

    /// Copies `bytes` into consecutive addresses starting at `start`.
    pub fn load(&mut self, start: u16, bytes: &[u8]) {
        for (offset, &byte) in bytes.iter().enumerate() {
            let addr = start as usize + offset;
            self.write(addr as u16, byte);
        }
    }

    fn resolve_read(&self, addr: u16) -> Resolved<u8> {
        self.check(addr);
        match self {
            Self::Block { range, data } => Resolved::Done(data[range.offset(addr)]),
            Self::Composite { children, .. } => children[child_index(children, addr)].resolve_read(addr),
            Self::Mirrored { base, .. } => base.resolve_read(fold(base.range(), addr)),
            Self::MirrorOf { range, target } => Resolved::Redirect(alias(*range, *target, addr)),
            Self::Port { .. } => Resolved::Port(addr),
        }
    }

    fn resolve_write(&mut self, addr: u16, value: u8) -> Resolved<()> {
        self.check(addr);
        match self {
            Self::Block { range, data } => {
                data[range.offset(addr)] = value;
                Resolved::Done(())
            }
            Self::Composite { children, .. } => {
                let index = child_index(children, addr);
                children[index].resolve_write(addr, value)
            }
            Self::Mirrored { base, .. } => {
                let folded = fold(base.range(), addr);
                base.resolve_write(folded, value)
            }
            Self::MirrorOf { range, target } => Resolved::Redirect(alias(*range, *target, addr)),
            Self::Port { .. } => Resolved::Port(addr),
        }
    }

    #[inline]
    fn check(&self, addr: u16) {
        let range = self.range();
        if !range.contains(addr) {
            out_of_range(addr, range);
        }
    }
}

/// Index of the child containing `addr`. Children are sorted and contiguous,
/// so the first child ending past `addr` is the one.
#[inline]
fn child_index(children: &[AddressSpace], addr: u16) -> usize {
    let addr = addr as u32;
    children.partition_point(|child| child.range().end() <= addr)
}

#[inline]
fn fold(base: AddressRange, addr: u16) -> u16 {
    (base.start() + (addr as u32 - base.start()) % base.len()) as u16
}

#[inline]
fn alias(range: AddressRange, target: u32, addr: u16) -> u16 {
    (target + range.offset(addr) as u32) as u16
}

#[cold]
#[inline(never)]
fn out_of_range(addr: u16, range: AddressRange) -> ! {
    panic!("address ${addr:04X} is outside {range}")
}

#[cold]
#[inline(never)]
fn chained_mirror(addr: u16, at: u16) -> ! {
    panic!("mirror window at ${addr:04X} redirects into another mirror at ${at:04X}")
}
