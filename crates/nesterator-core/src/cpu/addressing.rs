use std::fmt::Display;

use crate::{bus::Bus, cpu::Cpu};

/// Addressing modes of the 6502.
///
/// An addressing mode decides how many operand bytes follow the opcode and
/// which bus accesses are needed to reach the operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Addressing {
    /// No operand. The instruction works on registers only.
    ///
    /// # Examples
    /// - `CLC`
    /// - `INX`
    Implied,

    /// The operation targets the accumulator.
    ///
    /// # Examples
    /// - `ASL A`
    Accumulator,

    /// The byte following the opcode is the operand value itself.
    ///
    /// # Examples
    /// - `LDA #$42`
    Immediate,

    /// Full 16-bit address in the two bytes after the opcode.
    ///
    /// # Examples
    /// - `LDA $1234`
    Absolute,

    /// Absolute address indexed by X; reads pay one extra cycle on a page cross.
    ///
    /// # Examples
    /// - `LDA $1234,X`
    AbsoluteX,

    /// Absolute address indexed by Y; reads pay one extra cycle on a page cross.
    ///
    /// # Examples
    /// - `LDA $1234,Y`
    AbsoluteY,

    /// Pointer to the jump target, used by `JMP` only. The pointer's high byte
    /// is fetched without carrying into the next page.
    ///
    /// # Examples
    /// - `JMP ($12FF)` reads `$12FF` and `$1200`
    Indirect,

    /// Single-byte address in page zero.
    ///
    /// # Examples
    /// - `LDA $42`
    ZeroPage,

    /// Zero page address plus X, wrapping within page zero.
    ///
    /// # Examples
    /// - `LDA $42,X`
    ZeroPageX,

    /// Zero page address plus Y, wrapping within page zero.
    ///
    /// # Examples
    /// - `LDX $42,Y`
    ZeroPageY,

    /// `(zp,X)`: add X to the zero page pointer, then load the target address.
    ///
    /// # Examples
    /// - `LDA ($42,X)`
    IndirectX,

    /// `(zp),Y`: load the address at the zero page pointer, then add Y.
    ///
    /// # Examples
    /// - `LDA ($42),Y`
    IndirectY,

    /// Signed 8-bit branch offset relative to the next instruction.
    ///
    /// # Examples
    /// - `BNE $F0`
    Relative,
}

impl Addressing {
    /// Number of operand bytes following the opcode.
    pub const fn operand_len(self) -> u8 {
        match self {
            Addressing::Implied | Addressing::Accumulator => 0,
            Addressing::Immediate
            | Addressing::ZeroPage
            | Addressing::ZeroPageX
            | Addressing::ZeroPageY
            | Addressing::IndirectX
            | Addressing::IndirectY
            | Addressing::Relative => 1,
            Addressing::Absolute
            | Addressing::AbsoluteX
            | Addressing::AbsoluteY
            | Addressing::Indirect => 2,
        }
    }
}

impl Display for Addressing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Addressing::Implied => "implied".fmt(f),
            Addressing::Accumulator => "accumulator".fmt(f),
            Addressing::Immediate => "immediate".fmt(f),
            Addressing::Absolute => "absolute".fmt(f),
            Addressing::AbsoluteX => "absolute_x".fmt(f),
            Addressing::AbsoluteY => "absolute_y".fmt(f),
            Addressing::Indirect => "indirect".fmt(f),
            Addressing::ZeroPage => "zero_page".fmt(f),
            Addressing::ZeroPageX => "zero_page_x".fmt(f),
            Addressing::ZeroPageY => "zero_page_y".fmt(f),
            Addressing::IndirectX => "indirect_x".fmt(f),
            Addressing::IndirectY => "indirect_y".fmt(f),
            Addressing::Relative => "relative".fmt(f),
        }
    }
}

/// How an instruction uses its memory operand. Decides whether indexed modes
/// always pay the fix-up cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Access {
    Read,
    Write,
    ReadModifyWrite,
}

/// Operand produced by address resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    Implied,
    Accumulator,
    /// Immediate byte or relative branch offset.
    Value(u8),
    Address(u16),
}

impl Cpu {
    /// Consumes the operand bytes for `mode` and performs every intermediate
    /// access the real addressing logic makes, dummy reads included.
    pub(crate) fn resolve(&mut self, bus: &mut impl Bus, mode: Addressing, access: Access) -> Operand {
        match mode {
            Addressing::Implied => {
                bus.read(self.pc);
                Operand::Implied
            }
            Addressing::Accumulator => {
                bus.read(self.pc);
                Operand::Accumulator
            }
            Addressing::Immediate | Addressing::Relative => Operand::Value(self.fetch(bus)),
            Addressing::ZeroPage => Operand::Address(self.fetch(bus) as u16),
            Addressing::ZeroPageX => Operand::Address(self.zero_page_indexed(bus, self.x)),
            Addressing::ZeroPageY => Operand::Address(self.zero_page_indexed(bus, self.y)),
            Addressing::Absolute => Operand::Address(self.fetch_word(bus)),
            Addressing::AbsoluteX => {
                let base = self.fetch_word(bus);
                Operand::Address(Self::indexed(bus, base, self.x, access))
            }
            Addressing::AbsoluteY => {
                let base = self.fetch_word(bus);
                Operand::Address(Self::indexed(bus, base, self.y, access))
            }
            Addressing::Indirect => {
                let ptr = self.fetch_word(bus);
                let lo = bus.read(ptr);
                // The pointer increment never carries into the high byte.
                let hi = bus.read((ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF));
                Operand::Address(u16::from_le_bytes([lo, hi]))
            }
            Addressing::IndirectX => {
                let ptr = self.fetch(bus);
                bus.read(ptr as u16);
                let ptr = ptr.wrapping_add(self.x);
                let lo = bus.read(ptr as u16);
                let hi = bus.read(ptr.wrapping_add(1) as u16);
                Operand::Address(u16::from_le_bytes([lo, hi]))
            }
            Addressing::IndirectY => {
                let ptr = self.fetch(bus);
                let lo = bus.read(ptr as u16);
                let hi = bus.read(ptr.wrapping_add(1) as u16);
                let base = u16::from_le_bytes([lo, hi]);
                Operand::Address(Self::indexed(bus, base, self.y, access))
            }
        }
    }

    fn zero_page_indexed(&mut self, bus: &mut impl Bus, index: u8) -> u16 {
        let base = self.fetch(bus);
        bus.read(base as u16);
        base.wrapping_add(index) as u16
    }

    /// Adds `index` to `base`. The CPU first reads from the address with the
    /// uncorrected high byte; reads skip that cycle when no page is crossed.
    fn indexed(bus: &mut impl Bus, base: u16, index: u8, access: Access) -> u16 {
        let addr = base.wrapping_add(index as u16);
        let crossed = (base ^ addr) & 0xFF00 != 0;
        if crossed || access != Access::Read {
            bus.read((base & 0xFF00) | (addr & 0x00FF));
        }
        addr
    }
}
