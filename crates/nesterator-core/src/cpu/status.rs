use bitflags::bitflags;

bitflags! {
    /// Processor status register (P).
    ///
    /// Bit layout:
    /// 7 6 5 4 3 2 1 0
    /// N V _ B D I Z C
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        /// Carry flag (C)
        /// Set when an addition produces a carry out of bit 7,
        /// or a subtraction/comparison does not need a borrow.
        const CARRY     = 0b0000_0001;

        /// Zero flag (Z)
        const ZERO      = 0b0000_0010;

        /// Interrupt Disable flag (I)
        /// When set, maskable interrupts (IRQ) are ignored.
        const INTERRUPT = 0b0000_0100;

        /// Decimal Mode flag (D)
        /// Stored and pushed, but the NES ALU never does BCD arithmetic.
        const DECIMAL   = 0b0000_1000;

        /// Break flag (B)
        /// Only exists in the copy pushed to the stack: set by BRK/PHP,
        /// clear for hardware interrupts.
        const BREAK     = 0b0001_0000;

        /// Unused bit, always 1 in the copy pushed to the stack.
        const UNUSED    = 0b0010_0000;

        /// Overflow flag (V)
        /// Set when signed arithmetic overflows.
        const OVERFLOW  = 0b0100_0000;

        /// Negative flag (N)
        /// Mirrors bit 7 of the last result.
        const NEGATIVE  = 0b1000_0000;
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::power_on()
    }
}

impl Status {
    /// Power-up state: interrupts disabled, unused bit set.
    pub const fn power_on() -> Self {
        Self::from_bits_truncate(0x24)
    }

    /// Set Zero and Negative from a result byte.
    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.set(Status::ZERO, value == 0);
        self.set(Status::NEGATIVE, value & 0x80 != 0);
    }

    #[inline]
    pub fn carry(self) -> u8 {
        (self.contains(Status::CARRY)) as u8
    }

    /// Byte pushed by PHP/BRK (`brk == true`) or by IRQ/NMI entry.
    pub fn to_stack(self, brk: bool) -> u8 {
        let mut value = self | Status::UNUSED;
        value.set(Status::BREAK, brk);
        value.bits()
    }

    /// Status restored by PLP/RTI; B is dropped and the unused bit forced on.
    pub fn from_stack(byte: u8) -> Self {
        (Status::from_bits_truncate(byte) - Status::BREAK) | Status::UNUSED
    }
}
