use std::fmt::Display;

use crate::cpu::{addressing::Addressing, mnemonic::Mnemonic};

/// Decoded opcode: what to do and how to reach the operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub addressing: Addressing,
}

impl Instruction {
    pub const fn new(mnemonic: Mnemonic, addressing: Addressing) -> Self {
        Self {
            mnemonic,
            addressing,
        }
    }

    /// Opcode byte plus operand bytes.
    pub const fn len(&self) -> u8 {
        1 + self.addressing.operand_len()
    }

    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.mnemonic, self.addressing)
    }
}
