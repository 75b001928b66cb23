//! The 16-byte iNES header.
//!
//! Only the fields the machine needs are decoded: bank counts, the trainer
//! flag and the mapper number (reported, never acted on).

use bitflags::bitflags;

use crate::error::Error;

const NES_MAGIC: &[u8; 4] = b"NES\x1A";

/// Size of the fixed iNES header in bytes.
pub const HEADER_LEN: usize = 16;

/// One PRG ROM unit in the header's byte 4.
pub const PRG_BANK_UNIT: usize = 16 * 1024;

/// One CHR ROM unit in the header's byte 5.
pub const CHR_BANK_UNIT: usize = 8 * 1024;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags6: u8 {
        const MIRRORING        = 0b0000_0001;
        const BATTERY          = 0b0000_0010;
        const TRAINER          = 0b0000_0100;
        const FOUR_SCREEN      = 0b0000_1000;
        const MAPPER_LOW_MASK  = 0b1111_0000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
    /// Number of 16 KiB PRG ROM banks.
    pub prg_banks: u8,
    /// Number of 8 KiB CHR ROM banks. Zero means the board uses CHR RAM.
    pub chr_banks: u8,
    /// A 512-byte trainer sits between the header and PRG ROM.
    pub trainer_present: bool,
    /// Mapper number from the high nibbles of bytes 6 and 7.
    pub mapper: u8,
    pub flags6: Flags6,
}

impl Header {
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::HeaderTooShort {
                actual: bytes.len(),
            });
        }
        if &bytes[0..4] != NES_MAGIC {
            return Err(Error::InvalidMagic);
        }

        let flags6 = Flags6::from_bits_truncate(bytes[6]);
        Ok(Self {
            prg_banks: bytes[4],
            chr_banks: bytes[5],
            trainer_present: flags6.contains(Flags6::TRAINER),
            mapper: (bytes[7] & 0xF0) | (bytes[6] >> 4),
            flags6,
        })
    }

    pub fn prg_rom_size(&self) -> usize {
        self.prg_banks as usize * PRG_BANK_UNIT
    }

    pub fn chr_rom_size(&self) -> usize {
        self.chr_banks as usize * CHR_BANK_UNIT
    }
}
