//! Cartridge images in the iNES format.
//!
//! Only boards without a mapper are run by the machine: one or two 16 KiB PRG
//! banks and at most one 8 KiB CHR bank. Parsing itself accepts any sizes and
//! leaves that check to [`crate::Nes::from_cartridge`].

use std::{fs, path::Path};

use crate::error::Error;

pub mod header;

pub use header::{HEADER_LEN, Header};

pub const TRAINER_SIZE: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cartridge {
    header: Header,
    trainer: Option<Box<[u8]>>,
    prg_rom: Box<[u8]>,
    chr_rom: Box<[u8]>,
}

impl Cartridge {
    /// Parses an in-memory ROM image. A truncated image is rejected as a
    /// whole.
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        let header = Header::parse(bytes)?;
        let mut cursor = HEADER_LEN;
        let trainer = if header.trainer_present {
            Some(section(bytes, &mut cursor, TRAINER_SIZE, "trainer")?)
        } else {
            None
        };
        let prg_rom = section(bytes, &mut cursor, header.prg_rom_size(), "PRG ROM")?;
        let chr_rom = section(bytes, &mut cursor, header.chr_rom_size(), "CHR ROM")?;

        if header.mapper != 0 {
            tracing::warn!(mapper = header.mapper, "mapper ignored, running as NROM");
        }
        tracing::info!(
            prg_banks = header.prg_banks,
            chr_banks = header.chr_banks,
            trainer = header.trainer_present,
            "cartridge parsed"
        );

        Ok(Self {
            header,
            trainer,
            prg_rom,
            chr_rom,
        })
    }

    /// Loads a cartridge directly from disk.
    pub fn from_file<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let bytes = fs::read(path)?;
        Self::parse(&bytes)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn trainer(&self) -> Option<&[u8]> {
        self.trainer.as_deref()
    }

    /// PRG ROM split into its 16 KiB banks.
    pub fn prg_banks(&self) -> impl Iterator<Item = &[u8]> {
        self.prg_rom.chunks(header::PRG_BANK_UNIT)
    }

    pub fn prg_rom(&self) -> &[u8] {
        &self.prg_rom
    }

    /// CHR ROM; empty when the board uses CHR RAM.
    pub fn chr(&self) -> &[u8] {
        &self.chr_rom
    }
}

fn section(
    bytes: &[u8],
    cursor: &mut usize,
    len: usize,
    name: &'static str,
) -> Result<Box<[u8]>, Error> {
    let available = bytes.len().saturating_sub(*cursor);
    let slice = cursor
        .checked_add(len)
        .and_then(|end| bytes.get(*cursor..end))
        .ok_or(Error::SectionTooShort {
            section: name,
            expected: len,
            actual: available,
        })?;
    *cursor += len;
    Ok(slice.into())
}
