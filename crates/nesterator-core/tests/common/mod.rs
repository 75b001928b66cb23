#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use nesterator_core::{Config, Nes};

pub const PRG_BANK: usize = 0x4000;
pub const CHR_BANK: usize = 0x2000;

pub const RESET_ENTRY: u16 = 0x8000;
pub const NMI_ENTRY: u16 = 0x9000;
pub const IRQ_ENTRY: u16 = 0xA000;

/// Offset of `$FFFA` inside a 16 KiB bank.
const VECTORS: usize = PRG_BANK - 6;

/// A single 16 KiB program bank with code placed at fixed entry points and
/// the three vectors pointing at them. Unused bytes are `NOP`.
#[derive(Debug, Clone)]
pub struct Program {
    prg: Vec<u8>,
}

impl Program {
    pub fn new(main: &[u8]) -> Result<Self> {
        let mut program = Self {
            prg: vec![0xEA; PRG_BANK],
        };
        program.place(RESET_ENTRY, main)?;
        // Handlers default to a bare RTI.
        program.place(NMI_ENTRY, &[0x40])?;
        program.place(IRQ_ENTRY, &[0x40])?;
        for (slot, target) in [NMI_ENTRY, RESET_ENTRY, IRQ_ENTRY].into_iter().enumerate() {
            let at = VECTORS + slot * 2;
            program.prg[at..at + 2].copy_from_slice(&target.to_le_bytes());
        }
        Ok(program)
    }

    /// Copies `code` to `addr` (either PRG window).
    pub fn place(&mut self, addr: u16, code: &[u8]) -> Result<&mut Self> {
        let offset = (addr as usize)
            .checked_sub(0x8000)
            .context("code must live in PRG ROM")?
            % PRG_BANK;
        if offset + code.len() > VECTORS {
            bail!("{} bytes at ${addr:04X} run into the vectors", code.len());
        }
        self.prg[offset..offset + code.len()].copy_from_slice(code);
        Ok(self)
    }

    pub fn on_nmi(&mut self, handler: &[u8]) -> Result<&mut Self> {
        self.place(NMI_ENTRY, handler)
    }

    pub fn on_irq(&mut self, handler: &[u8]) -> Result<&mut Self> {
        self.place(IRQ_ENTRY, handler)
    }

    pub fn prg(&self) -> &[u8] {
        &self.prg
    }

    pub fn boot(&self) -> Result<Nes> {
        self.boot_with(&[], Config::default())
    }

    pub fn boot_with(&self, chr: &[u8], config: Config) -> Result<Nes> {
        Nes::with_config(&self.prg, chr, config).context("power on")
    }
}

/// Bytes of `JMP addr`, the idle loop every test program ends with.
pub fn jmp(addr: u16) -> [u8; 3] {
    let [lo, hi] = addr.to_le_bytes();
    [0x4C, lo, hi]
}

/// Wraps PRG and CHR data in an iNES image.
pub fn ines(prg: &[u8], chr: &[u8], flags6: u8, flags7: u8) -> Vec<u8> {
    let mut image = vec![
        b'N',
        b'E',
        b'S',
        0x1A,
        (prg.len() / PRG_BANK) as u8,
        (chr.len() / CHR_BANK) as u8,
        flags6,
        flags7,
    ];
    image.resize(16, 0);
    image.extend_from_slice(prg);
    image.extend_from_slice(chr);
    image
}

/// Steps until the CPU is about to fetch from `pc`.
pub fn run_until_pc(nes: &mut Nes, pc: u16, max_steps: usize) -> Result<()> {
    for _ in 0..max_steps {
        if nes.cpu_snapshot().pc == pc {
            return Ok(());
        }
        nes.step();
    }
    bail!(
        "pc ${pc:04X} not reached within {max_steps} steps (now at ${:04X})",
        nes.cpu_snapshot().pc
    )
}
