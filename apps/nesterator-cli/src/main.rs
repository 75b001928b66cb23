use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use clap::Parser;
use nesterator_core::{
    Config, CpuSnapshot, Nes, SCREEN_HEIGHT, SCREEN_WIDTH, cartridge::Cartridge, clock,
};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Headless NES core runner
#[derive(Parser, Debug)]
#[command(name = "nesterator")]
#[command(about = "Run an NROM cartridge headlessly and dump traces or a frame", long_about = None)]
struct Args {
    /// iNES ROM image
    rom: PathBuf,

    /// Emulated seconds to run
    #[arg(long, conflicts_with = "frames")]
    seconds: Option<f64>,

    /// Number of frames to run
    #[arg(long, default_value_t = 1)]
    frames: u64,

    /// Print a golden-log style line for every instruction
    #[arg(long)]
    trace: bool,

    /// Stop after this many traced instructions
    #[arg(long, requires = "trace")]
    trace_limit: Option<u64>,

    /// Start execution at this address (hex) instead of the reset vector
    #[arg(long, value_parser = parse_hex)]
    start_pc: Option<u16>,

    /// Write the final frame as a binary PPM image
    #[arg(long)]
    ppm: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

fn parse_hex(value: &str) -> Result<u16, String> {
    let digits = value
        .trim_start_matches("0x")
        .trim_start_matches("0X")
        .trim_start_matches('$');
    u16::from_str_radix(digits, 16).map_err(|err| format!("invalid address {value:?}: {err}"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cartridge = Cartridge::from_file(&args.rom)
        .with_context(|| format!("failed to load {}", args.rom.display()))?;
    let config = Config {
        trace_cpu: args.trace,
        ..Config::default()
    };
    let mut nes = Nes::from_cartridge(&cartridge, config).context("unsupported cartridge")?;

    if let Some(pc) = args.start_pc {
        let snapshot = nes.cpu_snapshot();
        nes.set_cpu_snapshot(CpuSnapshot { pc, ..snapshot });
    }

    if args.trace {
        let mut printer = TracePrinter::new(args.trace_limit);
        match args.seconds {
            Some(seconds) => {
                let budget = clock::cpu_cycles_for(seconds);
                let start = nes.cpu_cycles();
                while nes.cpu_cycles() - start < budget && printer.step(&mut nes)? {}
            }
            None => {
                let target = nes.ppu().frame_count() + args.frames;
                while nes.ppu().frame_count() < target && printer.step(&mut nes)? {}
            }
        }
        printer.finish()?;
    } else if let Some(seconds) = args.seconds {
        let cycles = nes.advance(seconds);
        info!(seconds, cycles, "run complete");
    } else {
        for _ in 0..args.frames {
            nes.run_frame();
        }
        info!(frames = args.frames, cycles = nes.cpu_cycles(), "run complete");
    }

    if let Some(path) = &args.ppm {
        let frame = nes.frame()?;
        write_ppm(path, frame).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "frame written");
    }
    Ok(())
}

/// Writes one trace line per executed instruction to stdout.
struct TracePrinter {
    out: BufWriter<std::io::Stdout>,
    limit: Option<u64>,
    printed: u64,
    /// Start cycle of the last printed line. Interrupt entries and DMA steps
    /// leave the previous line in place.
    last_cycle: Option<u64>,
}

impl TracePrinter {
    fn new(limit: Option<u64>) -> Self {
        Self {
            out: BufWriter::new(std::io::stdout()),
            limit,
            printed: 0,
            last_cycle: None,
        }
    }

    /// Steps the machine once. Returns `false` once the line limit is hit.
    fn step(&mut self, nes: &mut Nes) -> anyhow::Result<bool> {
        if self.limit.is_some_and(|limit| self.printed >= limit) {
            return Ok(false);
        }
        nes.step();
        if let Some(line) = nes.last_trace()
            && self.last_cycle != Some(line.cycles)
        {
            self.last_cycle = Some(line.cycles);
            writeln!(self.out, "{line}")?;
            self.printed += 1;
        }
        Ok(true)
    }

    fn finish(mut self) -> anyhow::Result<()> {
        self.out.flush()?;
        if self.printed == 0 {
            bail!("no instructions were traced");
        }
        Ok(())
    }
}

fn write_ppm(path: &Path, rgb: &[u8]) -> anyhow::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write!(file, "P6\n{SCREEN_WIDTH} {SCREEN_HEIGHT}\n255\n")?;
    file.write_all(rgb)?;
    file.flush()?;
    Ok(())
}
