use std::fmt::Display;

use crate::bus::{Bus, STACK_ADDR};
use crate::config::ResetKind;
use crate::cpu::lookup::LOOKUP_TABLE;
use crate::cpu::mnemonic::Mnemonic;
use crate::cpu::status::Status;
use crate::cpu::trace::Fetched;
use crate::memory::cpu as cpu_mem;

mod alu;
mod execute;
mod lookup;
mod status;
mod trace;

pub mod addressing;
pub mod instruction;
pub mod mnemonic;

pub use instruction::Instruction;
pub use status::Status as CpuStatus;
pub use trace::TraceLine;

/// Register file seen by debuggers and golden-log harnesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CpuSnapshot {
    pub pc: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub s: u8,
    pub p: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    Nmi,
    Irq,
}

impl Interrupt {
    const fn vector(self) -> u16 {
        match self {
            Interrupt::Nmi => cpu_mem::NMI_VECTOR_LO,
            Interrupt::Irq => cpu_mem::IRQ_VECTOR_LO,
        }
    }
}

/// The 2A03's 6502 core, executed one instruction per [`Cpu::step`].
///
/// Timing is not tabulated: each bus access is one cycle, so an instruction
/// costs exactly as many cycles as the accesses it performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cpu {
    // Registers
    pub(crate) a: u8,     //Accumulator
    pub(crate) x: u8,     //X Index Register
    pub(crate) y: u8,     //Y Index Register
    pub(crate) s: u8,     //Stack Pointer
    pub(crate) p: Status, //Processor Status
    pub(crate) pc: u16,   //Program Counter

    nmi_pending: bool,
    irq_requests: u32,
    /// Result of the last interrupt poll; IRQs are ignored while set.
    irq_poll_masked: bool,

    trace_enabled: bool,
    fetched: Fetched,
    last_trace: Option<TraceLine>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// CPU in its power-up register state. The program counter stays at zero
    /// until [`Cpu::reset`] loads the reset vector.
    pub fn new() -> Self {
        Self {
            a: 0x00,
            x: 0x00,
            y: 0x00,
            s: 0xFD,
            p: Status::power_on(),
            pc: 0x0000,
            nmi_pending: false,
            irq_requests: 0,
            irq_poll_masked: true,
            trace_enabled: false,
            fetched: Fetched::default(),
            last_trace: None,
        }
    }

    /// Applies a reset and loads PC from `$FFFC/$FFFD`.
    ///
    /// The vector is fetched with [`Bus::peek`], so the reset sequence itself
    /// does not advance the cycle counter.
    pub fn reset(&mut self, kind: ResetKind, bus: &mut impl Bus) {
        match kind {
            ResetKind::PowerOn => {
                self.a = 0;
                self.x = 0;
                self.y = 0;
                self.s = 0xFD;
                self.p = Status::power_on();
            }
            ResetKind::Soft => {
                self.s = self.s.wrapping_sub(3);
                self.p.insert(Status::INTERRUPT);
            }
        }
        let lo = bus.peek(cpu_mem::RESET_VECTOR_LO);
        let hi = bus.peek(cpu_mem::RESET_VECTOR_HI);
        self.pc = u16::from_le_bytes([lo, hi]);

        self.nmi_pending = false;
        self.irq_requests = 0;
        self.irq_poll_masked = true;
        self.last_trace = None;
        tracing::debug!(?kind, pc = format_args!("{:#06X}", self.pc), "cpu reset");
    }

    /// Runs one instruction, or one interrupt entry sequence if an interrupt
    /// is pending, and returns the cycles it took.
    pub fn step(&mut self, bus: &mut impl Bus) -> u8 {
        let start = bus.cycles();
        if self.nmi_pending {
            self.nmi_pending = false;
            self.interrupt(bus, Interrupt::Nmi);
        } else if self.irq_requests > 0 && !self.irq_poll_masked {
            self.irq_requests -= 1;
            self.interrupt(bus, Interrupt::Irq);
        } else {
            self.execute_next(bus);
        }
        (bus.cycles() - start) as u8
    }

    /// Latches an NMI edge; it is taken before the next instruction.
    pub fn signal_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Queues one IRQ. Each serviced IRQ consumes one request.
    pub fn request_irq(&mut self) {
        self.irq_requests = self.irq_requests.saturating_add(1);
    }

    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    pub fn pending_irqs(&self) -> u32 {
        self.irq_requests
    }

    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            pc: self.pc,
            a: self.a,
            x: self.x,
            y: self.y,
            s: self.s,
            p: self.p.bits(),
        }
    }

    pub fn restore(&mut self, snapshot: CpuSnapshot) {
        self.pc = snapshot.pc;
        self.a = snapshot.a;
        self.x = snapshot.x;
        self.y = snapshot.y;
        self.s = snapshot.s;
        self.p = Status::from_bits_truncate(snapshot.p);
    }

    pub fn set_trace_enabled(&mut self, enabled: bool) {
        self.trace_enabled = enabled;
        if !enabled {
            self.last_trace = None;
        }
    }

    /// Trace line of the most recent instruction, when tracing is enabled.
    pub fn last_trace(&self) -> Option<&TraceLine> {
        self.last_trace.as_ref()
    }

    fn execute_next(&mut self, bus: &mut impl Bus) {
        let mut line = self.trace_enabled.then(|| TraceLine {
            pc: self.pc,
            bytes: Vec::new(),
            a: self.a,
            x: self.x,
            y: self.y,
            p: self.p.bits(),
            s: self.s,
            cycles: bus.cycles(),
        });

        self.fetched.clear();
        let opcode = self.fetch(bus);
        let instr = LOOKUP_TABLE[opcode as usize];
        let masked_before = self.p.contains(Status::INTERRUPT);

        if instr.mnemonic == Mnemonic::JAM {
            tracing::warn!(
                opcode = format_args!("{opcode:#04X}"),
                pc = format_args!("{:#06X}", self.pc.wrapping_sub(1)),
                "unimplemented opcode executed as a no-op"
            );
        }
        self.execute(bus, instr);

        // CLI, SEI and PLP change I after the interrupt poll has happened.
        self.irq_poll_masked = match instr.mnemonic {
            Mnemonic::CLI | Mnemonic::SEI | Mnemonic::PLP => masked_before,
            _ => self.p.contains(Status::INTERRUPT),
        };

        if let Some(line) = line.as_mut() {
            line.bytes = self.fetched.as_slice().to_vec();
            tracing::trace!(target: "nesterator::cpu", "{line}");
        }
        if line.is_some() {
            self.last_trace = line;
        }
    }

    /// Hardware interrupt entry: two dummy reads, three pushes, vector fetch.
    fn interrupt(&mut self, bus: &mut impl Bus, kind: Interrupt) {
        tracing::debug!(?kind, pc = format_args!("{:#06X}", self.pc), "interrupt");
        bus.read(self.pc);
        bus.read(self.pc);
        self.push_word(bus, self.pc);
        self.push(bus, self.p.to_stack(false));
        self.p.insert(Status::INTERRUPT);
        self.pc = self.read_vector(bus, kind.vector());
        self.irq_poll_masked = true;
    }

    pub(crate) fn read_vector(&mut self, bus: &mut impl Bus, lo_addr: u16) -> u16 {
        let lo = bus.read(lo_addr);
        let hi = bus.read(lo_addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Reads the byte at PC and advances PC.
    pub(crate) fn fetch(&mut self, bus: &mut impl Bus) -> u8 {
        let byte = bus.read(self.pc);
        self.fetched.push(byte);
        self.incr_pc();
        byte
    }

    pub(crate) fn fetch_word(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = self.fetch(bus);
        let hi = self.fetch(bus);
        u16::from_le_bytes([lo, hi])
    }

    #[inline]
    pub(crate) fn incr_pc(&mut self) {
        self.pc = self.pc.wrapping_add(1);
    }

    #[inline]
    pub(crate) fn stack_addr(&self) -> u16 {
        STACK_ADDR | self.s as u16
    }

    pub(crate) fn push(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(self.stack_addr(), value);
        self.s = self.s.wrapping_sub(1);
    }

    pub(crate) fn push_word(&mut self, bus: &mut impl Bus, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push(bus, hi);
        self.push(bus, lo);
    }

    pub(crate) fn pop(&mut self, bus: &mut impl Bus) -> u8 {
        self.s = self.s.wrapping_add(1);
        bus.read(self.stack_addr())
    }
}

impl Display for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[a:0x{:02x},x:0x{:02x},y:0x{:02x},s:0x{:02x},p:0x{:02x},pc:0x{:04x}]",
            self.a,
            self.x,
            self.y,
            self.s,
            self.p.bits(),
            self.pc
        )
    }
}
