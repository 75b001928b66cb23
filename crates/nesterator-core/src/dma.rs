//! OAM DMA: the `$4014` sprite-memory copy that halts the CPU.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DmaState {
    #[default]
    Idle,
    /// Waiting for the first step, which pays the alignment stall.
    AlignmentCycle,
    /// Copying; `offset` is the next byte of the page to move.
    Transferring { offset: u8 },
}

/// Cycle-stealing copy of one CPU page into OAM.
///
/// Each [`OamDma::step`] returns the CPU cycles it took. The first step is
/// the alignment stall (1 cycle on an even CPU cycle, 2 on an odd one); each
/// of the following 256 steps copies one byte in 2 cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OamDma {
    state: DmaState,
    page: u8,
}

impl OamDma {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latches the source page and arms the transfer.
    pub fn start(&mut self, page: u8) {
        tracing::debug!(page = format_args!("{page:#04X}"), "oam dma start");
        self.page = page;
        self.state = DmaState::AlignmentCycle;
    }

    pub fn is_active(&self) -> bool {
        self.state != DmaState::Idle
    }

    pub fn state(&self) -> DmaState {
        self.state
    }

    pub fn page(&self) -> u8 {
        self.page
    }

    /// Performs one DMA step and returns the CPU cycles it took; an idle
    /// engine takes none.
    ///
    /// `cpu_cycles` is the CPU cycle total before the step. `copy` is called
    /// with the source address and the OAM offset of the byte to move.
    pub fn step(&mut self, cpu_cycles: u64, mut copy: impl FnMut(u16, u8)) -> u8 {
        match self.state {
            DmaState::Idle => 0,
            DmaState::AlignmentCycle => {
                self.state = DmaState::Transferring { offset: 0 };
                if cpu_cycles % 2 == 0 { 1 } else { 2 }
            }
            DmaState::Transferring { offset } => {
                copy(u16::from_be_bytes([self.page, offset]), offset);
                self.state = match offset.checked_add(1) {
                    Some(next) => DmaState::Transferring { offset: next },
                    None => DmaState::Idle,
                };
                2
            }
        }
    }
}
