use core::fmt::Debug;

use dyn_clone::DynClone;

/// Message produced by a write observer and applied by the machine right
/// after the access that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Begin an OAM DMA transfer from CPU page `page`.
    StartOamDma { page: u8 },
    /// Raise one IRQ request on the CPU.
    RequestIrq,
}

/// Callback attached to one CPU address.
///
/// Invoked synchronously with the written value after the write has been
/// committed to memory.
pub trait WriteObserver: Debug + DynClone {
    fn on_write(&mut self, value: u8) -> Option<Signal>;
}

dyn_clone::clone_trait_object!(WriteObserver);

/// `$4014`: starts OAM DMA from the written page.
#[derive(Debug, Clone, Copy, Default)]
pub struct OamDmaTrigger;

impl WriteObserver for OamDmaTrigger {
    fn on_write(&mut self, value: u8) -> Option<Signal> {
        Some(Signal::StartOamDma { page: value })
    }
}

/// `$4017`: writing `$00` raises a frame IRQ request.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameIrqTrigger;

impl WriteObserver for FrameIrqTrigger {
    fn on_write(&mut self, value: u8) -> Option<Signal> {
        (value == 0x00).then_some(Signal::RequestIrq)
    }
}
