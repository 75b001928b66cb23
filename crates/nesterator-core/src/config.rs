/// Machine-wide options fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Record a golden-log trace line for every executed instruction.
    pub trace_cpu: bool,
    /// Drop the last pre-render dot on odd frames while rendering is enabled.
    /// Off by default, so every frame is 341 * 262 dots.
    pub skip_odd_frame_dot: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_cpu: false,
            skip_odd_frame_dot: false,
        }
    }
}

/// Flavour of reset applied by [`crate::Nes::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResetKind {
    /// Cold start: memory cleared, registers at their documented power-up values.
    #[default]
    PowerOn,
    /// Reset button: memory kept, SP decremented by three, interrupts disabled.
    Soft,
}
