//! Control input abstractions
//!
//! Polled reads of the analog and quadrature controls. Button edges are
//! delivered as events by the firmware and are not part of this trait.

/// Mode selection switches on the transmitter face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeSwitch {
    /// Free-run switch
    FreeRun,
    /// Z-axis switch
    ZAxis,
}

/// Polled control inputs
pub trait ControlInputs {
    /// Raw quadrature count (4 counts per detent)
    fn encoder_count(&mut self) -> i32;

    /// Raw potentiometer reading
    fn pot_raw(&mut self) -> i32;

    /// Check whether a mode switch is asserted
    fn switch_on(&self, switch: ModeSwitch) -> bool;
}
