//! Events that drive the mode controller

use super::machine::RunMode;

/// Software timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerId {
    /// Periodic control sample and send
    Send,
    /// LED flash rate, also the one-shot slot-save indicator
    FlashRate,
    /// Calibration flash duration, or button hold to re-calibrate
    Calibration,
    /// Radio liveness probe
    Alive,
    /// Max speed / accel resync
    SpeedAndAccel,
    /// Debounced settings flush
    FlushSettings,
}

impl TimerId {
    /// Number of timers
    pub const COUNT: usize = 6;

    /// All timers, in firing priority order
    pub const ALL: [TimerId; Self::COUNT] = [
        TimerId::Send,
        TimerId::FlashRate,
        TimerId::Calibration,
        TimerId::Alive,
        TimerId::SpeedAndAccel,
        TimerId::FlushSettings,
    ];

    /// Slot index in timer tables
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Events that the mode controller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Input events
    /// Encoder push button pressed
    ButtonDown,
    /// Encoder push button released
    ButtonUp,
    /// Position (slot) button pressed
    PositionButton(u8),
    /// Mode switches now select this run mode
    ModeSwitch(RunMode),

    // Settings events
    /// Preset or channel changed; re-apply radio parameters
    UpdateParams,

    // Timer events
    /// A software timer expired
    Timeout(TimerId),
}

impl Event {
    /// Check if this event comes from the physical controls
    pub fn is_input_event(&self) -> bool {
        matches!(
            self,
            Event::ButtonDown | Event::ButtonUp | Event::PositionButton(_) | Event::ModeSwitch(_)
        )
    }

    /// Check if this event is a timer expiry
    pub fn is_timer_event(&self) -> bool {
        matches!(self, Event::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_events() {
        assert!(Event::ButtonDown.is_input_event());
        assert!(Event::PositionButton(2).is_input_event());
        assert!(Event::ModeSwitch(RunMode::ZAxis).is_input_event());
        assert!(!Event::UpdateParams.is_input_event());
        assert!(!Event::Timeout(TimerId::Send).is_input_event());
    }

    #[test]
    fn test_timer_events() {
        assert!(Event::Timeout(TimerId::Alive).is_timer_event());
        assert!(!Event::ButtonUp.is_timer_event());
    }

    #[test]
    fn test_timer_indices_match_table() {
        for (i, id) in TimerId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }
}
