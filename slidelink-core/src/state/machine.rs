//! State hierarchy definition

use heapless::Vec;

/// Deepest nesting level (On → Calibrated → FreeRun)
pub const MAX_DEPTH: usize = 3;

/// Controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Root state, handles timers common to every mode
    On,
    /// Waiting for the two calibration endpoints
    Uncalibrated,
    /// Acknowledging a calibration press
    Flashing,
    /// Endpoints known; parent of the run modes
    Calibrated,
    /// Pot drives position, encoder drives speed
    FreeRun,
    /// Position buttons recall saved positions
    Playback,
    /// Encoder drives max speed, position buttons pick presets
    ZAxis,
}

/// Result of offering an event to one state handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reaction {
    /// Event consumed, no state change
    Handled,
    /// Event consumed, move to another state
    Transition(Mode),
    /// Not handled here, offer to the parent state
    Super,
}

impl Mode {
    /// Enclosing state, `None` for the root
    pub fn parent(self) -> Option<Mode> {
        match self {
            Mode::On => None,
            Mode::Uncalibrated | Mode::Calibrated => Some(Mode::On),
            Mode::Flashing => Some(Mode::Uncalibrated),
            Mode::FreeRun | Mode::Playback | Mode::ZAxis => Some(Mode::Calibrated),
        }
    }

    /// Check if `self` strictly encloses `other`
    pub fn is_ancestor_of(self, other: Mode) -> bool {
        let mut state = other.parent();
        while let Some(s) = state {
            if s == self {
                return true;
            }
            state = s.parent();
        }
        false
    }

    /// States from the root down to `self`, inclusive
    pub fn path(self) -> Vec<Mode, MAX_DEPTH> {
        let mut path = Vec::new();
        let mut state = Some(self);
        while let Some(s) = state {
            // Hierarchy depth is fixed at MAX_DEPTH
            let _ = path.insert(0, s);
            state = s.parent();
        }
        path
    }

    /// Check if this state is calibrated (a run mode or their parent)
    pub fn is_calibrated(self) -> bool {
        self == Mode::Calibrated || Mode::Calibrated.is_ancestor_of(self)
    }
}

/// Run mode selected by the mode switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunMode {
    FreeRun,
    Playback,
    ZAxis,
}

impl RunMode {
    /// Decode the switch positions
    ///
    /// The free-run switch wins over the Z switch; with neither on the
    /// handheld is in playback.
    pub fn from_switches(free_run: bool, z_axis: bool) -> Self {
        if free_run {
            RunMode::FreeRun
        } else if z_axis {
            RunMode::ZAxis
        } else {
            RunMode::Playback
        }
    }

    /// State entered for this run mode
    pub fn mode(self) -> Mode {
        match self {
            RunMode::FreeRun => Mode::FreeRun,
            RunMode::Playback => Mode::Playback,
            RunMode::ZAxis => Mode::ZAxis,
        }
    }

    /// Position units per encoder detent while calibrating
    pub fn calibration_multiplier(self) -> u8 {
        match self {
            RunMode::Playback => 40,
            RunMode::ZAxis => 80,
            RunMode::FreeRun => 8,
        }
    }
}
