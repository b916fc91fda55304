//! Operating-mode state machine
//!
//! The handheld is always in exactly one leaf of a small state hierarchy:
//!
//! ```text
//! On
//! ├── Uncalibrated
//! │   └── Flashing
//! └── Calibrated
//!     ├── FreeRun
//!     ├── Playback
//!     └── ZAxis
//! ```
//!
//! Events a state does not handle bubble up to its parent.

pub mod events;
pub mod machine;
pub mod timers;

pub use events::{Event, TimerId};
pub use machine::{Mode, Reaction, RunMode};
pub use timers::Timers;
