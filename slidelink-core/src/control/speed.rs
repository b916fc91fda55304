//! Encoder speed percent
//!
//! The encoder is read relative to a baseline, four counts per percent.
//! Turning past either rail by more than [`SLOP`] percent moves the
//! baseline so that turning back responds immediately instead of first
//! unwinding the overshoot.

use super::COUNTS_PER_DETENT;

/// Lowest reported percent
pub const MIN_PERCENT: i32 = 1;

/// Highest reported percent
pub const MAX_PERCENT: i32 = 100;

/// Percent reported right after entering a run mode
pub const START_PERCENT: i32 = 50;

/// Overshoot tolerated past a rail before re-basing
pub const SLOP: i32 = 2;

const COUNTS_PER_PERCENT: i64 = COUNTS_PER_DETENT as i64;

/// Speed percent derived from the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpeedPercent {
    baseline: i64,
    previous: Option<i32>,
}

impl SpeedPercent {
    /// Re-base so the current encoder reading reads `start`
    ///
    /// Also forgets the last reported value so the next
    /// [`update`](Self::update) reports.
    pub fn init(&mut self, encoder: i32, start: i32) {
        self.baseline = encoder as i64 - start as i64 * COUNTS_PER_PERCENT;
        self.previous = None;
    }

    /// Percent for this encoder reading, without change tracking
    fn read(&mut self, encoder: i32) -> i32 {
        let encoder = encoder as i64;
        let raw = (encoder - self.baseline) / COUNTS_PER_PERCENT;

        if raw < -(SLOP as i64) {
            self.baseline = encoder - MIN_PERCENT as i64 * COUNTS_PER_PERCENT;
        } else if raw > (MAX_PERCENT + SLOP) as i64 {
            self.baseline = encoder - MAX_PERCENT as i64 * COUNTS_PER_PERCENT;
        }

        raw.clamp(MIN_PERCENT as i64, MAX_PERCENT as i64) as i32
    }

    /// Percent for this encoder reading, if it changed since last reported
    pub fn update(&mut self, encoder: i32) -> Option<i32> {
        let percent = self.read(encoder);
        if self.previous == Some(percent) {
            return None;
        }
        self.previous = Some(percent);
        Some(percent)
    }

    /// Last reported percent
    pub fn previous(&self) -> Option<i32> {
        self.previous
    }
}
