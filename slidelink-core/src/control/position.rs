//! Pot position filtering and mapping

/// Linear interpolation of `x` from `[in_min, in_max]` onto
/// `[out_min, out_max]`
///
/// Integer arithmetic truncating toward zero. A degenerate input range
/// maps everything to `out_min`.
pub fn map_range(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    let in_span = in_max as i64 - in_min as i64;
    if in_span == 0 {
        return out_min;
    }
    let out_span = out_max as i64 - out_min as i64;
    let mapped = (x as i64 - in_min as i64) * out_span / in_span + out_min as i64;
    mapped.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Rejects pot readings that flicker between two adjacent values
///
/// A reading is accepted only if it differs from both of the last two
/// accepted readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterFilter {
    history: [i32; 2],
}

impl Default for JitterFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl JitterFilter {
    /// Create a filter that accepts any real ADC reading first
    pub const fn new() -> Self {
        Self { history: [-1, -1] }
    }

    /// Offer a reading; returns true if it was accepted
    pub fn accept(&mut self, raw: i32) -> bool {
        if raw == self.history[0] || raw == self.history[1] {
            return false;
        }
        self.history = [self.history[1], raw];
        true
    }

    /// Last two accepted readings, oldest first
    pub fn history(&self) -> [i32; 2] {
        self.history
    }
}
