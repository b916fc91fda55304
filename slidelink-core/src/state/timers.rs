//! Software timers
//!
//! Timers are plain deadlines checked against a millisecond clock supplied
//! by [`Timers::advance`]. Expired timers are marked pending and handed out
//! one at a time by [`Timers::take_pending`], so a handler that disarms a
//! timer also drops an expiry that has not been delivered yet.

use super::events::TimerId;

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    armed: bool,
    deadline: u64,
    /// Reload period, 0 for one-shot
    period: u64,
    pending: bool,
}

/// Set of software timers, one per [`TimerId`]
#[derive(Debug, Clone, Default)]
pub struct Timers {
    now: u64,
    slots: [Slot; TimerId::COUNT],
}

impl Timers {
    /// Create a set with every timer disarmed
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time as last seen by [`advance`](Self::advance)
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Fire once, `delay_ms` from now
    pub fn arm_once(&mut self, id: TimerId, delay_ms: u64) {
        self.slots[id.index()] = Slot {
            armed: true,
            deadline: self.now + delay_ms,
            period: 0,
            pending: false,
        };
    }

    /// Fire every `period_ms`, first expiry one period from now
    pub fn arm_periodic(&mut self, id: TimerId, period_ms: u64) {
        self.slots[id.index()] = Slot {
            armed: true,
            deadline: self.now + period_ms,
            period: period_ms,
            pending: false,
        };
    }

    /// Stop a timer and drop any undelivered expiry
    pub fn disarm(&mut self, id: TimerId) {
        self.slots[id.index()] = Slot::default();
    }

    /// Check if a timer is armed or has an undelivered expiry
    pub fn is_active(&self, id: TimerId) -> bool {
        let slot = &self.slots[id.index()];
        slot.armed || slot.pending
    }

    /// Move the clock forward and mark expired timers pending
    ///
    /// A periodic timer that fell several periods behind fires once and
    /// resumes one period after `now_ms`.
    pub fn advance(&mut self, now_ms: u64) {
        self.now = self.now.max(now_ms);
        for slot in self.slots.iter_mut() {
            if !slot.armed || slot.deadline > self.now {
                continue;
            }
            slot.pending = true;
            if slot.period == 0 {
                slot.armed = false;
            } else {
                slot.deadline += slot.period;
                if slot.deadline <= self.now {
                    slot.deadline = self.now + slot.period;
                }
            }
        }
    }

    /// Take the next undelivered expiry
    pub fn take_pending(&mut self) -> Option<TimerId> {
        let id = TimerId::ALL
            .iter()
            .copied()
            .find(|id| self.slots[id.index()].pending)?;
        self.slots[id.index()].pending = false;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timers: &mut Timers) -> heapless::Vec<TimerId, 8> {
        let mut fired = heapless::Vec::new();
        while let Some(id) = timers.take_pending() {
            fired.push(id).unwrap();
        }
        fired
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = Timers::new();
        timers.arm_once(TimerId::Calibration, 500);
        timers.advance(499);
        assert!(drain(&mut timers).is_empty());
        timers.advance(500);
        assert_eq!(&drain(&mut timers)[..], &[TimerId::Calibration]);
        assert!(!timers.is_active(TimerId::Calibration));
        timers.advance(2000);
        assert!(drain(&mut timers).is_empty());
    }

    #[test]
    fn test_periodic_reloads() {
        let mut timers = Timers::new();
        timers.arm_periodic(TimerId::Send, 10);
        let mut count = 0;
        for t in 1..=100 {
            timers.advance(t);
            count += drain(&mut timers).len();
        }
        assert_eq!(count, 10);
    }

    #[test]
    fn test_late_periodic_fires_once() {
        let mut timers = Timers::new();
        timers.arm_periodic(TimerId::Send, 10);
        timers.advance(95);
        assert_eq!(drain(&mut timers).len(), 1);
        timers.advance(104);
        assert!(drain(&mut timers).is_empty());
        timers.advance(105);
        assert_eq!(drain(&mut timers).len(), 1);
    }

    #[test]
    fn test_disarm_drops_pending() {
        let mut timers = Timers::new();
        timers.arm_periodic(TimerId::FlashRate, 62);
        timers.arm_once(TimerId::Calibration, 62);
        timers.advance(62);
        assert_eq!(timers.take_pending(), Some(TimerId::FlashRate));
        timers.disarm(TimerId::Calibration);
        assert_eq!(timers.take_pending(), None);
    }

    #[test]
    fn test_arm_relative_to_last_advance() {
        let mut timers = Timers::new();
        timers.advance(1000);
        timers.arm_once(TimerId::FlashRate, 62);
        timers.advance(1061);
        assert!(timers.take_pending().is_none());
        timers.advance(1062);
        assert_eq!(timers.take_pending(), Some(TimerId::FlashRate));
    }
}
