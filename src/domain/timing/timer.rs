//! Single-shot auto-hide timer

use super::Millis;

/// Deadline-based auto-hide timer.
///
/// At most one fire is ever pending: arming replaces the previous deadline.
/// The timer never calls anything itself; the owner polls it with the
/// current instant and acts on the returned fire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoHideTimer {
    deadline: Option<Millis>,
    generation: u64,
}

impl AutoHideTimer {
    /// Create a timer with nothing pending
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a fire `delay_ms` after `now`, cancelling any pending fire
    pub fn arm(&mut self, now: Millis, delay_ms: u64) {
        self.deadline = Some(now.saturating_add(delay_ms));
        self.generation = self.generation.wrapping_add(1);
    }

    /// Cancel the pending fire, if any
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Deadline of the pending fire
    pub fn deadline(&self) -> Option<Millis> {
        self.deadline
    }

    /// Whether a fire is pending
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Number of times the timer has been armed
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Consume the pending fire if its deadline has passed.
    ///
    /// Returns true exactly once per arm.
    pub fn fire_if_due(&mut self, now: Millis) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timer_has_nothing_pending() {
        let timer = AutoHideTimer::new();
        assert!(!timer.is_pending());
        assert_eq!(timer.deadline(), None);
    }

    #[test]
    fn rearming_replaces_previous_deadline() {
        let mut timer = AutoHideTimer::new();
        for i in 0..10 {
            timer.arm(i * 100, 3000);
        }
        assert_eq!(timer.deadline(), Some(900 + 3000));
        assert_eq!(timer.generation(), 10);

        // Only the last deadline fires, and only once
        assert!(!timer.fire_if_due(3000));
        assert!(timer.fire_if_due(3900));
        assert!(!timer.fire_if_due(3901));
        assert!(!timer.fire_if_due(100_000));
    }

    #[test]
    fn cancel_drops_pending_fire() {
        let mut timer = AutoHideTimer::new();
        timer.arm(0, 1000);
        timer.cancel();
        assert!(!timer.fire_if_due(5000));
    }

    #[test]
    fn fire_exactly_at_deadline() {
        let mut timer = AutoHideTimer::new();
        timer.arm(500, 3000);
        assert!(!timer.fire_if_due(3499));
        assert!(timer.fire_if_due(3500));
    }
}
