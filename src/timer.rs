use std::time::Duration;

/// Identifies one arming of a [`OneShot`]. Re-arming yields a new handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
struct Armed {
    handle: TimerHandle,
    fire_at: Duration,
}

/// A cancellable single-shot deadline, polled by its owner.
///
/// The timer never runs anything itself: the owner asks [`OneShot::take_due`]
/// whether the deadline has passed. Once cancelled or taken the slot is empty,
/// so a cancelled timer can never be observed as due.
#[derive(Debug, Default)]
pub struct OneShot {
    armed: Option<Armed>,
    generation: u64,
}

impl OneShot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer for `fire_at`, replacing any previous deadline.
    pub fn arm(&mut self, fire_at: Duration) -> TimerHandle {
        self.generation += 1;
        let handle = TimerHandle(self.generation);
        self.armed = Some(Armed { handle, fire_at });
        handle
    }

    /// Disarm the timer. Returns true if a deadline was pending.
    /// Calling this on an idle timer is a no-op.
    pub fn cancel(&mut self) -> bool {
        self.armed.take().is_some()
    }

    pub fn fire_at(&self) -> Option<Duration> {
        self.armed.map(|a| a.fire_at)
    }

    /// Disarm and return the handle if the deadline is at or before `now`.
    pub fn take_due(&mut self, now: Duration) -> Option<TimerHandle> {
        match self.armed {
            Some(armed) if armed.fire_at <= now => {
                self.armed = None;
                Some(armed.handle)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn fires_once_at_deadline() {
        let mut timer = OneShot::new();
        let handle = timer.arm(ms(100));

        assert_eq!(timer.take_due(ms(99)), None);
        assert_eq!(timer.take_due(ms(100)), Some(handle));
        assert_eq!(timer.take_due(ms(500)), None);
        assert_eq!(timer.fire_at(), None);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timer = OneShot::new();
        timer.arm(ms(100));

        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert_eq!(timer.take_due(ms(1_000)), None);
    }

    #[test]
    fn rearming_issues_fresh_handle() {
        let mut timer = OneShot::new();
        let first = timer.arm(ms(100));
        let second = timer.arm(ms(300));

        assert_ne!(first, second);
        assert_eq!(timer.take_due(ms(100)), None);
        assert_eq!(timer.take_due(ms(300)), Some(second));
    }

    #[test]
    fn cancel_then_rearm_reports_only_the_new_arming() {
        let mut timer = OneShot::new();
        let stale = timer.arm(ms(50));
        timer.cancel();
        let fresh = timer.arm(ms(80));

        assert_eq!(timer.fire_at(), Some(ms(80)));
        let fired = timer.take_due(ms(100));
        assert_eq!(fired, Some(fresh));
        assert_ne!(fired, Some(stale));
    }
}
