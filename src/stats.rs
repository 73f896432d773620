use chrono::{DateTime, Local};

use crate::util::{mean, std_dev};

/// One accepted reaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attempt {
    pub ms: f64,
    pub recorded_at: DateTime<Local>,
}

impl Attempt {
    pub fn new(ms: f64) -> Self {
        Self {
            ms,
            recorded_at: Local::now(),
        }
    }
}

/// In-memory attempt log with derived summary statistics.
///
/// Nothing is persisted; a fresh tracker starts empty. Summary getters return
/// `None` when there is no data yet.
#[derive(Debug, Default, Clone)]
pub struct StatsTracker {
    attempts: Vec<Attempt>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&mut self, ms: f64) {
        self.attempts.push(Attempt::new(ms));
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn durations(&self) -> Vec<f64> {
        self.attempts.iter().map(|a| a.ms).collect()
    }

    pub fn count(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn best(&self) -> Option<f64> {
        self.attempts.iter().map(|a| a.ms).reduce(f64::min)
    }

    pub fn average(&self) -> Option<f64> {
        mean(&self.durations())
    }

    /// Population standard deviation, a rough measure of consistency
    pub fn std_dev(&self) -> Option<f64> {
        std_dev(&self.durations())
    }

    pub fn last(&self) -> Option<&Attempt> {
        self.attempts.last()
    }

    pub fn reset(&mut self) {
        self.attempts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with(values: &[f64]) -> StatsTracker {
        let mut tracker = StatsTracker::new();
        for v in values {
            tracker.record_attempt(*v);
        }
        tracker
    }

    #[test]
    fn test_empty_tracker_has_no_data() {
        let tracker = StatsTracker::new();

        assert_eq!(tracker.count(), 0);
        assert!(tracker.is_empty());
        assert_eq!(tracker.best(), None);
        assert_eq!(tracker.average(), None);
        assert_eq!(tracker.std_dev(), None);
        assert!(tracker.last().is_none());
    }

    #[test]
    fn test_best_and_average() {
        let tracker = tracker_with(&[300.0, 100.0, 200.0]);

        assert_eq!(tracker.count(), 3);
        assert_eq!(tracker.best(), Some(100.0));
        assert_eq!(tracker.average(), Some(200.0));
    }

    #[test]
    fn test_log_keeps_insertion_order() {
        let tracker = tracker_with(&[320.5, 180.25, 401.0]);

        assert_eq!(tracker.durations(), vec![320.5, 180.25, 401.0]);
        assert_eq!(tracker.last().map(|a| a.ms), Some(401.0));
    }

    #[test]
    fn test_single_attempt() {
        let tracker = tracker_with(&[250.0]);

        assert_eq!(tracker.best(), Some(250.0));
        assert_eq!(tracker.average(), Some(250.0));
        assert_eq!(tracker.std_dev(), Some(0.0));
    }

    #[test]
    fn test_reset_empties_log() {
        let mut tracker = tracker_with(&[210.0, 190.0]);
        tracker.reset();

        assert_eq!(tracker.count(), 0);
        assert_eq!(tracker.best(), None);
        assert_eq!(tracker.average(), None);

        tracker.record_attempt(333.0);
        assert_eq!(tracker.durations(), vec![333.0]);
    }
}
