use std::fmt;
use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::observer::{GameEvent, GameObserver};
use crate::stats::StatsTracker;
use crate::timer::{OneShot, TimerHandle};

pub const DEFAULT_MIN_DELAY_MS: u64 = 1_000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 5_000;
pub const DEFAULT_DISPLAY_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum State {
    Idle,
    Waiting,
    Ready,
    FalseStart,
    Complete,
}

/// What a call to [`TimerStateMachine::register_input`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputOutcome {
    FalseStart,
    Valid(f64),
    Ignored,
}

/// Cue delay window and post-round display time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingConfig {
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub display: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(DEFAULT_MIN_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
            display: Duration::from_millis(DEFAULT_DISPLAY_MS),
        }
    }
}

impl TimingConfig {
    pub fn from_millis(min_delay_ms: u64, max_delay_ms: u64, display_ms: u64) -> Self {
        Self {
            min_delay: Duration::from_millis(min_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
            display: Duration::from_millis(display_ms),
        }
    }

    /// The delay window must be non-empty
    pub fn is_valid(&self) -> bool {
        self.min_delay < self.max_delay
    }
}

/// Reaction-timing state machine.
///
/// Cycle: Idle -> Waiting -> (Ready -> Complete | FalseStart) -> Idle, with
/// Complete -> Waiting allowed through `start()`. Commands that do not apply
/// to the current state are ignored. Deadlines are only observed when the
/// owner calls [`TimerStateMachine::advance`]; an input always acts on the
/// state the machine is in at that moment, so input that lands in `Waiting`
/// before `advance` has fired the cue is a false start even if the cue
/// deadline has already passed.
pub struct TimerStateMachine<C: Clock = SystemClock> {
    state: State,
    clock: C,
    rng: StdRng,
    timing: TimingConfig,
    cue: OneShot,
    display: OneShot,
    // handles of the arming that belongs to the current round
    round_cue: Option<TimerHandle>,
    round_display: Option<TimerHandle>,
    cue_time: Option<Duration>,
    last_reaction: Option<f64>,
    has_played: bool,
    stats: StatsTracker,
    observers: Vec<Box<dyn GameObserver>>,
}

impl Default for TimerStateMachine<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock::new(), TimingConfig::default())
    }
}

impl<C: Clock> TimerStateMachine<C> {
    pub fn new(clock: C, timing: TimingConfig) -> Self {
        Self::with_rng(clock, timing, StdRng::from_entropy())
    }

    /// Deterministic cue delays, for tests and reproducible runs
    pub fn with_seed(clock: C, timing: TimingConfig, seed: u64) -> Self {
        Self::with_rng(clock, timing, StdRng::seed_from_u64(seed))
    }

    fn with_rng(clock: C, timing: TimingConfig, rng: StdRng) -> Self {
        let timing = if timing.is_valid() {
            timing
        } else {
            debug!(?timing, "empty delay window, using defaults");
            TimingConfig {
                display: timing.display,
                ..TimingConfig::default()
            }
        };

        Self {
            state: State::Idle,
            clock,
            rng,
            timing,
            cue: OneShot::new(),
            display: OneShot::new(),
            round_cue: None,
            round_display: None,
            cue_time: None,
            last_reaction: None,
            has_played: false,
            stats: StatsTracker::new(),
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// When the armed cue is due, if one is pending
    pub fn pending_cue_at(&self) -> Option<Duration> {
        self.cue.fire_at()
    }

    pub fn cue_time(&self) -> Option<Duration> {
        self.cue_time
    }

    /// Most recent valid reaction time in milliseconds
    pub fn last_reaction(&self) -> Option<f64> {
        self.last_reaction
    }

    /// Whether a round has ever been started
    pub fn has_played(&self) -> bool {
        self.has_played
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.cue.fire_at(), self.display.fire_at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn time_until_next_deadline(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.next_deadline().map(|at| at.saturating_sub(now))
    }

    /// Begin a round. Accepted from Idle or Complete only.
    pub fn start(&mut self) -> bool {
        if !matches!(self.state, State::Idle | State::Complete) {
            trace!(state = %self.state, "start ignored");
            return false;
        }

        // a finished round's display timer must not cut into the new round
        self.display.cancel();
        self.round_display = None;

        let delay = self.draw_delay();
        let fire_at = self.clock.now() + delay;
        self.round_cue = Some(self.cue.arm(fire_at));
        self.cue_time = None;
        self.has_played = true;
        debug!(delay_ms = delay.as_millis() as u64, "cue scheduled");

        self.transition(State::Waiting);
        self.emit(GameEvent::EnterWaiting);
        true
    }

    /// Evaluate a player action against the current state
    pub fn register_input(&mut self) -> InputOutcome {
        let now = self.clock.now();

        match self.state {
            State::Waiting => {
                self.cue.cancel();
                self.round_cue = None;
                self.transition(State::FalseStart);
                self.round_display = Some(self.display.arm(now + self.timing.display));
                self.emit(GameEvent::FalseStart);
                InputOutcome::FalseStart
            }
            State::Ready => {
                let cue_time = self.cue_time.take().unwrap_or(now);
                let ms = now.saturating_sub(cue_time).as_nanos() as f64 / 1_000_000.0;
                self.stats.record_attempt(ms);
                self.last_reaction = Some(ms);
                debug!(reaction_ms = ms, attempts = self.stats.count(), "valid attempt");

                self.transition(State::Complete);
                self.round_display = Some(self.display.arm(now + self.timing.display));
                self.emit(GameEvent::ValidAttempt(ms));
                InputOutcome::Valid(ms)
            }
            State::Idle | State::FalseStart | State::Complete => {
                trace!(state = %self.state, "input ignored");
                InputOutcome::Ignored
            }
        }
    }

    /// Clear the attempt log. The current round is unaffected.
    pub fn reset(&mut self) {
        debug!(cleared = self.stats.count(), "stats reset");
        self.stats.reset();
    }

    /// Fire any timers whose deadline has passed
    pub fn advance(&mut self) {
        let now = self.clock.now();

        if let Some(handle) = self.cue.take_due(now) {
            self.on_cue(handle, now);
        }

        if let Some(handle) = self.display.take_due(now) {
            self.on_display_elapsed(handle);
        }
    }

    fn on_cue(&mut self, handle: TimerHandle, now: Duration) {
        if self.state != State::Waiting || self.round_cue.take() != Some(handle) {
            trace!(state = %self.state, ?handle, "stale cue ignored");
            return;
        }

        self.cue_time = Some(now);
        self.transition(State::Ready);
        self.emit(GameEvent::EnterReady);
    }

    fn on_display_elapsed(&mut self, handle: TimerHandle) {
        let current = self.round_display.take() == Some(handle);
        if !current || !matches!(self.state, State::FalseStart | State::Complete) {
            trace!(state = %self.state, ?handle, "stale display timer ignored");
            return;
        }

        self.transition(State::Idle);
        self.emit(GameEvent::EnterIdle);
    }

    fn draw_delay(&mut self) -> Duration {
        self.rng.gen_range(self.timing.min_delay..self.timing.max_delay)
    }

    fn transition(&mut self, to: State) {
        debug!(from = %self.state, to = %to, "state transition");
        self.state = to;
    }

    fn emit(&mut self, event: GameEvent) {
        for observer in self.observers.iter_mut() {
            observer.on_event(event);
        }
    }
}

impl<C: Clock> fmt::Debug for TimerStateMachine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerStateMachine")
            .field("state", &self.state)
            .field("timing", &self.timing)
            .field("cue", &self.cue)
            .field("display", &self.display)
            .field("round_cue", &self.round_cue)
            .field("round_display", &self.round_display)
            .field("cue_time", &self.cue_time)
            .field("last_reaction", &self.last_reaction)
            .field("attempts", &self.stats.count())
            .field("observers", &self.observers.len())
            .finish()
    }
}
