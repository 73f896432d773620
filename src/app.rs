use std::time::Duration;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::burst::Burst;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::machine::{State, TimerStateMachine};
use crate::observer::{EventQueue, GameEvent};

/// What a key or click asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Space / click: start when idle, react while a round is running
    Primary,
    Start,
    ResetStats,
    Quit,
    None,
}

pub fn action_for_key(key: KeyEvent) -> Action {
    // some platforms also report releases and repeats
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
        KeyCode::Char(' ') => Action::Primary,
        KeyCode::Char('s') | KeyCode::Enter => Action::Start,
        KeyCode::Char('r') => Action::ResetStats,
        _ => Action::None,
    }
}

pub fn action_for_mouse(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Action::Primary,
        _ => Action::None,
    }
}

/// Terminal front end state: owns the timing core and everything the
/// renderer needs that the core does not know about.
#[derive(Debug)]
pub struct App<C: Clock = SystemClock> {
    pub machine: TimerStateMachine<C>,
    pub burst: Burst,
    pub burst_enabled: bool,
    pub history_len: usize,
    pub last_score: Option<f64>,
    pub size: (u16, u16),
    events: EventQueue,
    last_frame: Duration,
}

impl<C: Clock> App<C> {
    pub fn new(mut machine: TimerStateMachine<C>, config: &Config) -> Self {
        let events = EventQueue::new();
        machine.subscribe(Box::new(events.clone()));
        let last_frame = machine.clock().now();

        Self {
            machine,
            burst: Burst::new(),
            burst_enabled: config.burst,
            history_len: config.history_len,
            last_score: None,
            size: (80, 24),
            events,
            last_frame,
        }
    }

    pub fn state(&self) -> State {
        self.machine.state()
    }

    /// Instructions stay up until the first round starts
    pub fn has_played(&self) -> bool {
        self.machine.has_played()
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.size = (width, height);
    }

    /// Apply an action. Returns false when the app should exit.
    pub fn handle(&mut self, action: Action) -> bool {
        match action {
            Action::Primary => self.primary(),
            Action::Start => {
                self.machine.start();
            }
            Action::ResetStats => self.reset_stats(),
            Action::Quit => return false,
            Action::None => {}
        }
        self.process_events();
        true
    }

    fn primary(&mut self) {
        match self.machine.state() {
            State::Idle | State::Complete => {
                self.machine.start();
            }
            State::Waiting | State::Ready => {
                self.machine.register_input();
            }
            State::FalseStart => {}
        }
    }

    fn reset_stats(&mut self) {
        self.machine.reset();
        self.last_score = None;
    }

    /// Fire due timers and step animations. Call before dispatching input.
    pub fn on_tick(&mut self) {
        self.machine.advance();

        let now = self.machine.clock().now();
        let dt = now.saturating_sub(self.last_frame).as_secs_f64();
        self.last_frame = now;
        self.burst.update(dt);

        // after the animation step, so a burst triggered by the cue starts fresh
        self.process_events();
    }

    /// Whether the screen changes between ticks
    pub fn is_animating(&self) -> bool {
        self.burst.is_active
    }

    /// How long the event loop may sleep before a timer is due
    pub fn time_until_next_deadline(&self) -> Option<Duration> {
        self.machine.time_until_next_deadline()
    }

    fn process_events(&mut self) {
        for event in self.events.drain() {
            match event {
                GameEvent::EnterWaiting => self.burst.clear(),
                GameEvent::EnterReady => {
                    if self.burst_enabled {
                        self.burst.trigger(self.size.0, self.size.1);
                    }
                }
                GameEvent::ValidAttempt(ms) => self.last_score = Some(ms),
                GameEvent::FalseStart | GameEvent::EnterIdle => {}
            }
        }
    }
}
