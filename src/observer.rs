use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Notification emitted by the state machine after each transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    EnterWaiting,
    EnterReady,
    FalseStart,
    ValidAttempt(f64),
    EnterIdle,
}

/// Subscriber to state machine notifications.
///
/// Implement the specific hooks you care about, or override `on_event` to
/// receive everything through one entry point.
pub trait GameObserver {
    fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::EnterWaiting => self.on_enter_waiting(),
            GameEvent::EnterReady => self.on_enter_ready(),
            GameEvent::FalseStart => self.on_false_start(),
            GameEvent::ValidAttempt(ms) => self.on_valid_attempt(ms),
            GameEvent::EnterIdle => self.on_enter_idle(),
        }
    }

    fn on_enter_waiting(&mut self) {}
    fn on_enter_ready(&mut self) {}
    fn on_false_start(&mut self) {}
    fn on_valid_attempt(&mut self, _ms: f64) {}
    fn on_enter_idle(&mut self) {}
}

/// Observer that buffers events for a consumer on the same thread to drain.
///
/// Clones share one buffer: subscribe one clone to the machine and keep the
/// other to read from.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Rc<RefCell<VecDeque<GameEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<GameEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl GameObserver for EventQueue {
    fn on_event(&mut self, event: GameEvent) {
        self.events.borrow_mut().push_back(event);
    }
}
