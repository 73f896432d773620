// Library surface for the binary, headless/integration tests, and reuse
// of the timing core with a different front end.
pub mod app;
pub mod app_dirs;
pub mod burst;
pub mod clock;
pub mod config;
pub mod logging;
pub mod machine;
pub mod observer;
pub mod rating;
pub mod runtime;
pub mod stats;
pub mod timer;
pub mod ui;
pub mod util;

pub use machine::{InputOutcome, State, TimerStateMachine, TimingConfig};
pub use observer::{GameEvent, GameObserver};
pub use rating::Rating;
pub use stats::StatsTracker;
