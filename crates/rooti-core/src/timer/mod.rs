pub mod display;
mod engine;
mod ticker;

pub use engine::{RoutineProgress, TimerEngine, TimerState, DEFAULT_TICK_PERIOD_MS};
pub use ticker::{TickHandle, TickSlot};
