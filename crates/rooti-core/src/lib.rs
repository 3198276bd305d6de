//! # Rooti Core Library
//!
//! Core logic of the Rooti study/break routine timer. A user builds an
//! ordered routine of study and break segments, runs a countdown through
//! them, and collects a log of completed segments and pauses.
//!
//! ## Architecture
//!
//! - **Routine**: validated segments in an ordered store
//! - **Timer Engine**: a tick-driven state machine; the caller delivers one
//!   tick per period with the handle the engine issued
//! - **Session**: command dispatcher tying routine, engine, pause prompt and
//!   log sink together for a UI adapter
//! - **Config**: TOML configuration (tick period, defaults, presets)
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`Session`]: Command surface used by front ends
//! - [`LogSink`]: Seam for whatever stores and shows log entries
//! - [`Config`]: Application configuration management

pub mod config;
pub mod error;
pub mod events;
pub mod log;
pub mod pause;
pub mod routine;
pub mod session;
pub mod timer;

pub use config::Config;
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use log::{LogEntry, LogLabel, LogSink, MemoryLog};
pub use pause::{PausePrompt, PromptState};
pub use routine::{RoutineStore, Segment, SegmentKind};
pub use session::Session;
pub use timer::{RoutineProgress, TickHandle, TimerEngine, TimerState};
