//! Tick simulation module
//!
//! The generic fixed-cadence loop shared by the arcade games:
//! - Virtual clock only (the host forwards elapsed time)
//! - Seeded RNG only
//! - One engine-owned timer set per game instance
//! - No rendering or platform dependencies

pub mod collision;
pub mod engine;
pub mod timer;

pub use collision::{Aabb, reflect_away};
pub use engine::{Engine, Phase, SimEvent, Snapshot, TickGame, TickOutcome};
pub use timer::{TimerId, TimerKind, TimerSpec, Timers};
