//! Platform abstraction layer
//!
//! Normalizes raw input events (key names, pointer taps) into the intents the
//! engines understand. Event sourcing itself (DOM listeners, terminal, replay
//! logs) belongs to the host.

pub mod input;
