//! Test support: an in-memory driver that journals every call the builder makes.
//!
//! Enabled for this crate's own tests and, for downstream crates, behind the `test-utils`
//! feature.

mod recording;

pub use recording::{Event, Journal, RecordingCommand, RecordingConnection, RecordingCursor};
