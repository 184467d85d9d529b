//! Adapters implementing the port traits.
//!
//! `live` talks to the real tracker, `recording` wraps another adapter and
//! captures its calls, `replaying` answers from a cassette.

pub mod live;
pub mod recording;
pub mod replaying;
