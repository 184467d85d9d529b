//! Cassettes: YAML files of recorded issue-tracker calls, replayed in tests.

pub mod format;
pub mod recorder;
pub mod replayer;
