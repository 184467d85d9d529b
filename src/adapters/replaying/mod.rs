//! Replaying adapters that answer from recorded interactions.

pub mod issues;

pub use issues::ReplayingIssueFieldSource;
