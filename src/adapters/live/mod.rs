//! Live adapters for real external interactions.

pub mod issues;

pub use issues::LiveIssueFieldSource;
