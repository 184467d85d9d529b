//! Recording adapters that capture interactions to cassettes.

pub mod issues;

pub use issues::RecordingIssueFieldSource;
