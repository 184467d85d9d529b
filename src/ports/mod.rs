//! Port traits defining external boundaries.
//!
//! The only boundary is the issue tracker's field API. Implementations live
//! in `src/adapters/`.

pub mod issues;

pub use issues::{
    is_field_key, FetchError, FieldRequest, FieldsFuture, IssueFieldSource, IssueSnapshot,
};
