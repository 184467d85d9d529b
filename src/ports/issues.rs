//! Issue field source port for reading field values off an issue.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Port name under which calls are recorded in cassettes.
pub const PORT_NAME: &str = "issues";
/// Method name under which [`IssueFieldSource::fetch_fields`] calls are recorded.
pub const FETCH_FIELDS: &str = "fetch_fields";

/// Boxed future type alias used by [`IssueFieldSource`] to keep the trait dyn-compatible.
pub type FieldsFuture<'a> =
    Pin<Box<dyn Future<Output = Result<IssueSnapshot, FetchError>> + Send + 'a>>;

/// A request for a subset of an issue's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRequest {
    /// The issue key (e.g. `"PROJ-1"`), passed through untouched.
    pub key: String,
    /// Field keys to select, in request order.
    pub fields: Vec<String>,
}

impl FieldRequest {
    /// Creates a request for the given issue key and field keys.
    pub fn new<I, S>(key: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { key: key.into(), fields: fields.into_iter().map(Into::into).collect() }
    }
}

/// Whether `key` can be sent as a field key in a `fields=` query.
///
/// Keys are limited to ASCII letters, digits, `_`, `-` and `.`, which covers
/// system fields (`duedate`) and custom fields (`customfield_10015`).
#[must_use]
pub fn is_field_key(key: &str) -> bool {
    !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'))
}

/// Raw `fields` object returned for one issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueSnapshot {
    /// Field key to JSON value, exactly as the service returned it.
    pub fields: Map<String, Value>,
}

/// Failure to obtain an [`IssueSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FetchError {
    /// The service answered with a non-success status.
    #[error("issue API returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
    /// The request never produced a response (connect, TLS, timeout).
    #[error("issue API request failed: {0}")]
    Transport(String),
    /// The request could not be expressed as a URL.
    #[error("invalid issue API request: {0}")]
    InvalidRequest(String),
    /// A response arrived but its body did not have the expected shape.
    #[error("issue API response is malformed: {0}")]
    Malformed(String),
}

/// Reads field values for an issue from an external tracker.
///
/// Abstracting the tracker keeps validation testable and lets calls be
/// recorded to and replayed from cassettes.
pub trait IssueFieldSource: Send + Sync {
    /// Fetches the requested fields for one issue.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the service cannot be reached, rejects the
    /// request, or answers with an unexpected body.
    fn fetch_fields(&self, request: &FieldRequest) -> FieldsFuture<'_>;
}
