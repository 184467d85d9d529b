//! Transition validation.
//!
//! A transition is allowed only when the issue carries both a start date and
//! a due date. Anything that prevents reading them blocks the transition.

mod verdict;

pub use verdict::Verdict;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::ServiceContext;
use crate::ports::{FetchError, FieldRequest, IssueSnapshot};

/// Field key of the due date.
pub const DUE_DATE_FIELD: &str = "duedate";

/// Message returned when field state cannot be determined.
pub const ADMIN_CONTACT_MESSAGE: &str =
    "Unable to validate date fields. Please contact your Jira administrator.";

const START_DATE_LABEL: &str = "Start Date";
const DUE_DATE_LABEL: &str = "Due Date";

/// The issue a transition was requested for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueReference {
    /// Opaque issue key supplied by the host.
    pub key: String,
}

impl IssueReference {
    /// Creates a reference to the issue with the given key.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// The two dates a transition depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueFields {
    /// Value of the due-date field.
    pub due_date: Option<NaiveDate>,
    /// Value of the configured start-date field.
    pub start_date: Option<NaiveDate>,
}

impl IssueFields {
    /// Extracts both dates from a fetched snapshot.
    ///
    /// Absent keys, `null` and empty strings count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Malformed`] if either field holds something other
    /// than a date string.
    pub fn from_snapshot(
        snapshot: &IssueSnapshot,
        start_date_field: &str,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            due_date: read_date(snapshot, DUE_DATE_FIELD)?,
            start_date: read_date(snapshot, start_date_field)?,
        })
    }

    /// Display names of unset fields, start date first.
    #[must_use]
    pub fn missing_labels(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.start_date.is_none() {
            missing.push(START_DATE_LABEL);
        }
        if self.due_date.is_none() {
            missing.push(DUE_DATE_LABEL);
        }
        missing
    }

    /// The verdict these field values produce.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        let missing = self.missing_labels();
        if missing.is_empty() {
            Verdict::allow()
        } else {
            Verdict::block(format!(
                "{} must be set before transitioning this issue.",
                missing.join(" and ")
            ))
        }
    }
}

fn read_date(snapshot: &IssueSnapshot, field: &str) -> Result<Option<NaiveDate>, FetchError> {
    match snapshot.fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(None),
        Some(Value::String(raw)) => parse_date(raw).map(Some).ok_or_else(|| {
            FetchError::Malformed(format!("field {field:?} is not a date: {raw:?}"))
        }),
        Some(other) => {
            Err(FetchError::Malformed(format!("field {field:?} has unexpected value {other}")))
        }
    }
}

/// Accepts `YYYY-MM-DD` or a full timestamp, keeping only the date part.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z").ok().map(|dt| dt.date_naive())
        })
}

/// Decides whether `issue` may transition.
///
/// Issues exactly one fetch. A fetch failure or unreadable response blocks
/// with [`ADMIN_CONTACT_MESSAGE`]; nothing is retried and no error escapes.
pub async fn validate(ctx: &ServiceContext, issue: &IssueReference) -> Verdict {
    let request = FieldRequest::new(&issue.key, [DUE_DATE_FIELD, ctx.start_date_field.as_str()]);

    let fields = ctx
        .issues
        .fetch_fields(&request)
        .await
        .and_then(|snapshot| IssueFields::from_snapshot(&snapshot, &ctx.start_date_field));

    let verdict = match fields {
        Ok(fields) => fields.verdict(),
        Err(err) => {
            tracing::warn!(issue = %issue.key, error = %err, "cannot read date fields; blocking");
            Verdict::block(ADMIN_CONTACT_MESSAGE)
        }
    };

    tracing::info!(
        issue = %issue.key,
        allowed = verdict.allowed(),
        reason = verdict.message().unwrap_or(""),
        "transition verdict"
    );
    verdict
}
