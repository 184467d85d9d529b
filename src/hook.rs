//! Wire types exchanged with the host workflow engine.

use serde::{Deserialize, Serialize};

use crate::validate::{IssueReference, Verdict};

/// Invocation payload: `{"issue": {"key": "PROJ-1"}}`.
///
/// Other members the host sends (issue id, transition details) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookPayload {
    /// The issue being transitioned.
    pub issue: IssueReference,
}

impl HookPayload {
    /// Parses a payload from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or lacks `issue.key`.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Response handed back to the host: `{"result": bool, "errorMessage"?: string}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookResponse {
    /// `true` lets the transition proceed.
    pub result: bool,
    /// Shown to the user when the transition is blocked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<Verdict> for HookResponse {
    fn from(verdict: Verdict) -> Self {
        let (result, error_message) = verdict.into_parts();
        Self { result, error_message }
    }
}
