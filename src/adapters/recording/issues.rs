//! Recording adapter for the `IssueFieldSource` port.

use std::sync::{Arc, Mutex};

use crate::cassette::recorder::CassetteRecorder;
use crate::ports::issues::{FETCH_FIELDS, PORT_NAME};
use crate::ports::{FieldRequest, FieldsFuture, IssueFieldSource};

/// Records field fetches while delegating to an inner implementation.
pub struct RecordingIssueFieldSource {
    inner: Box<dyn IssueFieldSource>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingIssueFieldSource {
    /// Creates a recording source wrapping the given implementation.
    pub fn new(inner: Box<dyn IssueFieldSource>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl IssueFieldSource for RecordingIssueFieldSource {
    fn fetch_fields(&self, request: &FieldRequest) -> FieldsFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let result = self.inner.fetch_fields(&request).await;

            // Result serializes as {"Ok": ..} / {"Err": ..}, which is what the
            // replaying adapter decodes.
            let input = serde_json::to_value(&request).unwrap_or_default();
            let output = serde_json::to_value(&result).unwrap_or_default();
            match self.recorder.lock() {
                Ok(mut recorder) => recorder.record(PORT_NAME, FETCH_FIELDS, input, output),
                Err(_) => tracing::warn!("cassette recorder lock poisoned; interaction dropped"),
            }

            result
        })
    }
}
