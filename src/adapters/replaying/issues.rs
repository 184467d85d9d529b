//! Replaying adapter for the `IssueFieldSource` port.

use std::sync::{Arc, Mutex};

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::issues::{FETCH_FIELDS, PORT_NAME};
use crate::ports::{FetchError, FieldRequest, FieldsFuture, IssueFieldSource, IssueSnapshot};

/// Serves recorded field fetches from a cassette.
pub struct ReplayingIssueFieldSource {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingIssueFieldSource {
    /// Create a replaying source backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }

    fn next_result(&self) -> Result<IssueSnapshot, FetchError> {
        let interaction = self
            .replayer
            .lock()
            .map_err(|_| FetchError::Transport("cassette replayer lock poisoned".into()))?
            .next_interaction(PORT_NAME, FETCH_FIELDS);

        let seq = interaction.seq;
        serde_json::from_value::<Result<IssueSnapshot, FetchError>>(interaction.output)
            .unwrap_or_else(|e| {
                Err(FetchError::Malformed(format!(
                    "cassette interaction seq={seq} is not a fetch result: {e}"
                )))
            })
    }
}

impl IssueFieldSource for ReplayingIssueFieldSource {
    fn fetch_fields(&self, _request: &FieldRequest) -> FieldsFuture<'_> {
        let result = self.next_result();
        Box::pin(async move { result })
    }
}
