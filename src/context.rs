//! Service context bundling the issue port with its settings.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::LiveIssueFieldSource;
use crate::adapters::recording::RecordingIssueFieldSource;
use crate::adapters::replaying::ReplayingIssueFieldSource;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::ValidatorConfig;
use crate::ports::IssueFieldSource;

/// Everything one validation needs: where fields come from and which key
/// holds the start date.
///
/// Constructors wire up different adapters (live, recording, replaying).
pub struct ServiceContext {
    /// Source of issue field values.
    pub issues: Box<dyn IssueFieldSource>,
    /// Field key read as the start date.
    pub start_date_field: String,
    /// Shared with the recording adapter when recording; see [`Self::finish`].
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Wraps an arbitrary field source.
    #[must_use]
    pub fn with_source(issues: Box<dyn IssueFieldSource>, start_date_field: &str) -> Self {
        Self { issues, start_date_field: start_date_field.to_string(), recorder: None }
    }

    /// Creates a live context, or a recording one when
    /// [`ValidatorConfig::record_path`] is set.
    ///
    /// # Errors
    ///
    /// Returns an error string if the HTTP client cannot be built.
    pub fn from_config(config: &ValidatorConfig) -> Result<Self, String> {
        match &config.record_path {
            Some(path) => Self::recording(config, path),
            None => Self::live(config),
        }
    }

    /// Creates a context that calls the tracker directly.
    ///
    /// # Errors
    ///
    /// Returns an error string if the HTTP client cannot be built.
    pub fn live(config: &ValidatorConfig) -> Result<Self, String> {
        let live = LiveIssueFieldSource::new(config).map_err(|e| e.to_string())?;
        Ok(Self::with_source(Box::new(live), &config.start_date_field))
    }

    /// Creates a live context whose calls are captured to a cassette at
    /// `path`. The cassette is written by [`Self::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error string if the HTTP client cannot be built.
    pub fn recording(config: &ValidatorConfig, path: &Path) -> Result<Self, String> {
        let live = LiveIssueFieldSource::new(config).map_err(|e| e.to_string())?;
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            "dateguard-session",
            config.site_url.as_str(),
        )));
        let issues = RecordingIssueFieldSource::new(Box::new(live), Arc::clone(&recorder));

        Ok(Self {
            issues: Box::new(issues),
            start_date_field: config.start_date_field.clone(),
            recorder: Some(recorder),
        })
    }

    /// Creates a context that answers from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error string if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path, start_date_field: &str) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        let replayer = Arc::new(Mutex::new(CassetteReplayer::new(&cassette)));
        Ok(Self::with_source(Box::new(ReplayingIssueFieldSource::new(replayer)), start_date_field))
    }

    /// Tears the context down, writing the cassette if recording.
    ///
    /// Returns the cassette path when one was written.
    ///
    /// # Errors
    ///
    /// Returns an error string if the cassette cannot be written.
    pub fn finish(self) -> Result<Option<PathBuf>, String> {
        let Self { issues, recorder, .. } = self;
        // Release the adapter's handle on the recorder.
        drop(issues);

        let Some(recorder) = recorder else {
            return Ok(None);
        };
        let recorder = Arc::try_unwrap(recorder)
            .map_err(|_| "Recording adapter still holds the cassette recorder".to_string())?
            .into_inner()
            .map_err(|e| format!("Cassette recorder lock poisoned: {e}"))?;
        recorder.finish().map(Some).map_err(|e| format!("Failed to write cassette: {e}"))
    }
}
