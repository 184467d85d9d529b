//! Live adapter for the `IssueFieldSource` port using the issue REST API.

use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::{ConfigError, Credentials, ValidatorConfig};
use crate::ports::{
    is_field_key, FetchError, FieldRequest, FieldsFuture, IssueFieldSource, IssueSnapshot,
};

/// Path segments leading up to the issue key.
const ISSUE_PATH: [&str; 4] = ["rest", "api", "3", "issue"];

/// Live field source that calls `GET /rest/api/3/issue/{key}`.
pub struct LiveIssueFieldSource {
    client: Client,
    site_url: Url,
    credentials: Credentials,
}

impl LiveIssueFieldSource {
    /// Creates a live source for the configured site.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &ValidatorConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;
        Ok(Self {
            client,
            site_url: config.site_url.clone(),
            credentials: config.credentials.clone(),
        })
    }

    /// Builds the request URL. The key is percent-encoded as a single path
    /// segment; field keys are joined with bare commas, so each must pass
    /// [`is_field_key`].
    fn issue_url(&self, request: &FieldRequest) -> Result<Url, FetchError> {
        let mut url = self.site_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                FetchError::Transport(format!("site URL {} cannot take a path", self.site_url))
            })?
            .pop_if_empty()
            .extend(ISSUE_PATH)
            .push(&request.key);
        if let Some(bad) = request.fields.iter().find(|f| !is_field_key(f)) {
            return Err(FetchError::InvalidRequest(format!("field key {bad:?} is not allowed")));
        }
        if !request.fields.is_empty() {
            url.set_query(Some(&format!("fields={}", request.fields.join(","))));
        }
        Ok(url)
    }
}

/// The part of the issue resource this adapter reads.
#[derive(Deserialize)]
struct IssueResponse {
    fields: Map<String, Value>,
}

impl IssueFieldSource for LiveIssueFieldSource {
    fn fetch_fields(&self, request: &FieldRequest) -> FieldsFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let url = self.issue_url(&request)?;
            tracing::debug!(issue = %request.key, %url, "fetching issue fields");

            let builder = self.client.get(url).header(ACCEPT, "application/json");
            let builder = match &self.credentials {
                Credentials::Basic { email, token } => builder.basic_auth(email, Some(token)),
                Credentials::Bearer(token) => builder.bearer_auth(token),
                Credentials::Anonymous => builder,
            };

            let response =
                builder.send().await.map_err(|e| FetchError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status { status: status.as_u16() });
            }

            let body = response.text().await.map_err(|e| FetchError::Transport(e.to_string()))?;
            let issue: IssueResponse =
                serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;

            Ok(IssueSnapshot { fields: issue.fields })
        })
    }
}
