//! Error types for every stage of a run.
//!
//! Each stage has its own enum; [`RunError`] wraps them and is the only type
//! that knows about the machine-readable codes surfaced in
//! [`RunResult`](crate::synchronise::RunResult).

use thiserror::Error;

/// Boxed error returned by capability-trait implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures while fetching projects from the upstream service.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to encode upstream query: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("upstream request failed: {0}")]
    Request(#[source] BoxError),

    #[error("upstream rejected credentials (status {status})")]
    Auth { status: u16 },

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode upstream response: {0}")]
    Decode(String),
}

/// Failures while turning one attachment into a media reference.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to fetch attachment {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("media upload for {url} was rejected: {source}")]
    Upload {
        url: String,
        #[source]
        source: BoxError,
    },
}

/// Failures while producing an authorization header.
#[derive(Debug, Error)]
pub enum SignError {
    #[error("invalid signing key: {0}")]
    Key(String),

    #[error("cannot sign request for url {0}")]
    Url(String),
}

/// Everything that can terminate a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingEvars(Vec<&'static str>),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Attachment(#[from] MediaError),

    #[error("failed to publish todo {todo_id}: {source}")]
    Publish {
        todo_id: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to build http client: {0}")]
    HttpClient(#[source] BoxError),

    #[error("run exceeded its deadline of {0}s")]
    DeadlineExceeded(u64),
}

impl RunError {
    /// Machine-readable category reported in `RunResult::code`.
    pub fn code(&self) -> &'static str {
        match self {
            RunError::MissingEvars(_) => "missing_evars",
            RunError::Source(SourceError::Encode(_)) => "wip_request_encode_error",
            RunError::Source(SourceError::Request(_)) => "wip_request_error",
            RunError::Source(SourceError::Auth { .. }) => "wip_api_error",
            RunError::Source(SourceError::Status { .. }) => "wip_api_error",
            RunError::Source(SourceError::Decode(_)) => "wip_response_decode_error",
            RunError::Attachment(_) => "upload_attachment_error",
            RunError::Publish { .. } => "twitter_create_tweet_error",
            RunError::HttpClient(_) => "http_client_error",
            RunError::DeadlineExceeded(_) => "run_deadline_exceeded",
        }
    }

    /// Human-readable message reported in `RunResult::message`.
    pub fn message(&self) -> String {
        match self {
            RunError::MissingEvars(_) => "Cannot start the run because some of the required environment variables are missing, set them and run again".to_string(),
            RunError::Source(SourceError::Encode(_)) => "Error encoding WIP request body".to_string(),
            RunError::Source(SourceError::Request(_)) => "Error sending request to WIP's API".to_string(),
            RunError::Source(SourceError::Auth { status })
            | RunError::Source(SourceError::Status { status, .. }) => {
                format!("Error calling WIP's API; status code = {status}")
            }
            RunError::Source(SourceError::Decode(_)) => "Error decoding WIP's response body".to_string(),
            RunError::Attachment(_) => "Error uploading attachment".to_string(),
            RunError::Publish { .. } => "Error creating a tweet".to_string(),
            RunError::HttpClient(_) => "Error building HTTP client".to_string(),
            RunError::DeadlineExceeded(secs) => format!("Run did not finish within {secs}s"),
        }
    }
}
