//! # contract: data model and capability traits for a bridge run
//!
//! This module holds the plain data that flows through a run (projects,
//! todos, attachments, media references) and the traits behind which every
//! outbound call sits.
//!
//! ## Interface & Extensibility
//! - [`SourceClient`] fetches the upstream state in one call.
//! - [`AttachmentFetcher`] downloads raw attachment bytes.
//! - [`MediaHost`] uploads base64 media and hands back a [`MediaReference`].
//! - [`Publisher`] creates one post on the destination platform.
//! - [`RequestSigner`] produces the `Authorization` header for a request,
//!   one implementation per auth scheme.
//!
//! ## Mocking & Testing
//! - The traits are annotated for `mockall`, so downstream crates get
//!   `MockSourceClient`, `MockPublisher`, etc. with the `test-export-mocks`
//!   feature (on by default).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::{BoxError, SignError, SourceError};

/// A project visible to the authenticated upstream viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Free-text description; may carry the privacy marker.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pitch: String,
    #[serde(default)]
    pub website_url: Option<String>,
    /// Completed todos, newest first.
    #[serde(default)]
    pub todos: Vec<Todo>,
}

/// A completed work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
}

/// Destination identifier for uploaded media. Only valid within the run that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaReference(pub String);

impl MediaReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What the destination returned for a created post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReceipt {
    pub id: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fetches the full current upstream state in a single request.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait SourceClient: Send + Sync {
    async fn fetch_projects(&self) -> Result<Vec<Project>, SourceError>;
}

/// Downloads the raw bytes behind an attachment URL.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BoxError>;
}

/// Media hosting endpoint of the destination platform.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Upload base64-encoded media and return the reference to attach to a post.
    async fn upload_media(&self, media_data: &str) -> Result<MediaReference, BoxError>;
}

/// Post creation on the destination platform.
///
/// Not idempotent: every successful call creates one externally visible post.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn create_post(
        &self,
        text: &str,
        media: &[MediaReference],
    ) -> Result<PostReceipt, BoxError>;
}

/// Signs an outbound request by producing its `Authorization` header value.
///
/// `form_params` are the url-encoded body parameters, if any; schemes that
/// sign the body (OAuth 1.0a) need them, others ignore them.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait RequestSigner: Send + Sync {
    fn authorization(
        &self,
        method: &str,
        url: &str,
        form_params: &[(String, String)],
    ) -> Result<String, SignError>;
}
