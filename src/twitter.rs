#![doc = "Destination client: media upload and post creation on Twitter/X, bridging the core traits to the HTTP API."]
//
//! # Twitter client (core traits <-> HTTP API)
//!
//! - [`TwitterClient`] implements [`MediaHost`] against the v1.1 media
//!   upload endpoint and [`Publisher`] against the v2 tweet endpoint.
//! - Every request is signed by the injected [`RequestSigner`] (OAuth 1.0a
//!   in production, see [`crate::oauth`]).
//! - Timeouts come from the reqwest client the caller passes in.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use wip_bridge_core::contract::{MediaHost, MediaReference, PostReceipt, Publisher, RequestSigner};
use wip_bridge_core::error::BoxError;

pub const MEDIA_UPLOAD_PATH: &str = "/1.1/media/upload.json";
pub const CREATE_TWEET_PATH: &str = "/2/tweets";

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    media_id: Option<u64>,
    media_id_string: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateTweetRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<CreateTweetMedia<'a>>,
}

#[derive(Debug, Serialize)]
struct CreateTweetMedia<'a> {
    media_ids: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

pub struct TwitterClient {
    client: Client,
    api_url: String,
    upload_url: String,
    signer: Box<dyn RequestSigner>,
}

impl TwitterClient {
    pub fn new(
        client: Client,
        api_url: impl Into<String>,
        upload_url: impl Into<String>,
        signer: Box<dyn RequestSigner>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            upload_url: upload_url.into().trim_end_matches('/').to_string(),
            signer,
        }
    }
}

#[async_trait]
impl MediaHost for TwitterClient {
    async fn upload_media(&self, media_data: &str) -> Result<MediaReference, BoxError> {
        let url = format!("{}{}", self.upload_url, MEDIA_UPLOAD_PATH);
        let form = vec![("media_data".to_string(), media_data.to_string())];
        let authorization = self.signer.authorization("POST", &url, &form)?;

        tracing::info!(url = %url, payload_len = media_data.len(), "Uploading media");
        let resp = self
            .client
            .post(&url)
            .header(AUTHORIZATION, authorization)
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Media upload rejected. Response body: {text}");
            return Err(format!("media upload returned status {status}: {text}").into());
        }

        let body: MediaUploadResponse = resp.json().await?;
        let id = body
            .media_id_string
            .or_else(|| body.media_id.map(|id| id.to_string()))
            .ok_or("media upload response carried no media id")?;
        tracing::info!(media_id = %id, "Successfully uploaded media");
        Ok(MediaReference(id))
    }
}

#[async_trait]
impl Publisher for TwitterClient {
    async fn create_post(
        &self,
        text: &str,
        media: &[MediaReference],
    ) -> Result<PostReceipt, BoxError> {
        let url = format!("{}{}", self.api_url, CREATE_TWEET_PATH);
        let request = CreateTweetRequest {
            text,
            media: (!media.is_empty()).then(|| CreateTweetMedia {
                media_ids: media.iter().map(MediaReference::as_str).collect(),
            }),
        };
        let body = serde_json::to_vec(&request)?;
        let authorization = self.signer.authorization("POST", &url, &[])?;

        let resp = self
            .client
            .post(&url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Tweet creation rejected. Response body: {text}");
            return Err(format!("create tweet returned status {status}: {text}").into());
        }

        // The tweet exists once the status is 2xx; the id is informational.
        let id = match resp.json::<CreateTweetResponse>().await {
            Ok(created) => created.data.id,
            Err(e) => {
                tracing::warn!(status = %status, error = ?e, "Tweet created but response body carried no id");
                String::new()
            }
        };
        tracing::info!(tweet_id = %id, "Tweet sent successfully");
        Ok(PostReceipt { id })
    }
}
