//! Turns a todo's attachments into destination media references.
//!
//! Attachments are handled one at a time in their given order and the
//! returned references keep that order. There is no retry: the first
//! failure is returned and the caller aborts the run.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, info};

use crate::contract::{Attachment, AttachmentFetcher, MediaHost, MediaReference};
use crate::error::{BoxError, MediaError};

/// Downloads attachments with a plain GET.
pub struct HttpAttachmentFetcher {
    client: Client,
}

impl HttpAttachmentFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AttachmentFetcher for HttpAttachmentFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BoxError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(format!("attachment download returned status {status}").into());
        }
        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Download one attachment, base64 it and upload it as media.
pub async fn resolve_attachment<F, M>(
    fetcher: &F,
    host: &M,
    attachment: &Attachment,
) -> Result<MediaReference, MediaError>
where
    F: AttachmentFetcher + ?Sized,
    M: MediaHost + ?Sized,
{
    let bytes = fetcher.fetch(&attachment.url).await.map_err(|e| {
        error!(url = %attachment.url, error = ?e, "[MEDIA][ERROR] Attachment download failed");
        MediaError::Fetch {
            url: attachment.url.clone(),
            source: e,
        }
    })?;
    info!(url = %attachment.url, bytes = bytes.len(), "[MEDIA] Attachment downloaded");

    let encoded = STANDARD.encode(&bytes);
    let reference = host.upload_media(&encoded).await.map_err(|e| {
        error!(url = %attachment.url, error = ?e, "[MEDIA][ERROR] Media upload failed");
        MediaError::Upload {
            url: attachment.url.clone(),
            source: e,
        }
    })?;
    info!(url = %attachment.url, media_id = %reference.as_str(), "[MEDIA] Media uploaded");
    Ok(reference)
}

/// Resolve all attachments sequentially, stopping at the first failure.
pub async fn resolve_attachments<F, M>(
    fetcher: &F,
    host: &M,
    attachments: &[Attachment],
) -> Result<Vec<MediaReference>, MediaError>
where
    F: AttachmentFetcher + ?Sized,
    M: MediaHost + ?Sized,
{
    let mut references = Vec::with_capacity(attachments.len());
    for attachment in attachments {
        references.push(resolve_attachment(fetcher, host, attachment).await?);
    }
    Ok(references)
}
