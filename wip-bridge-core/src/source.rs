//! Upstream (WIP) client: one GraphQL POST returning every project of the
//! viewer with its completed todos and their attachments.
//!
//! There is no pagination; the whole current state comes back in one
//! response.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::contract::{Project, RequestSigner, SourceClient};
use crate::error::SourceError;

pub const CONTENT_TYPE_APPLICATION_JSON: &str = "application/json";

pub const PROJECTS_QUERY: &str = r#"{
    viewer {
        projects {
            id
            name
            pitch
            website_url
            todos(completed: true, orderBy: { completedAt: desc }) {
                id
                body
                completed_at
                attachments {
                    url
                }
            }
        }
    }
}"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ViewerData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct ViewerData {
    viewer: Viewer,
}

#[derive(Debug, Deserialize)]
struct Viewer {
    #[serde(default)]
    projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Build the JSON request body for the projects query.
pub fn encode_query(query: &str) -> Result<Vec<u8>, SourceError> {
    serde_json::to_vec(&serde_json::json!({ "query": query })).map_err(SourceError::Encode)
}

/// Decode a GraphQL response body into the viewer's projects.
pub fn decode_projects(body: &[u8]) -> Result<Vec<Project>, SourceError> {
    let response: GraphQlResponse =
        serde_json::from_slice(body).map_err(|e| SourceError::Decode(e.to_string()))?;
    match response.data {
        Some(data) => {
            if !response.errors.is_empty() {
                warn!(errors = response.errors.len(), "[SOURCE] GraphQL response carried partial errors");
            }
            Ok(data.viewer.projects)
        }
        None => {
            let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
            Err(SourceError::Decode(format!(
                "response has no data; errors: [{}]",
                messages.join("; ")
            )))
        }
    }
}

pub struct WipClient {
    client: Client,
    endpoint: String,
    signer: Box<dyn RequestSigner>,
}

impl WipClient {
    pub fn new(client: Client, endpoint: impl Into<String>, signer: Box<dyn RequestSigner>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            signer,
        }
    }
}

#[async_trait]
impl SourceClient for WipClient {
    async fn fetch_projects(&self) -> Result<Vec<Project>, SourceError> {
        let body = encode_query(PROJECTS_QUERY)?;
        let authorization = self
            .signer
            .authorization("POST", &self.endpoint, &[])
            .map_err(|e| SourceError::Request(Box::new(e)))?;

        info!(endpoint = %self.endpoint, "[SOURCE] Fetching projects from WIP");
        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, CONTENT_TYPE_APPLICATION_JSON)
            .header(AUTHORIZATION, authorization)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, endpoint = %self.endpoint, "[SOURCE][ERROR] Request to WIP failed");
                SourceError::Request(Box::new(e))
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
            error!(status = %status, endpoint = %self.endpoint, "[SOURCE][ERROR] WIP returned error. Response body: {text}");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SourceError::Auth {
                    status: status.as_u16(),
                },
                _ => SourceError::Status {
                    status: status.as_u16(),
                    body: text,
                },
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;
        let projects = decode_projects(&bytes)?;
        info!(projects = projects.len(), "[SOURCE] Fetched projects");
        Ok(projects)
    }
}
