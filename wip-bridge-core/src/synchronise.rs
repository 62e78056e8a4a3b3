//! Run orchestration: fetch → filter → (per todo) resolve media → publish.
//!
//! A run is one linear pass with two terminal outcomes. The first error at
//! any stage ends the run; posts already created stay up, and todos not yet
//! reached are left to the next run (if they are still inside the lookback
//! window by then).
//!
//! # Major Types
//! - [`Clients`]: the outbound collaborators of a run
//! - [`RunResult`]: the sole output, handed back to whoever invoked the run
//!
//! # Error Handling
//! Every failure becomes a [`RunError`], is logged with its code, and is
//! folded into a `RunResult` together with the number of todos already
//! published in this run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

use crate::config::BridgeConfig;
use crate::contract::{AttachmentFetcher, MediaHost, Publisher, SourceClient};
use crate::error::RunError;
use crate::filter::{eligible_todos, LookbackWindow};
use crate::media::resolve_attachments;
use crate::publish::publish_todo;

pub const SUCCESS_MESSAGE: &str = "Run finished without errors";

/// Outcome of one run. `code` is empty on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub code: String,
    pub count: usize,
}

impl RunResult {
    pub fn success(count: usize) -> Self {
        Self {
            message: SUCCESS_MESSAGE.to_string(),
            code: String::new(),
            count,
        }
    }

    /// Build a failure result and log it before it is returned.
    pub fn failure(err: &RunError, count: usize) -> Self {
        let result = Self {
            message: err.message(),
            code: err.code().to_string(),
            count,
        };
        error!(
            code = %result.code,
            message = %result.message,
            count,
            error = %err,
            "Returning an error response"
        );
        result
    }

    pub fn is_success(&self) -> bool {
        self.code.is_empty()
    }
}

/// The outbound collaborators of a run.
#[derive(Clone, Copy)]
pub struct Clients<'a> {
    pub source: &'a dyn SourceClient,
    pub fetcher: &'a dyn AttachmentFetcher,
    pub media: &'a dyn MediaHost,
    pub publisher: &'a dyn Publisher,
}

/// Execute one run at time `now`.
///
/// With `run_deadline_secs` set, the pipeline is dropped when the deadline
/// passes, cancelling the call in flight. Posts made before that still count.
pub async fn synchronise(config: &BridgeConfig, clients: Clients<'_>, now: DateTime<Utc>) -> RunResult {
    let mut published = 0;
    let outcome = match config.settings.run_deadline_secs {
        Some(secs) => {
            let pipeline = run_pipeline(config, clients, now, &mut published);
            match tokio::time::timeout(Duration::from_secs(secs), pipeline).await {
                Ok(outcome) => outcome,
                Err(_) => Err(RunError::DeadlineExceeded(secs)),
            }
        }
        None => run_pipeline(config, clients, now, &mut published).await,
    };
    match outcome {
        Ok(()) => {
            info!(count = published, "{SUCCESS_MESSAGE}");
            RunResult::success(published)
        }
        Err(e) => RunResult::failure(&e, published),
    }
}

async fn run_pipeline(
    config: &BridgeConfig,
    clients: Clients<'_>,
    now: DateTime<Utc>,
    published: &mut usize,
) -> Result<(), RunError> {
    let missing = config.credentials.missing();
    if !missing.is_empty() {
        error!(missing = ?missing, "[SYNC][ERROR] Required environment variables are missing");
        return Err(RunError::MissingEvars(missing));
    }

    info!("[SYNC] Starting bridge run");
    let projects = clients.source.fetch_projects().await?;

    let window = LookbackWindow::ending_at(now, config.settings.lookback());
    let eligible = eligible_todos(&projects, &window, &config.settings.privacy_marker);
    info!(
        projects = projects.len(),
        eligible = eligible.len(),
        window_start = %window.start,
        "[SYNC] Selected todos for publication"
    );

    for item in eligible {
        info!(project_id = %item.project.id, todo_id = %item.todo.id, "[SYNC] Processing todo");
        let media =
            resolve_attachments(clients.fetcher, clients.media, &item.todo.attachments).await?;
        publish_todo(clients.publisher, item.todo, &media).await?;
        *published += 1;
    }
    Ok(())
}
