//! Command-line entrypoint: argument parsing, wiring of the live clients and
//! the two ways of invoking a run.
//!
//! # Responsibilities
//! - `run`: one pass, result printed as JSON on stdout, exit code 1 on failure
//! - `schedule`: a pass now and then every N minutes, never overlapping,
//!   until interrupted with Ctrl-C
//! - [`LiveClients`]: builds the reqwest-backed implementations of the core
//!   traits from a [`BridgeConfig`], all sharing one timeout-bounded client
//!
//! # Errors
//! Settings-file problems and bad flags surface as `anyhow` errors before
//! any run starts. Everything that happens inside a run is reported through
//! the [`RunResult`] instead.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use wip_bridge_core::auth::BearerToken;
use wip_bridge_core::config::BridgeConfig;
use wip_bridge_core::error::RunError;
use wip_bridge_core::media::HttpAttachmentFetcher;
use wip_bridge_core::source::WipClient;
use wip_bridge_core::synchronise::{synchronise, Clients, RunResult};

use crate::load_config::load_config;
use crate::oauth::OAuth1Signer;
use crate::twitter::TwitterClient;

/// CLI for wip-bridge: republish completed WIP todos as tweets.
#[derive(Parser)]
#[clap(
    name = "wip-bridge",
    version,
    about = "Republish recently completed WIP todos, with attachments, as tweets"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bridge once and print the result
    Run {
        /// Optional path to a YAML settings file
        #[clap(long)]
        config: Option<PathBuf>,
    },
    /// Run the bridge now and then every N minutes until interrupted
    Schedule {
        /// Optional path to a YAML settings file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Minutes between runs; should not exceed the lookback window
        #[clap(long, default_value_t = 60)]
        every_minutes: u64,
    },
}

/// The live HTTP implementations of every collaborator of a run.
pub struct LiveClients {
    wip: WipClient,
    fetcher: HttpAttachmentFetcher,
    twitter: TwitterClient,
}

impl LiveClients {
    pub fn from_config(config: &BridgeConfig) -> Result<Self, RunError> {
        let settings = &config.settings;
        let credentials = &config.credentials;
        let http = Client::builder()
            .timeout(settings.connection_timeout())
            .build()
            .map_err(|e| RunError::HttpClient(Box::new(e)))?;

        let wip = WipClient::new(
            http.clone(),
            settings.wip_graphql_url.clone(),
            Box::new(BearerToken::new(credentials.wip_api_key.clone())),
        );
        let fetcher = HttpAttachmentFetcher::with_client(http.clone());
        let twitter = TwitterClient::new(
            http,
            settings.twitter_api_url.clone(),
            settings.twitter_upload_url.clone(),
            Box::new(OAuth1Signer::new(
                credentials.twitter_api_key.clone(),
                credentials.twitter_api_key_secret.clone(),
                credentials.twitter_access_token.clone(),
                credentials.twitter_access_token_secret.clone(),
            )),
        );
        Ok(Self {
            wip,
            fetcher,
            twitter,
        })
    }

    pub fn clients(&self) -> Clients<'_> {
        Clients {
            source: &self.wip,
            fetcher: &self.fetcher,
            media: &self.twitter,
            publisher: &self.twitter,
        }
    }
}

/// One run against the live services.
///
/// Secrets are checked before any client is built, so a config without them
/// always reports `missing_evars`.
pub async fn execute_once(config: &BridgeConfig) -> RunResult {
    let missing = config.credentials.missing();
    if !missing.is_empty() {
        return RunResult::failure(&RunError::MissingEvars(missing), 0);
    }
    let live = match LiveClients::from_config(config) {
        Ok(live) => live,
        Err(e) => return RunResult::failure(&e, 0),
    };
    synchronise(config, live.clients(), Utc::now()).await
}

fn print_result(result: &RunResult) -> Result<()> {
    println!("{}", serde_json::to_string(result)?);
    Ok(())
}

/// Longest accepted period between scheduled runs: one week.
pub const MAX_EVERY_MINUTES: u64 = 7 * 24 * 60;

/// Converts `--every-minutes` into the scheduler period.
pub fn run_interval(every_minutes: u64) -> Result<Duration> {
    if every_minutes == 0 {
        anyhow::bail!("--every-minutes must be at least 1");
    }
    if every_minutes > MAX_EVERY_MINUTES {
        anyhow::bail!("--every-minutes must be at most {MAX_EVERY_MINUTES}, got {every_minutes}");
    }
    Ok(Duration::from_secs(every_minutes * 60))
}

async fn schedule(config: &BridgeConfig, every_minutes: u64) -> Result<()> {
    let period = run_interval(every_minutes)?;
    if every_minutes as i64 > config.settings.lookback_minutes {
        tracing::warn!(
            every_minutes,
            lookback_minutes = config.settings.lookback_minutes,
            "Run interval exceeds the lookback window; todos completed in the gap will never be posted"
        );
    }

    let mut interval = tokio::time::interval(period);
    // Runs never overlap: a tick that fires during a long run is delayed, not queued.
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping scheduler");
                return Ok(());
            }
            _ = interval.tick() => {
                let result = execute_once(config).await;
                print_result(&result)?;
            }
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "wip-bridge starting");

    match cli.command {
        Commands::Run { config } => {
            let config = load_config(config)?;
            let result = execute_once(&config).await;
            print_result(&result)?;
            if result.is_success() {
                Ok(())
            } else {
                Err(anyhow::anyhow!(
                    "run failed with code {}: {}",
                    result.code,
                    result.message
                ))
            }
        }
        Commands::Schedule {
            config,
            every_minutes,
        } => {
            let config = load_config(config)?;
            schedule(&config, every_minutes).await
        }
    }
}
