use assert_cmd::Command;
use predicates::prelude::*;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use tracing_subscriber::{layer::Context, Layer, Registry};
use tracing_subscriber::prelude::*;

const SECRETS: [&str; 5] = [
    "WIP_API_KEY",
    "TWITTER_API_KEY",
    "TWITTER_API_KEY_SECRET",
    "TWITTER_ACCESS_TOKEN",
    "TWITTER_ACCESS_TOKEN_SECRET",
];

#[test]
fn run_without_secrets_fails_with_missing_evars() {
    // Empty working directory, so no .env file is picked up.
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("wip-bridge").expect("Binary exists");
    cmd.current_dir(dir.path()).arg("run");
    for name in SECRETS {
        cmd.env_remove(name);
    }

    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(r#""code":"missing_evars""#))
        .stdout(predicate::str::contains(r#""count":0"#));
}

#[test]
fn schedule_rejects_zero_interval() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("wip-bridge").expect("Binary exists");
    cmd.current_dir(dir.path())
        .args(["schedule", "--every-minutes", "0"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--every-minutes must be at least 1"));
}

#[test]
fn missing_config_file_fails_before_running() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("wip-bridge").expect("Binary exists");
    cmd.current_dir(dir.path())
        .args(["run", "--config", "nope.yaml"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn run_interval_accepts_only_sane_periods() {
    use wip_bridge::cli::{run_interval, MAX_EVERY_MINUTES};

    assert_eq!(run_interval(60).unwrap(), std::time::Duration::from_secs(3600));
    assert_eq!(
        run_interval(MAX_EVERY_MINUTES).unwrap(),
        std::time::Duration::from_secs(MAX_EVERY_MINUTES * 60)
    );
    assert!(run_interval(0).is_err());
    assert!(run_interval(MAX_EVERY_MINUTES + 1).is_err());
    assert!(run_interval(u64::MAX).is_err());
}

#[test]
fn schedule_rejects_huge_interval_without_panicking() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("wip-bridge").expect("Binary exists");
    cmd.current_dir(dir.path())
        .args(["schedule", "--every-minutes", "18446744073709551615"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--every-minutes must be at most"));
}

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{event:?}"));
    }
}

#[tokio::test]
async fn emits_start_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use wip_bridge::cli::{run, Cli, Commands};

    // A missing settings file fails fast, after the start event.
    let cli = Cli {
        command: Commands::Run {
            config: Some(std::path::PathBuf::from("dummy.yaml")),
        },
    };
    let _ = run(cli).await;

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("wip-bridge starting")),
        "Expected a start event, got: {:?}",
        event_msgs
    );
}
