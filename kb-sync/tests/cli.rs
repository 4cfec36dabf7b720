use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENV_KEYS: &[&str] = &[
    "PYLON_API_KEY",
    "PYLON_BASE_URL",
    "ADA_API_KEY",
    "ADA_BASE_URL",
    "ADA_BOT_HANDLE",
    "ARTICLE_LIMIT",
    "SOURCE_IDS_FILE",
    "LOG_FILE",
];

fn kb_sync() -> Command {
    let mut cmd = Command::cargo_bin("kb-sync").expect("Binary exists");
    for key in ENV_KEYS {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn help_lists_every_subcommand() {
    kb_sync().arg("--help").assert().success().stdout(
        predicate::str::contains("knowledge-bases")
            .and(predicate::str::contains("sync"))
            .and(predicate::str::contains("update"))
            .and(predicate::str::contains("delete")),
    );
}

#[test]
fn delete_without_ada_key_fails_with_a_clear_message() {
    let dir = tempdir().unwrap();
    kb_sync()
        .arg("--log-file")
        .arg(dir.path().join("sync.log"))
        .args(["delete", "kb-1"])
        .env("ADA_BOT_HANDLE", "my-bot")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ada API key"));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_source_and_logs_to_file() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/knowledge/sources/kb-1"))
        .and(header("Authorization", "Bearer ada-key"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let log_file = dir.path().join("sync.log");
    let mut cmd = kb_sync();
    cmd.arg("--log-file")
        .arg(&log_file)
        .args(["delete", "kb-1"])
        .env("ADA_API_KEY", "ada-key")
        .env("ADA_BASE_URL", server.uri());

    // The multi-threaded runtime keeps serving the mock while this blocks.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Successfully deleted Ada knowledge source: kb-1"));

    let logged = std::fs::read_to_string(&log_file).expect("log file written");
    assert!(logged.contains("Deleted knowledge source"), "got: {logged}");
}

use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{:?}", event));
    }
}

#[tokio::test]
#[serial]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use kb_sync::cli::{run, Cli, Commands};

    // A missing config file makes the run fail right after start-up.
    let cli = Cli {
        config: Some(std::path::PathBuf::from("does-not-exist.yaml")),
        log_file: std::path::PathBuf::from("unused.log"),
        command: Commands::KnowledgeBases,
    };

    let result = run(cli).await;
    assert!(result.is_err());

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}
