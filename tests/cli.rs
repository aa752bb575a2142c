//! End-to-end tests for the `psync` binary.

mod common;

use common::{empty_contact, jane, spawn_graph};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::process::Command;

const TOKEN_ENV: &str = "PEOPLE_SYNC_ACCESS_TOKEN";

fn setup(collection_url: &str, token: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let vault = root.join("vault");
    fs::create_dir_all(&vault).unwrap();

    let config_content = format!(
        r#"access_token = "{}"

[vault]
root = "{}"

[graph]
collection_url = "{}"
"#,
        token,
        vault.display(),
        collection_url
    );
    let config_path = root.join("config").join("psync.toml");
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

async fn run_psync(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    run_psync_with_env(config_path, args, None).await
}

async fn run_psync_with_env(
    config_path: &Path,
    args: &[&str],
    token_env: Option<&str>,
) -> (String, String, bool) {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_psync"));
    cmd.arg("--config").arg(config_path).args(args);
    match token_env {
        Some(token) => cmd.env(TOKEN_ENV, token),
        None => cmd.env_remove(TOKEN_ENV),
    };
    let output = cmd.output().await.expect("failed to run psync");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[tokio::test]
async fn test_fields_lists_all_placeholders() {
    let (_tmp, config_path) = setup("http://127.0.0.1:9/contacts", "");
    let (stdout, _, success) = run_psync(&config_path, &["fields"]).await;
    assert!(success);
    for name in ["displayName", "businessPhones", "primaryEmail"] {
        assert!(stdout.contains(name), "missing {} in {}", name, stdout);
    }
}

#[tokio::test]
async fn test_sync_writes_notes() {
    let graph = spawn_graph(vec![vec![jane(), empty_contact()]]).await;
    let (tmp, config_path) = setup(&graph.collection_url(), "tok");

    let (stdout, stderr, success) = run_psync(&config_path, &["sync"]).await;
    assert!(success, "sync failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("written: 1"));
    assert!(stdout.contains("skipped: 1"));
    assert!(stderr.contains("Created/updated 1 file(s) (skipped 1)"));

    let note = tmp.path().join("vault").join("People").join("@Jane Doe.md");
    assert!(fs::read_to_string(note).unwrap().contains("jane@example.com"));
}

#[tokio::test]
async fn test_sync_without_token_fails_before_fetch() {
    let graph = spawn_graph(vec![vec![jane()]]).await;
    let (tmp, config_path) = setup(&graph.collection_url(), "   ");

    let (_, stderr, success) = run_psync(&config_path, &["sync"]).await;
    assert!(!success);
    assert!(stderr.contains("access token"), "stderr: {}", stderr);
    assert!(graph.requests().is_empty());
    assert!(!tmp.path().join("vault").join("People").exists());
}

#[tokio::test]
async fn test_sync_token_from_environment() {
    let graph = spawn_graph(vec![vec![jane()]]).await;
    let (_tmp, config_path) = setup(&graph.collection_url(), "");

    let (stdout, stderr, success) =
        run_psync_with_env(&config_path, &["sync", "--progress", "quiet"], Some("env-tok")).await;
    assert!(success, "sync failed: {}", stderr);
    assert!(stdout.contains("written: 1"));
    assert!(stderr.is_empty(), "quiet mode printed: {}", stderr);
    assert_eq!(
        graph.requests()[0].authorization.as_deref(),
        Some("Bearer env-tok")
    );
}

#[tokio::test]
async fn test_sync_dry_run_writes_nothing() {
    let graph = spawn_graph(vec![vec![jane()]]).await;
    let (tmp, config_path) = setup(&graph.collection_url(), "tok");

    let (stdout, _, success) = run_psync(&config_path, &["sync", "--dry-run"]).await;
    assert!(success);
    assert!(stdout.contains("dry-run"));
    assert!(stdout.contains("would write: 1"));
    assert!(stdout.contains("People/@Jane Doe.md"));
    assert!(!tmp.path().join("vault").join("People").exists());
}

#[tokio::test]
async fn test_sync_dry_run_show_prints_notes() {
    let graph = spawn_graph(vec![vec![jane(), empty_contact()]]).await;
    let (tmp, config_path) = setup(&graph.collection_url(), "tok");

    let (stdout, stderr, success) =
        run_psync(&config_path, &["sync", "--dry-run", "--show"]).await;
    assert!(success, "dry run failed: {}", stderr);
    assert!(stdout.contains("# People/@Jane Doe.md"));
    assert!(stdout.contains("📧 jane@example.com"));
    assert!(!tmp.path().join("vault").join("People").exists());

    let (_, _, success) = run_psync(&config_path, &["sync", "--show"]).await;
    assert!(!success, "--show requires --dry-run");
}

#[tokio::test]
async fn test_sync_http_error_exits_nonzero() {
    let graph = common::spawn_failing_graph(vec![vec![jane()]], 0, 403, "Forbidden").await;
    let (_tmp, config_path) = setup(&graph.collection_url(), "tok");

    let (_, stderr, success) = run_psync(&config_path, &["sync", "--progress", "json"]).await;
    assert!(!success);
    assert!(stderr.contains("Graph 403: Forbidden"), "stderr: {}", stderr);
}

#[tokio::test]
async fn test_config_set_show_and_template_reset() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("psync.toml");

    let (_, _, success) = run_psync(&config_path, &["config", "init"]).await;
    assert!(success);
    assert!(config_path.exists());

    let (_, _, success) = run_psync(&config_path, &["config", "set", "file_prefix", "p-"]).await;
    assert!(success);
    let (_, _, success) =
        run_psync(&config_path, &["config", "set", "access_token", "eyJ0eXAiOiJKV1Qi"]).await;
    assert!(success);
    let (_, _, success) =
        run_psync(&config_path, &["config", "set", "template", "{{displayName}}"]).await;
    assert!(success);

    let (stdout, _, _) = run_psync(&config_path, &["config", "show"]).await;
    assert!(stdout.contains("file_prefix = \"p-\""));
    assert!(stdout.contains("eyJ0eX…"));
    assert!(!stdout.contains("eyJ0eXAiOiJKV1Qi"));

    let (stdout, _, _) = run_psync(&config_path, &["template", "show"]).await;
    assert_eq!(stdout.trim(), "{{displayName}}");

    let (_, _, success) = run_psync(&config_path, &["template", "reset"]).await;
    assert!(success);
    let (stdout, _, _) = run_psync(&config_path, &["template", "show"]).await;
    assert!(stdout.contains("{{businessPhones}}"));

    let (_, stderr, success) = run_psync(&config_path, &["config", "set", "colour", "blue"]).await;
    assert!(!success);
    assert!(stderr.contains("Unknown setting"));
}

#[tokio::test]
async fn test_template_check_and_preview() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("psync.toml");
    run_psync(
        &config_path,
        &["config", "set", "template", "{{displayName}} {{nickname}}\n📱 {{mobilePhone}}"],
    )
    .await;

    let (stdout, _, success) = run_psync(&config_path, &["template", "check"]).await;
    assert!(success);
    assert!(stdout.contains("nickname"));
    assert!(stdout.contains("unknown"));

    let contact_path = tmp.path().join("contact.json");
    fs::write(&contact_path, jane().to_string()).unwrap();
    let (stdout, _, success) = run_psync(
        &config_path,
        &["template", "preview", contact_path.to_str().unwrap()],
    )
    .await;
    assert!(success);
    assert!(stdout.contains("# People/@Jane Doe.md"));
    assert!(stdout.contains("Jane Doe"));
    assert!(!stdout.contains("📱"));

    let empty_path = tmp.path().join("empty.json");
    fs::write(&empty_path, empty_contact().to_string()).unwrap();
    let (stdout, _, _) = run_psync(
        &config_path,
        &["template", "preview", empty_path.to_str().unwrap()],
    )
    .await;
    assert!(stdout.contains("skip"));
}
