//! Integration tests for the tubescribe CLI. None of these touch the network.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Run tubescribe inside `dir` with an isolated config location
fn tubescribe(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tubescribe").unwrap();
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .env_remove("TUBESCRIBE_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    tubescribe(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("pdf"))
        .stdout(predicate::str::contains("id"));
}

#[test]
fn id_prints_video_id() {
    let dir = TempDir::new().unwrap();
    tubescribe(&dir)
        .args(["id", "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"])
        .assert()
        .success()
        .stdout("dQw4w9WgXcQ\n");
}

#[test]
fn id_rejects_invalid_url() {
    let dir = TempDir::new().unwrap();
    tubescribe(&dir)
        .args(["id", "https://example.com/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid YouTube URL"));
}

#[test]
fn fetch_rejects_invalid_url_without_network() {
    let dir = TempDir::new().unwrap();
    tubescribe(&dir)
        .args(["fetch", "not a url", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid YouTube URL"));
}

#[test]
fn pdf_renders_text_file_named_after_title() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("transcript.txt");
    std::fs::write(&input, "first line\nsecond line\n\nlast line").unwrap();

    tubescribe(&dir)
        .args(["pdf", "transcript.txt", "--title", "My:Video?\"Title\""])
        .assert()
        .success()
        .stdout(predicate::str::contains("My_Video_Title_.pdf"));

    let bytes = std::fs::read(dir.path().join("My_Video_Title_.pdf")).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn pdf_reads_stdin_and_falls_back_to_default_name() {
    let dir = TempDir::new().unwrap();

    tubescribe(&dir)
        .args(["pdf", "-", "--title", "???"])
        .write_stdin("")
        .assert()
        .success();

    let bytes = std::fs::read(dir.path().join("transcript.pdf")).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn pdf_honours_output_path() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("in.txt"), "hello").unwrap();

    tubescribe(&dir)
        .args(["pdf", "in.txt", "-o", "out/custom.pdf"])
        .assert()
        .success();

    assert!(dir.path().join("out").join("custom.pdf").exists());
}

#[test]
fn pdf_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    tubescribe(&dir)
        .args(["pdf", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input text"));
}

#[test]
fn config_init_writes_user_config() {
    let dir = TempDir::new().unwrap();

    let output = tubescribe(&dir).args(["config", "--init"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let written_to = stdout
        .lines()
        .find_map(|line| line.strip_prefix("Configuration written to: "))
        .expect("config path in output");

    let written = std::fs::read_to_string(written_to).unwrap();
    assert!(written.contains("max_attempts: 5"));

    tubescribe(&dir)
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Retries: 5 attempts"));
}

#[test]
fn explicit_config_file_is_used() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("custom.yaml"), "provider:\n  language: de\n").unwrap();

    tubescribe(&dir)
        .args(["config", "--show", "--config", "custom.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Language: de"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tubescribe.yaml"), "retry:\n  max_attempts: 0\n").unwrap();

    tubescribe(&dir)
        .args(["id", "https://youtu.be/dQw4w9WgXcQ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_attempts"));
}
