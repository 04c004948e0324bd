//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary and verify outputs. Every run points
//! `--config` into a temp dir so the user's own config is never read.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(config: &Path, args: &[&str]) -> (i32, String, String) {
    run_cli_with_input(config, args, "")
}

fn run_cli_with_input(config: &Path, args: &[&str], input: &str) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pmfcheck"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (code, stdout, stderr)
}

fn events(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("every line is a JSON event"))
        .collect()
}

#[test]
fn test_simulate_wizard_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(&config, &["simulate", "--seed", "7"]);
    assert_eq!(code, 0, "simulate failed");

    let events = events(&stdout);
    assert_eq!(events[0]["type"], "session_started");
    assert_eq!(events[0]["variant"], "wizard");
    let answered = events
        .iter()
        .filter(|e| e["type"] == "answer_recorded")
        .count();
    assert_eq!(answered, 5);
    let [.., unlocked, disposed] = events.as_slice() else {
        panic!("too few events");
    };
    assert_eq!(unlocked["type"], "report_unlocked");
    assert_eq!(unlocked["email"], "founder@startup.com");
    assert_eq!(disposed["type"], "session_disposed");
    assert_eq!(disposed["cancelled_timers"], 0);
}

#[test]
fn test_simulate_chat_has_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(&config, &["simulate", "--variant", "chat", "--seed", "1"]);
    assert_eq!(code, 0, "simulate chat failed");

    let events = events(&stdout);
    assert!(events.iter().any(|e| e["type"] == "category_selected"));
    assert!(events.iter().any(|e| e["type"] == "email_gate_shown"));
    assert!(events.iter().any(|e| e["type"] == "message_appended"));
    assert!(events.iter().any(|e| e["type"] == "report_unlocked"));
    assert_eq!(events.last().unwrap()["type"], "session_disposed");
}

#[test]
fn test_simulate_is_deterministic_with_seed() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let insights = |stdout: &str| -> Vec<String> {
        events(stdout)
            .into_iter()
            .filter(|e| e["type"] == "insight_shown")
            .map(|e| e["text"].as_str().unwrap().to_string())
            .collect()
    };
    let a = run_cli(&config, &["simulate", "--seed", "99"]);
    let b = run_cli(&config, &["simulate", "--seed", "99"]);
    assert_eq!(insights(&a.1), insights(&b.1));
}

#[test]
fn test_simulate_scripted_answers() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let script = dir.path().join("answers.json");
    std::fs::write(
        &script,
        r#"["We sell to seed-stage founders", "Spreadsheets and guesswork", "organic-search", "Churn after month two", "Find a repeatable channel"]"#,
    )
    .unwrap();

    let (code, stdout, _) = run_cli(
        &config,
        &["simulate", "--answers", script.to_str().unwrap()],
    );
    assert_eq!(code, 0, "scripted simulate failed");
    let recorded: Vec<String> = events(&stdout)
        .into_iter()
        .filter(|e| e["type"] == "answer_recorded")
        .map(|e| e["answer"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(recorded[0], "We sell to seed-stage founders");
    assert_eq!(recorded[2], "Organic Search / SEO");
}

#[test]
fn test_simulate_rejects_short_scripted_answer() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let script = dir.path().join("answers.json");
    std::fs::write(&script, r#"["too short"]"#).unwrap();

    let (code, _, stderr) = run_cli(
        &config,
        &["simulate", "--answers", script.to_str().unwrap()],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error: question 1: 1 more characters needed"));
}

#[test]
fn test_simulate_rejects_invalid_email() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let (code, _, stderr) = run_cli(&config, &["simulate", "--email", "not-an-email"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Please enter a valid email address"));
}

#[test]
fn test_run_fast_wizard_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let input = [
        "short",
        "We help founders validate ideas",
        "Customer interviews mostly",
        "2",
        "Users drop off after onboarding",
        "Nail one acquisition channel",
        "founder@startup.com",
    ]
    .join("\n");

    let (code, stdout, _) = run_cli_with_input(&config, &["run", "--fast", "--seed", "3"], &input);
    assert_eq!(code, 0, "interactive run failed");
    assert!(stdout.contains("5 more characters needed"));
    assert!(stdout.contains("Analyzing your responses"));
    assert!(stdout.contains("Completed in"));
}

#[test]
fn test_content_questions() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(&config, &["content", "questions"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 5);
    assert_eq!(parsed[2]["kind"], "single-select");
}

#[test]
fn test_config_init_show_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("pmf").join("config.toml");

    let (code, stdout, _) = run_cli(&config, &["config", "path"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), config.display().to_string());

    let (code, _, _) = run_cli(&config, &["config", "init"]);
    assert_eq!(code, 0);
    assert!(config.exists());

    let (code, _, stderr) = run_cli(&config, &["config", "init"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("already exists"));

    let (code, stdout, _) = run_cli(&config, &["config", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("[assessment]"));

    let (code, stdout, _) = run_cli(&config, &["config", "get", "timing.insight_delay_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "2000");

    let (code, _, stderr) = run_cli(&config, &["config", "get", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key: nope"));
}

#[test]
fn test_config_variant_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[assessment]\nvariant = \"chat\"\nseed = 5\n").unwrap();

    let (code, stdout, _) = run_cli(&config, &["simulate"]);
    assert_eq!(code, 0);
    assert_eq!(events(&stdout)[0]["variant"], "chat");
}

#[test]
fn test_completions_bash() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(&config, &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("pmfcheck"));
}
