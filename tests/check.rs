use std::process::Command;

/// Binary invocation isolated from any ambient CI credentials.
fn driftguard() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_driftguard"));
    for var in [
        "GEMINI_API_KEY",
        "OPENAI_API_KEY",
        "ANTHROPIC_API_KEY",
        "GITHUB_TOKEN",
        "GH_TOKEN",
        "GITHUB_REPOSITORY",
        "GITHUB_EVENT_PATH",
        "PR_NUMBER",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn no_subcommand_prints_welcome() {
    let output = driftguard().output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("driftguard"));
    assert!(stdout.contains("check"));
}

#[test]
fn check_without_api_key_fails_before_touching_files() {
    let dir = tempfile::tempdir().unwrap();

    // Neither input file exists; the API-key check must fire first.
    let output = driftguard()
        .args(["check", "--code", "missing.py", "--doc", "missing.md"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No API key"), "stderr was: {stderr}");
}

#[test]
fn check_with_key_but_missing_code_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("README.md"), "# Docs\n").unwrap();

    let output = driftguard()
        .args(["check", "--code", "missing.py", "--doc", "README.md"])
        .env("GEMINI_API_KEY", "test-key")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("file not found"), "stderr was: {stderr}");
}

#[test]
fn doctor_reports_environment() {
    let dir = tempfile::tempdir().unwrap();

    let output = driftguard()
        .arg("doctor")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Environment Check"));
    assert!(stdout.contains("llm api key"));
}
