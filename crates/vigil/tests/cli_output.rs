//! Integration tests for CLI output behavior
//!
//! The default behavior is quiet (no logs). Use -v/--verbose to enable logs.
//! Every invocation pins HOME to a scratch directory so a developer's real
//! ~/.vigil/config.toml cannot influence the assertions.

use std::io::Write;
use std::process::{Command, Stdio};

/// Build a vigil command with a hermetic environment.
fn vigil_cmd(home: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_vigil"));
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

/// Execute 'vigil timings' and verify it succeeds
fn run_vigil_timings(home: &std::path::Path) -> std::process::Output {
    let output = vigil_cmd(home)
        .arg("timings")
        .output()
        .expect("Failed to execute 'vigil timings'");

    assert!(
        output.status.success(),
        "vigil timings failed with exit code {:?}. stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    output
}

/// Verify that stdout contains only user-facing output (no JSON logs)
/// and that stderr is empty by default (quiet mode)
#[test]
fn test_timings_stdout_is_clean() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = run_vigil_timings(temp_dir.path());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    // stdout should not contain JSON log lines
    assert!(
        !stdout.contains(r#""event":"#),
        "stdout should not contain JSON logs, got: {}",
        stdout
    );

    // stderr should be empty in default (quiet) mode, or only contain errors
    if !stderr.is_empty() {
        assert!(
            !stderr.contains(r#""level":"INFO""#),
            "Default mode should not emit INFO logs, got: {}",
            stderr
        );
    }
}

/// Verify that default mode (no flags) suppresses INFO-level logs
#[test]
fn test_default_mode_suppresses_info_logs() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = run_vigil_timings(temp_dir.path());

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        !stderr.contains(r#""level":"INFO""#),
        "Default mode should suppress INFO logs, but stderr contains: {}",
        stderr
    );
    assert!(
        !stderr.contains(r#""level":"DEBUG""#),
        "Default mode should suppress DEBUG logs, but stderr contains: {}",
        stderr
    );
}

/// Verify that default mode preserves user-facing stdout output
#[test]
fn test_default_mode_preserves_stdout() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = run_vigil_timings(temp_dir.path());

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        stdout.contains("Refresh interval"),
        "stdout should contain the timing table, got: {}",
        stdout
    );
}

/// Verify verbose mode (-v) emits INFO logs
#[test]
fn test_verbose_flag_emits_info_logs() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = vigil_cmd(temp_dir.path())
        .args(["-v", "timings"])
        .output()
        .expect("Failed to execute 'vigil -v timings'");

    assert!(
        output.status.success(),
        "vigil -v timings failed with exit code {:?}",
        output.status.code()
    );

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        stderr.contains(r#""level":"INFO""#),
        "Verbose mode should emit INFO logs, but stderr is: {}",
        stderr
    );
}

/// Verify verbose flag works when placed after the subcommand (global flag)
#[test]
fn test_verbose_flag_after_subcommand() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = vigil_cmd(temp_dir.path())
        .args(["timings", "--verbose"])
        .output()
        .expect("Failed to execute 'vigil timings --verbose'");

    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        stderr.contains(r#""level":"INFO""#),
        "Verbose flag after subcommand should emit INFO logs, but stderr is: {}",
        stderr
    );
}

/// Verify that RUST_LOG alone does not override the default quiet directive
#[test]
fn test_rust_log_does_not_override_default_quiet() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = vigil_cmd(temp_dir.path())
        .env("RUST_LOG", "vigil=debug")
        .arg("timings")
        .output()
        .expect("Failed to execute command with RUST_LOG");

    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);

    // The quiet default (vigil=error) is added via add_directive and takes
    // precedence over the env filter
    assert!(
        !stderr.contains(r#""level":"INFO""#),
        "Default quiet should take precedence over RUST_LOG, stderr: {}",
        stderr
    );
}

/// Verify unknown flags are rejected with a non-zero exit code
#[test]
fn test_unknown_flag_exits_nonzero() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = vigil_cmd(temp_dir.path())
        .args(["timings", "--frobnicate"])
        .output()
        .expect("Failed to execute 'vigil timings --frobnicate'");

    assert!(
        !output.status.success(),
        "Unknown flag should exit non-zero"
    );
}

/// Verify running with no subcommand exits non-zero (help is printed)
#[test]
fn test_no_subcommand_exits_nonzero() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = vigil_cmd(temp_dir.path())
        .output()
        .expect("Failed to execute 'vigil'");

    assert!(!output.status.success(), "Bare 'vigil' should exit non-zero");
}

/// Drive the demo over piped stdin: a 'q' line must log the session out
/// and end the process.
#[test]
fn test_demo_logs_out_on_q_line() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut child = vigil_cmd(temp_dir.path())
        .arg("demo")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn 'vigil demo'");

    child
        .stdin
        .as_mut()
        .expect("stdin should be piped")
        .write_all(b"q\n")
        .expect("Failed to write to demo stdin");

    let output = child.wait_with_output().expect("Failed to wait for demo");

    assert!(
        output.status.success(),
        "vigil demo failed with exit code {:?}. stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Logged out"),
        "demo should report the logout, got: {}",
        stdout
    );
}

/// An extend against a failing gateway must terminate the session
/// (fail closed) rather than leave it running on an unconfirmed token.
#[test]
fn test_demo_fail_closed_on_extend() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut child = vigil_cmd(temp_dir.path())
        .args(["demo", "--fail-after", "1"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn 'vigil demo'");

    child
        .stdin
        .as_mut()
        .expect("stdin should be piped")
        .write_all(b"e\n")
        .expect("Failed to write to demo stdin");

    let output = child.wait_with_output().expect("Failed to wait for demo");

    assert!(
        output.status.success(),
        "vigil demo failed with exit code {:?}. stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("refresh_failed"),
        "demo should report fail-closed termination, got: {}",
        stdout
    );
}
