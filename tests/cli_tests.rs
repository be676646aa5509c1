// End-to-end tests for the ksinstall binary
//
// Every run uses --dry-run so the package manager is never spawned; the
// invocation that would have run is printed on stdout instead.

use std::io::Write;
use std::process::{Command, Output};

use tempfile::{NamedTempFile, TempDir};

fn ksinstall(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ksinstall"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run ksinstall")
}

fn kickstart(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_dry_run_prints_install_command() {
    let file = kickstart("%packages\nvim\n@core\n-nano\n%end\n%post\nexit 1\n%end\n");
    let output = ksinstall(&["--dry-run", "kickstart", file.path().to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "dnf install --exclude=nano vim @core");
}

#[test]
fn test_alias_and_overrides() {
    let file = kickstart("%packages\ntmux\n%end\n");
    let output = ksinstall(&[
        "--dry-run",
        "-y",
        "--package-manager",
        "dnf5",
        "ks",
        file.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "dnf5 install -y tmux");
}

#[test]
fn test_settings_file() {
    let dir = TempDir::new().unwrap();
    let settings = dir.path().join("settings.json");
    std::fs::write(
        &settings,
        r#"{ "package_manager": "yum", "extra_args": ["--nogpgcheck"] }"#,
    )
    .unwrap();
    let file = kickstart("%packages\ngit\n%end\n");

    let output = ksinstall(&[
        "--config",
        settings.to_str().unwrap(),
        "--dry-run",
        "kickstart",
        file.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "yum install --nogpgcheck git"
    );
}

#[test]
fn test_two_paths_is_usage_error() {
    let output = ksinstall(&["--dry-run", "kickstart", "path1.ks", "path2.ks"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_path_is_usage_error() {
    let output = ksinstall(&["--dry-run", "kickstart"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_nonexistent_file_fails_cleanly() {
    let output = ksinstall(&["--dry-run", "kickstart", "non-existent.ks"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("non-existent.ks"), "stderr: {stderr}");
    assert!(!stderr.contains("panicked"));
}

#[test]
fn test_malformed_kickstart_fails_cleanly() {
    let file = kickstart("%packages\nvim\n");
    let output = ksinstall(&["--dry-run", "kickstart", file.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not end with %end"));
}

#[test]
fn test_unknown_command() {
    let output = ksinstall(&["--dry-run", "frobnicate"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No such command: frobnicate"));
}

#[test]
fn test_list_commands() {
    let output = ksinstall(&["--list-commands"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("kickstart"));
}
