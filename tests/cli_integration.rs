//! Integration tests for the CLI
//!
//! Drives the compiled binary against scratch files and checks exit codes,
//! file contents and console output for apply, check and show.

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PATCH: &str = r#"[meta]
name = "swap-target"
description = "Test patch"

[patch]
file = "src/lib.rs"
target = "TARGET"
replacement = "X"
anchor = "abc"
context_window = 12
"#;

/// Workspace with `src/lib.rs` holding `content` and a patch definition.
fn setup_workspace(content: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/lib.rs"), content).unwrap();
    fs::write(dir.path().join("patch.toml"), PATCH).unwrap();
    dir
}

#[allow(deprecated)]
fn blockpatch(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("blockpatch").expect("binary");
    cmd.current_dir(workdir).arg("--no-color");
    cmd
}

fn read(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join("src/lib.rs")).unwrap()
}

#[test]
fn test_apply_replaces_all_occurrences() {
    let workspace = setup_workspace("abc TARGET def TARGET ghi");

    let output = blockpatch(workspace.path())
        .args(["apply", "--patch", "patch.toml"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("swap-target: Applied to src/lib.rs (2 occurrences)"));
    assert_eq!(read(&workspace), "abc X def X ghi");
}

#[test]
fn test_apply_without_match_prints_window() {
    let workspace = setup_workspace("abc def ghi jkl mno");

    let output = blockpatch(workspace.path())
        .args(["apply", "--patch", "patch.toml"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Target text not found"));
    assert!(stderr.contains("found at line 1 (byte 0)"));
    assert!(stderr.contains("Context (12 chars):\nabc def ghi \n"));
    assert_eq!(read(&workspace), "abc def ghi jkl mno");
}

#[test]
fn test_apply_without_anchor() {
    let workspace = setup_workspace("nothing relevant");

    let output = blockpatch(workspace.path())
        .args(["apply", "--patch", "patch.toml"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Anchor \"abc\" not found either"));
    assert!(!stderr.contains("Context ("));
    assert_eq!(read(&workspace), "nothing relevant");
}

#[test]
fn test_second_apply_fails_and_reports_applied() {
    let workspace = setup_workspace("abc TARGET");

    blockpatch(workspace.path())
        .args(["apply", "--patch", "patch.toml"])
        .assert()
        .success();

    let output = blockpatch(workspace.path())
        .args(["apply", "--patch", "patch.toml"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("the patch looks applied"));
    assert_eq!(read(&workspace), "abc X");
}

#[test]
fn test_dry_run_with_diff() {
    let workspace = setup_workspace("abc\nTARGET\n");

    let output = blockpatch(workspace.path())
        .args(["apply", "--patch", "patch.toml", "--dry-run", "--diff"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Would apply to src/lib.rs"));
    assert!(stdout.contains("-TARGET"));
    assert!(stdout.contains("+X"));
    assert_eq!(read(&workspace), "abc\nTARGET\n");
}

#[test]
fn test_file_override() {
    let workspace = setup_workspace("untouched");
    fs::write(workspace.path().join("other.rs"), "TARGET").unwrap();

    blockpatch(workspace.path())
        .args(["apply", "--patch", "patch.toml", "--file", "other.rs"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(workspace.path().join("other.rs")).unwrap(),
        "X"
    );
    assert_eq!(read(&workspace), "untouched");
}

#[test]
fn test_check_does_not_modify() {
    let workspace = setup_workspace("abc TARGET");

    let output = blockpatch(workspace.path())
        .args(["check", "--patch", "patch.toml"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Would apply to src/lib.rs (1 occurrence)"));
    assert_eq!(read(&workspace), "abc TARGET");
}

#[test]
fn test_missing_file_is_fatal() {
    let workspace = setup_workspace("");
    fs::remove_file(workspace.path().join("src/lib.rs")).unwrap();

    let output = blockpatch(workspace.path())
        .args(["apply", "--patch", "patch.toml"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Patch 'swap-target' aborted: Failed to read src/lib.rs: "));
}

#[test]
fn test_non_utf8_file_is_fatal() {
    let workspace = setup_workspace("");
    let path = workspace.path().join("src/lib.rs");
    fs::write(&path, b"abc TARGET \xff").unwrap();

    let output = blockpatch(workspace.path())
        .args(["apply", "--patch", "patch.toml"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read src/lib.rs"));
    assert!(stderr.contains("not valid UTF-8"));
    assert_eq!(fs::read(&path).unwrap(), b"abc TARGET \xff");
}

#[test]
fn test_invalid_definition_is_fatal() {
    let workspace = setup_workspace("abc");
    fs::write(
        workspace.path().join("bad.toml"),
        "[patch]\nfile = \"src/lib.rs\"\ntarget = \"\"\nreplacement = \"\"\nanchor = \"a\"\n",
    )
    .unwrap();

    let output = blockpatch(workspace.path())
        .args(["apply", "--patch", "bad.toml"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Patch definition bad.toml is invalid: "));
    assert!(stderr.contains("missing required field 'target'"));
}

#[test]
fn test_check_read_error_names_patch() {
    let workspace = setup_workspace("");
    fs::remove_file(workspace.path().join("src/lib.rs")).unwrap();

    let output = blockpatch(workspace.path())
        .args(["check", "--patch", "patch.toml"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot check patch 'swap-target': Failed to read src/lib.rs"));
}

#[test]
fn test_default_run_uses_builtin_patch() {
    // No src/compress/mod.rs in the workspace: the built-in patch cannot read
    // its fixed target path.
    let workspace = TempDir::new().unwrap();

    let output = blockpatch(workspace.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("src/compress/mod.rs"));
}

#[test]
fn test_show_builtin() {
    let workspace = TempDir::new().unwrap();

    let output = blockpatch(workspace.path()).arg("show").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Patch: compress-chunk-buffer"));
    assert!(stdout.contains("File: src/compress/mod.rs"));
    assert!(stdout.contains("Anchor: \"let compressed_chunks_res\""));
}
