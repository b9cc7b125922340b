//! Integration tests for the ghlink binary.
//!
//! These tests run the CLI against real Git repositories in temporary
//! directories. `HOME` and `XDG_CONFIG_HOME` point into a scratch directory
//! so user settings never leak in.

use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Fixtures
// =============================================================================

/// Run a git command and expect success.
fn run_git(dir: &Path, args: &[&str]) {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed to execute");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// A repository on `main` with one commit and an `origin` on GitHub.
fn create_repo() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let root = dir.path().canonicalize().expect("canonical temp dir");

    run_git(&root, &["init", "-b", "main"]);
    run_git(&root, &["config", "user.email", "test@example.com"]);
    run_git(&root, &["config", "user.name", "Test User"]);
    run_git(
        &root,
        &["remote", "add", "origin", "https://github.com/acme/widgets.git"],
    );
    std::fs::write(root.join("README.md"), "# widgets\n\nHello.\n").unwrap();
    run_git(&root, &["add", "."]);
    run_git(&root, &["commit", "-m", "Initial commit"]);

    (dir, root)
}

/// A ghlink command isolated from the user's settings.
fn ghlink(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ghlink").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env_remove("GHLINK_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

// =============================================================================
// General
// =============================================================================

#[test]
fn version_flag_works() {
    let home = TempDir::new().unwrap();
    ghlink(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ghlink"));
}

#[test]
fn completion_script_names_binary() {
    let home = TempDir::new().unwrap();
    ghlink(&home)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ghlink"));
}

// =============================================================================
// encode-path
// =============================================================================

#[test]
fn encode_path_escapes_segments() {
    let home = TempDir::new().unwrap();
    ghlink(&home)
        .args(["encode-path", "docs/read me?.md"])
        .assert()
        .success()
        .stdout("docs/read%20me%3F.md\n");
}

#[test]
fn encode_path_with_windows_separator() {
    let home = TempDir::new().unwrap();
    ghlink(&home)
        .args(["encode-path", "--separator", "\\", "src\\a#b.rs"])
        .assert()
        .success()
        .stdout("src/a%23b.rs\n");
}

#[test]
fn encode_path_json() {
    let home = TempDir::new().unwrap();
    ghlink(&home)
        .args(["--json", "encode-path", "a b"])
        .assert()
        .success()
        .stdout("{\"path\":\"a%20b\"}\n");
}

// =============================================================================
// url
// =============================================================================

#[test]
fn url_for_line_range() {
    let home = TempDir::new().unwrap();
    let (_dir, root) = create_repo();

    ghlink(&home)
        .arg("--cwd")
        .arg(&root)
        .args(["url", "README.md", "--lines", "1-3"])
        .assert()
        .success()
        .stdout("https://github.com/acme/widgets/blob/main/README.md#L1-L3\n");
}

#[test]
fn url_binary_has_no_anchor() {
    let home = TempDir::new().unwrap();
    let (_dir, root) = create_repo();

    ghlink(&home)
        .arg("--cwd")
        .arg(&root)
        .args(["url", "README.md", "--binary"])
        .assert()
        .success()
        .stdout("https://github.com/acme/widgets/blob/main/README.md\n");
}

#[test]
fn url_default_uses_fallback_flag() {
    let home = TempDir::new().unwrap();
    let (_dir, root) = create_repo();
    run_git(&root, &["checkout", "-b", "feature"]);

    ghlink(&home)
        .arg("--cwd")
        .arg(&root)
        .args([
            "url",
            "README.md",
            "--default",
            "--default-branch-fallback",
            "develop",
        ])
        .assert()
        .success()
        .stdout("https://github.com/acme/widgets/blob/develop/README.md\n");
}

#[test]
fn url_domain_override_from_repo_settings() {
    let home = TempDir::new().unwrap();
    let (_dir, root) = create_repo();
    run_git(
        &root,
        &["remote", "set-url", "origin", "git@git.corp.example:team/widgets.git"],
    );
    let settings = root.join(".git/ghlink");
    std::fs::create_dir_all(&settings).unwrap();
    std::fs::write(
        settings.join("config.toml"),
        "domain_override = \"git.corp.example\"\n",
    )
    .unwrap();

    ghlink(&home)
        .arg("--cwd")
        .arg(&root)
        .args(["--json", "url", "README.md", "--line", "2"])
        .assert()
        .success()
        .stdout("{\"url\":\"https://git.corp.example/team/widgets/blob/main/README.md#L2\"}\n");
}

#[test]
fn line_and_lines_conflict() {
    let home = TempDir::new().unwrap();
    ghlink(&home)
        .args(["url", "README.md", "--line", "1", "--lines", "1-2"])
        .assert()
        .failure();
}

#[test]
fn perma_and_default_conflict() {
    let home = TempDir::new().unwrap();
    ghlink(&home)
        .args(["url", "README.md", "--perma", "--default"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn url_outside_repository_fails_with_json_error() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    ghlink(&home)
        .arg("--cwd")
        .arg(dir.path())
        .args(["--json", "url", "notes.txt"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "\"error\":\"repository_discovery_timeout\"",
        ));
}

#[test]
fn url_outside_repository_fails_with_text_error() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    ghlink(&home)
        .arg("--cwd")
        .arg(dir.path())
        .args(["url", "notes.txt"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("error: "));
}

// =============================================================================
// default-branch
// =============================================================================

#[test]
fn default_branch_from_repo_settings() {
    let home = TempDir::new().unwrap();
    let (_dir, root) = create_repo();
    let settings = root.join(".git/ghlink");
    std::fs::create_dir_all(&settings).unwrap();
    std::fs::write(
        settings.join("config.toml"),
        "default_branch_fallback = \"trunk\"\n",
    )
    .unwrap();

    ghlink(&home)
        .arg("--cwd")
        .arg(&root)
        .arg("default-branch")
        .assert()
        .success()
        .stdout("trunk\n");
}

#[test]
fn default_branch_from_git_config() {
    let home = TempDir::new().unwrap();
    let (_dir, root) = create_repo();
    run_git(&root, &["config", "branch.main.remote", "origin"]);

    ghlink(&home)
        .arg("--cwd")
        .arg(&root)
        .arg("default-branch")
        .assert()
        .success()
        .stdout("main\n");
}

#[test]
fn deprecated_git_url_warns() {
    let home = TempDir::new().unwrap();
    let (_dir, root) = create_repo();
    let settings = root.join(".git/ghlink");
    std::fs::create_dir_all(&settings).unwrap();
    std::fs::write(
        settings.join("config.toml"),
        "git_url = \"github.com\"\ndefault_branch_fallback = \"main\"\n",
    )
    .unwrap();

    ghlink(&home)
        .arg("--cwd")
        .arg(&root)
        .arg("default-branch")
        .assert()
        .success()
        .stderr(predicate::str::contains("deprecated"));
}

#[test]
fn default_branch_outside_repository_fails() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    ghlink(&home)
        .arg("--cwd")
        .arg(dir.path())
        .arg("default-branch")
        .assert()
        .failure();
}
