//! End-to-end CLI tests driving the `splice` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use splice_core::manifest;
use splice_core::types::{Manifest, Mapping, Markers};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn splice() -> Command {
    Command::cargo_bin("splice").expect("binary")
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// A project with one directory mapping and a `name` global.
fn setup_project(root: &Path) {
    write(root, "src/index.html", "hello @@name@@\n");
    write(root, "src/about.html", "@@_IF_:beta@@BETA @@_ENDIF_@@about @@name@@\n");

    let mut m = Manifest::starter(PathBuf::from("."));
    m.markers = Markers {
        suffix: "@@".to_owned(),
        ..Markers::default()
    };
    m.globals.insert("name".to_owned(), serde_json::json!("Ann"));
    m.globals.insert("beta".to_owned(), serde_json::json!(false));
    m.mappings = vec![Mapping {
        src: PathBuf::from("src"),
        dest: PathBuf::from("dist"),
        extensions: vec!["html".to_owned()],
    }];
    manifest::save(&manifest::manifest_path(root), &m).unwrap();
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_writes_starter_manifest() {
    let root = TempDir::new().unwrap();
    splice()
        .current_dir(root.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("splice.yaml"));
    assert!(root.path().join("splice.yaml").exists());
}

#[test]
fn init_refuses_second_run_without_force() {
    let root = TempDir::new().unwrap();
    splice().current_dir(root.path()).arg("init").assert().success();
    splice()
        .current_dir(root.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    splice()
        .current_dir(root.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

#[test]
fn build_writes_destinations() {
    let root = TempDir::new().unwrap();
    setup_project(root.path());

    splice()
        .current_dir(root.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 written"));

    assert_eq!(
        fs::read_to_string(root.path().join("dist/index.html")).unwrap(),
        "hello Ann\n"
    );
    // beta is falsy, so the conditional block is stripped
    assert_eq!(
        fs::read_to_string(root.path().join("dist/about.html")).unwrap(),
        "about Ann\n"
    );
}

#[test]
fn build_dry_run_writes_nothing() {
    let root = TempDir::new().unwrap();
    setup_project(root.path());

    splice()
        .current_dir(root.path())
        .args(["build", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run]"));

    assert!(!root.path().join("dist").exists(), "dry-run must not write");
}

#[test]
fn build_reports_failed_document_and_exits_nonzero() {
    let root = TempDir::new().unwrap();
    setup_project(root.path());
    write(root.path(), "src/broken.html", "@@include(\"absent.tpl\")@@");

    splice()
        .current_dir(root.path())
        .arg("build")
        .assert()
        .failure()
        .stdout(predicate::str::contains("absent.tpl"));

    // siblings still built
    assert!(root.path().join("dist/index.html").exists());
    assert!(!root.path().join("dist/broken.html").exists());
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

#[test]
fn render_prints_resolved_document() {
    let root = TempDir::new().unwrap();
    setup_project(root.path());
    write(root.path(), "partials/nav.tpl", "<nav>@@docroot@@</nav>");
    write(
        root.path(),
        "src/page.html",
        "@@include(\"../partials/nav.tpl\")@@",
    );

    splice()
        .current_dir(root.path())
        .args(["render", "src/page.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<nav>../</nav>"));
}

#[test]
fn render_missing_manifest_fails() {
    let root = TempDir::new().unwrap();
    write(root.path(), "page.html", "x");
    splice()
        .current_dir(root.path())
        .args(["render", "page.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("manifest"));
}

// ---------------------------------------------------------------------------
// diff
// ---------------------------------------------------------------------------

#[test]
fn diff_shows_unified_headers_and_writes_nothing() {
    let root = TempDir::new().unwrap();
    setup_project(root.path());

    splice()
        .current_dir(root.path())
        .arg("diff")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--- a/dist/index.html")
                .and(predicate::str::contains("+++ b/dist/index.html"))
                .and(predicate::str::contains("+hello Ann")),
        );

    assert!(!root.path().join("dist").exists(), "diff must not write");
}

#[test]
fn diff_after_clean_build_reports_no_changes() {
    let root = TempDir::new().unwrap();
    setup_project(root.path());

    splice().current_dir(root.path()).arg("build").assert().success();
    splice()
        .current_dir(root.path())
        .arg("diff")
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending changes."));
}
