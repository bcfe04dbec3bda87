/*!
 * Integration tests for the flatdir command line
 */

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};
use walkdir::WalkDir;

fn flatdir() -> Command {
    Command::cargo_bin("flatdir").unwrap()
}

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempdir().unwrap();
    for (rel, content) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

/// File name -> content for everything below `dir`
fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).unwrap().to_string_lossy().to_string();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

fn flattened_names(root: &Path) -> Vec<String> {
    snapshot(&root.join("flattened")).into_keys().collect()
}

#[test]
fn test_no_subcommand_prints_help() {
    flatdir()
        .assert()
        .success()
        .stdout(predicate::str::contains("flatten"))
        .stdout(predicate::str::contains("concat"));
}

#[test]
fn test_flatten_encodes_paths() {
    let dir = project(&[("a/b/c.ext", "c"), ("top.txt", "t")]);

    flatdir()
        .arg("flatten")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Flattened 2 files"))
        .stdout(predicate::str::contains("flattened"));

    assert_eq!(flattened_names(dir.path()), vec!["a^b^c.ext", "top.txt"]);
}

#[test]
fn test_flatten_to_txt_replaces_extension() {
    let dir = project(&[("a/b/c.ext", "c")]);

    flatdir()
        .arg("flatten")
        .arg(dir.path())
        .arg("--toTxt=.ext")
        .assert()
        .success();

    assert_eq!(flattened_names(dir.path()), vec!["a^b^c.txt"]);
}

#[test]
fn test_flatten_twice_is_byte_identical() {
    let dir = project(&[("src/lib.rs", "pub fn x() {}"), ("docs/guide.md", "# Guide")]);
    let out = dir.path().join("flattened");

    flatdir().arg("flatten").arg(dir.path()).assert().success();
    let first = snapshot(&out);
    flatdir().arg("flatten").arg(dir.path()).assert().success();

    assert_eq!(first, snapshot(&out));
}

#[test]
fn test_flatten_defaults_to_current_directory() {
    let dir = project(&[("x/y.rs", "y")]);

    flatdir()
        .current_dir(dir.path())
        .arg("flatten")
        .assert()
        .success();

    assert_eq!(flattened_names(dir.path()), vec!["x^y.rs"]);
}

#[test]
fn test_exclude_dir_removes_whole_subtree() {
    let dir = project(&[
        ("keep/file.rs", "k"),
        ("dist/bundle.js", "b"),
        ("pkg/dist/deep/unrelated.md", "u"),
    ]);

    flatdir()
        .arg("flatten")
        .arg(dir.path())
        .arg("--excludeDir=dist")
        .assert()
        .success();

    assert_eq!(flattened_names(dir.path()), vec!["keep^file.rs"]);
}

#[test]
fn test_exclude_file_by_name() {
    let dir = project(&[("a/.env", "SECRET=1"), ("a/app.js", "app")]);

    flatdir()
        .args(["concat", "--excludeFile", ".env"])
        .arg(dir.path())
        .assert()
        .success();

    let text = fs::read_to_string(dir.path().join("concatenated/all.txt")).unwrap();
    assert!(!text.contains("SECRET"));
    assert!(text.contains("=== a/app.js ==="));
}

#[test]
fn test_gitignore_log_files_absent_from_both_modes() {
    let dir = project(&[
        (".gitignore", "*.log\n"),
        ("app.log", "noise"),
        ("deep/er/trace.log", "noise"),
        ("deep/er/code.rs", "fn f() {}"),
    ]);

    flatdir().arg("flatten").arg(dir.path()).assert().success();
    flatdir().arg("concat").arg(dir.path()).assert().success();

    let names = flattened_names(dir.path());
    assert!(names.iter().all(|n| !n.ends_with(".log")));
    assert!(names.contains(&"deep^er^code.rs".to_string()));

    let text = fs::read_to_string(dir.path().join("concatenated/all.txt")).unwrap();
    assert!(!text.contains("noise"));
    assert!(text.contains("=== deep/er/code.rs ==="));
}

#[test]
fn test_concat_blocks() {
    let dir = project(&[("src/a.js", "hello"), ("b.txt", "world")]);

    flatdir()
        .arg("concat")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Concatenated 2 files"));

    let text = fs::read_to_string(dir.path().join("concatenated/all.txt")).unwrap();
    assert_eq!(text, "=== b.txt ===\nworld\n\n=== src/a.js ===\nhello\n");
}

#[test]
fn test_concat_custom_output_keeps_previous_artifacts() {
    let dir = project(&[("one.txt", "1")]);

    flatdir().arg("concat").arg(dir.path()).assert().success();
    flatdir()
        .arg("concat")
        .arg(dir.path())
        .arg("--output=second.txt")
        .assert()
        .success();

    let container = dir.path().join("concatenated");
    assert!(container.join("all.txt").exists());
    assert_eq!(
        fs::read_to_string(container.join("second.txt")).unwrap(),
        "=== one.txt ===\n1\n"
    );
}

#[test]
fn test_concat_marks_unreadable_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("image.bin"), [0xffu8, 0xd8, 0xff]).unwrap();
    fs::write(dir.path().join("notes.md"), "ok").unwrap();

    flatdir().arg("concat").arg(dir.path()).assert().success();

    let text = fs::read_to_string(dir.path().join("concatenated/all.txt")).unwrap();
    assert!(text.starts_with("=== image.bin ===\n[Error reading file: "));
    assert!(text.ends_with("=== notes.md ===\nok\n"));
}

#[test]
fn test_lockfiles_excluded_by_default() {
    let dir = project(&[
        ("yarn.lock", "y"),
        ("web/package-lock.json", "{}"),
        ("pnpm-lock.yaml", "p"),
        ("package.json", "{}"),
    ]);

    flatdir().arg("flatten").arg(dir.path()).assert().success();
    flatdir().arg("concat").arg(dir.path()).assert().success();

    assert_eq!(flattened_names(dir.path()), vec!["package.json"]);
    let text = fs::read_to_string(dir.path().join("concatenated/all.txt")).unwrap();
    assert_eq!(text, "=== package.json ===\n{}\n");
}

#[test]
fn test_missing_directory_fails_without_output() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    flatdir()
        .current_dir(dir.path())
        .arg("flatten")
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Directory not found"));

    assert!(!missing.exists());
    assert!(!dir.path().join("flattened").exists());
}

#[test]
fn test_file_target_is_rejected() {
    let dir = project(&[("file.txt", "x")]);

    flatdir()
        .arg("concat")
        .arg(dir.path().join("file.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a directory"));
}

#[test]
fn test_collision_is_an_error() {
    let dir = project(&[("a/b.txt", "nested"), ("a^b.txt", "literal")]);

    flatdir()
        .arg("flatten")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Name collision"));

    assert!(!dir.path().join("flattened").exists());
}

#[test]
fn test_file_named_flattened_is_never_deleted() {
    let dir = project(&[("flattened", "precious user data"), ("a.txt", "a")]);

    flatdir()
        .arg("flatten")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));

    let kept = dir.path().join("flattened");
    assert!(kept.is_file());
    assert_eq!(fs::read_to_string(kept).unwrap(), "precious user data");
}

#[cfg(unix)]
#[test]
fn test_unlistable_directory_fails_the_run() {
    use std::os::unix::fs::PermissionsExt;

    let dir = project(&[("a.txt", "a"), ("sub/b.txt", "b")]);
    let sub = dir.path().join("sub");
    fs::set_permissions(&sub, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores directory permissions, so there is nothing to observe
    if fs::read_dir(&sub).is_ok() {
        fs::set_permissions(&sub, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let assert = flatdir().arg("concat").arg(dir.path()).assert();
    fs::set_permissions(&sub, fs::Permissions::from_mode(0o755)).unwrap();

    assert
        .failure()
        .stderr(predicate::str::contains("Error:").and(predicate::str::contains("sub")));
    assert!(!dir.path().join("concatenated").exists());
}

#[test]
fn test_invalid_output_name() {
    let dir = project(&[("a.txt", "a")]);

    flatdir()
        .arg("concat")
        .arg(dir.path())
        .arg("--output=../escape.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));

    assert!(!dir.path().join("concatenated").exists());
}

#[test]
fn test_completions() {
    flatdir()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("flatdir"));
}
