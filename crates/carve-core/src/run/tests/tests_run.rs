//! Tests for the run record

#![allow(clippy::expect_used)]

use crate::pipeline::ExtractionSummary;
use crate::run::ExtractionRun;
use crate::scanner::{Language, LanguageFilter, ScanSummary};
use crate::unit::{Authority, UnitKind};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is valid UTF-8")
}

/// Create a git repository holding one commit, on `branch_name`
fn create_test_repo_with_commit(dir: &Path, branch_name: &str) -> Result<git2::Oid, git2::Error> {
    let repo = git2::Repository::init(dir)?;

    fs::write(dir.join("main.c"), "int main(void) { return 0; }").expect("Failed to write test file");

    let sig = git2::Signature::now("Test User", "test@example.com")?;

    let mut index = repo.index()?;
    index.add_path(Path::new("main.c"))?;
    index.write()?;

    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;

    let commit_oid = repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])?;

    if branch_name != "master" && branch_name != "main" {
        let commit = repo.find_commit(commit_oid)?;
        repo.branch(branch_name, &commit, false)?;
        repo.set_head(&format!("refs/heads/{}", branch_name))?;
        repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;
    }

    Ok(commit_oid)
}

#[test]
fn test_run_creation() {
    let run = ExtractionRun::new("/path/to/repo", UnitKind::Function);

    assert_eq!(run.repo_root, "/path/to/repo");
    assert!(!run.id.is_empty());
    assert!(run.commit_sha.is_none());
    assert!(run.branch.is_none());
    assert!(run.finished_at.is_none());
    assert_eq!(run.language, "all");
    assert_eq!(run.authority, Authority::Informative);
}

#[test]
fn test_run_ids_are_unique() {
    let a = ExtractionRun::new("/repo", UnitKind::File);
    let b = ExtractionRun::new("/repo", UnitKind::File);
    assert_ne!(a.id, b.id);
}

#[test]
fn test_run_builder() {
    let run = ExtractionRun::new("/path/to/repo", UnitKind::Class)
        .with_commit("abc123")
        .with_branch("main")
        .with_language(LanguageFilter::Only(Language::Cpp))
        .with_authority(Authority::Normative);

    assert_eq!(run.commit_sha, Some("abc123".to_string()));
    assert_eq!(run.branch, Some("main".to_string()));
    assert_eq!(run.language, "cpp");
    assert_eq!(run.unit, UnitKind::Class);
    assert_eq!(run.authority, Authority::Normative);
}

#[test]
fn test_finish_records_counters() {
    let scan = ScanSummary {
        total_files_matched: 4,
        skipped_excluded: 1,
        ..ScanSummary::default()
    };
    let extraction = ExtractionSummary {
        files_processed: 3,
        units_extracted: 7,
        ..ExtractionSummary::default()
    };

    let run = ExtractionRun::new("/repo", UnitKind::Function).finish(scan, extraction);

    assert_eq!(run.scan, scan);
    assert_eq!(run.extraction, extraction);
    let finished = run.finished_at.expect("finish time set");
    assert!(finished >= run.started_at);
}

#[test]
fn test_run_serializes_manifest_fields() {
    let run = ExtractionRun::new("/repo", UnitKind::Function).with_commit("abc123");

    let value = serde_json::to_value(&run).expect("serialize");

    assert_eq!(value["repo_root"], "/repo");
    assert_eq!(value["commit_sha"], "abc123");
    assert_eq!(value["unit"], "function");
    assert_eq!(value["authority"], "informative");
    assert_eq!(value["extraction"]["units_extracted"], 0);
    assert!(value["started_at"].is_string());
}

#[test]
fn test_with_git_info_valid_repo() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo_path = temp_dir.path();

    let commit_oid =
        create_test_repo_with_commit(repo_path, "main").expect("Failed to create test repo");

    let run = ExtractionRun::new(path_str(repo_path), UnitKind::Function).with_git_info();

    assert_eq!(
        run.commit_sha,
        Some(commit_oid.to_string()),
        "commit_sha should match the actual commit"
    );

    // Branch name might be "master" or "main" depending on git version/config
    let branch = run.branch.expect("branch should be populated");
    assert!(
        branch == "main" || branch == "master",
        "branch should be main or master, got: {}",
        branch
    );
}

#[test]
fn test_with_git_info_non_existent_directory() {
    let run = ExtractionRun::new("/this/path/does/not/exist/anywhere", UnitKind::Function)
        .with_git_info();

    assert!(run.commit_sha.is_none());
    assert!(run.branch.is_none());
}

#[test]
fn test_with_git_info_non_git_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("main.c"), "int x;").expect("Failed to write test file");

    let run = ExtractionRun::new(path_str(temp_dir.path()), UnitKind::Function).with_git_info();

    assert!(run.commit_sha.is_none(), "commit_sha should remain None for non-git directory");
    assert!(run.branch.is_none(), "branch should remain None for non-git directory");
}

#[test]
fn test_with_git_info_subdirectory_discovers_parent_repo() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo_path = temp_dir.path();

    let commit_oid =
        create_test_repo_with_commit(repo_path, "main").expect("Failed to create test repo");

    let subdir = repo_path.join("src");
    fs::create_dir(&subdir).expect("Failed to create subdirectory");

    let run = ExtractionRun::new(path_str(&subdir), UnitKind::Function).with_git_info();

    assert_eq!(
        run.commit_sha,
        Some(commit_oid.to_string()),
        "commit_sha should match the parent repo's commit"
    );
    assert!(run.branch.is_some(), "branch should be populated from parent repo");
}

#[test]
fn test_with_git_info_custom_branch() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo_path = temp_dir.path();

    let commit_oid = create_test_repo_with_commit(repo_path, "feature/test-branch")
        .expect("Failed to create test repo");

    let run = ExtractionRun::new(path_str(repo_path), UnitKind::Function).with_git_info();

    assert_eq!(run.commit_sha, Some(commit_oid.to_string()));
    assert_eq!(run.branch, Some("feature/test-branch".to_string()));
}

#[test]
fn test_with_git_info_detached_head() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo_path = temp_dir.path();

    let commit_oid =
        create_test_repo_with_commit(repo_path, "main").expect("Failed to create test repo");

    let repo = git2::Repository::open(repo_path).expect("Failed to open repo");
    repo.set_head_detached(commit_oid)
        .expect("Failed to detach HEAD");

    let run = ExtractionRun::new(path_str(repo_path), UnitKind::Function).with_git_info();

    assert_eq!(run.commit_sha, Some(commit_oid.to_string()));
    // shorthand() of a detached HEAD is "HEAD"
    assert_eq!(run.branch, Some("HEAD".to_string()));
}

#[test]
fn test_with_git_info_empty_repo() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo_path = temp_dir.path();

    git2::Repository::init(repo_path).expect("Failed to init repo");

    let run = ExtractionRun::new(path_str(repo_path), UnitKind::Function).with_git_info();

    // No commits means no HEAD
    assert!(run.commit_sha.is_none());
    assert!(run.branch.is_none());
}

#[test]
fn test_with_git_info_preserves_other_fields() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo_path = temp_dir.path();

    create_test_repo_with_commit(repo_path, "main").expect("Failed to create test repo");

    let run = ExtractionRun::new(path_str(repo_path), UnitKind::Class)
        .with_authority(Authority::Unverified)
        .with_git_info()
        .with_language(LanguageFilter::Only(Language::Python));

    assert!(run.commit_sha.is_some());
    assert_eq!(run.authority, Authority::Unverified);
    assert_eq!(run.language, "python");
    assert_eq!(run.unit, UnitKind::Class);
}
