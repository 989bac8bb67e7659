//! End-to-end commit scenarios against real git and hg repositories
//!
//! Each scenario builds a fresh repository, installs the scanner hook,
//! copies fixtures in and commits. Scenarios for a backend whose tool is
//! not installed are skipped with a `SKIPPED:` line on stderr; set
//! `GUARD_REQUIRE_TOOLS=1` to make them fail instead.

use std::path::{Path, PathBuf};

use guard_harness::{
    BackendKind, CommitExpectations, Harness, HarnessConfig, HookDescriptor, Platform,
    forbidden_statement_message, logging,
};
use guard_vcs::process::require_tool;
use rstest::rstest;
use tempfile::TempDir;

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures")
}

/// Harness for `backend` with repositories under a scratch data directory,
/// or `None` when the backend's tool is missing and not required.
async fn harness_for(backend: BackendKind) -> Option<(TempDir, Harness)> {
    let _ = logging::init();

    if !require_tool(backend.program()).await {
        return None;
    }

    let data = TempDir::new().unwrap();
    let root = fixtures_root();
    let config = HarnessConfig::new(&root)
        .with_backend(backend)
        .with_hooks_dir(root.join("hooks"))
        .with_fixtures_dir(&root)
        .with_data_dir(data.path().join("test"));

    Some((data, Harness::new(config)))
}

fn hook_for(backend: BackendKind) -> HookDescriptor {
    match backend {
        BackendKind::Git => HookDescriptor::new("pre-commit"),
        BackendKind::Hg => HookDescriptor::new("pre-commit").with_event("precommit"),
    }
}

fn inject_console_log(content: &str) -> String {
    format!("console.log('injected');\n{content}")
}

#[tokio::test]
async fn git_blocks_commit_with_forbidden_statement() {
    let Some((_data, harness)) = harness_for(BackendKind::Git).await else {
        return;
    };

    let repo = harness.create_repo().await.unwrap();
    harness
        .install_hook(&repo, &HookDescriptor::new("pre-commit"))
        .await
        .unwrap();
    harness.place_fixture(&repo, "bad.js", None).await.unwrap();

    let report = harness.commit_all(&repo).await.unwrap();

    report.assert_rejected_with(&forbidden_statement_message("console.log"));
    repo.destroy().await.unwrap();
}

#[tokio::test]
async fn hg_accepts_commit_without_forbidden_statement() {
    let Some((_data, harness)) = harness_for(BackendKind::Hg).await else {
        return;
    };

    let repo = harness.create_repo().await.unwrap();
    harness
        .install_hook(
            &repo,
            &HookDescriptor::new("pre-commit").with_event("precommit"),
        )
        .await
        .unwrap();
    harness.place_fixture(&repo, "good.js", None).await.unwrap();

    let report = harness.commit_all(&repo).await.unwrap();

    report.assert_accepted();
    repo.destroy().await.unwrap();
}

#[rstest]
#[case::git_bad(BackendKind::Git, "bad.js", Some("console.log"))]
#[case::git_debugger(BackendKind::Git, "debugger.js", Some("debugger"))]
#[case::git_good(BackendKind::Git, "good.js", None)]
#[case::git_text(BackendKind::Git, "clean.txt", None)]
#[case::hg_bad(BackendKind::Hg, "bad.js", Some("console.log"))]
#[case::hg_debugger(BackendKind::Hg, "debugger.js", Some("debugger"))]
#[case::hg_good(BackendKind::Hg, "good.js", None)]
#[case::hg_text(BackendKind::Hg, "clean.txt", None)]
#[tokio::test]
async fn fixture_outcome_matches_content(
    #[case] backend: BackendKind,
    #[case] fixture: &str,
    #[case] forbidden: Option<&str>,
) {
    let Some((_data, harness)) = harness_for(backend).await else {
        return;
    };

    let report = harness
        .commit_fixtures(&hook_for(backend), &[fixture])
        .await
        .unwrap();

    match forbidden {
        Some(statement) => report.assert_rejected_with(&forbidden_statement_message(statement)),
        None => report.assert_accepted(),
    }
}

#[rstest]
#[case::git(BackendKind::Git)]
#[case::hg(BackendKind::Hg)]
#[tokio::test]
async fn one_bad_file_blocks_the_whole_commit(#[case] backend: BackendKind) {
    let Some((_data, harness)) = harness_for(backend).await else {
        return;
    };

    let report = harness
        .commit_fixtures(&hook_for(backend), &["good.js", "clean.txt", "bad.js"])
        .await
        .unwrap();

    report.assert_rejected();
}

#[rstest]
#[case::git(BackendKind::Git)]
#[case::hg(BackendKind::Hg)]
#[tokio::test]
async fn transformed_fixture_is_scanned(#[case] backend: BackendKind) {
    let Some((_data, harness)) = harness_for(backend).await else {
        return;
    };

    let repo = harness.create_repo().await.unwrap();
    harness.install_hook(&repo, &hook_for(backend)).await.unwrap();
    let placed = harness
        .place_fixture(&repo, "good.js", Some(inject_console_log))
        .await
        .unwrap();
    assert!(std::fs::read_to_string(&placed).unwrap().starts_with("console.log"));

    harness.commit_all(&repo).await.unwrap().assert_rejected();
    repo.destroy().await.unwrap();
}

#[rstest]
#[case::git(BackendKind::Git)]
#[case::hg(BackendKind::Hg)]
#[tokio::test]
async fn clean_commit_then_blocked_commit(#[case] backend: BackendKind) {
    let Some((_data, harness)) = harness_for(backend).await else {
        return;
    };

    let repo = harness.create_repo().await.unwrap();
    harness.install_hook(&repo, &hook_for(backend)).await.unwrap();

    harness.place_fixture(&repo, "good.js", None).await.unwrap();
    harness.commit_all(&repo).await.unwrap().assert_accepted();

    harness.place_fixture(&repo, "debugger.js", None).await.unwrap();
    harness
        .commit_all(&repo)
        .await
        .unwrap()
        .assert_rejected_with(&forbidden_statement_message("debugger"));

    repo.destroy().await.unwrap();
}

#[rstest]
#[case::git(BackendKind::Git)]
#[case::hg(BackendKind::Hg)]
#[tokio::test]
async fn commit_without_hook_is_accepted(#[case] backend: BackendKind) {
    let Some((_data, harness)) = harness_for(backend).await else {
        return;
    };

    let repo = harness.create_repo().await.unwrap();
    harness.place_fixture(&repo, "bad.js", None).await.unwrap();

    harness.commit_all(&repo).await.unwrap().assert_accepted();
    repo.destroy().await.unwrap();
}

#[tokio::test]
async fn hg_hook_without_event_fails_setup() {
    let Some((_data, harness)) = harness_for(BackendKind::Hg).await else {
        return;
    };

    let repo = harness.create_repo().await.unwrap();
    let result = harness
        .install_hook(&repo, &HookDescriptor::new("pre-commit"))
        .await;

    assert!(result.is_err());
    repo.destroy().await.unwrap();
}

#[tokio::test]
async fn concurrent_scenarios_use_separate_repositories() {
    let Some((_data, harness)) = harness_for(BackendKind::Git).await else {
        return;
    };
    let hook = hook_for(BackendKind::Git);

    let (bad, good) = tokio::join!(
        harness.commit_fixtures(&hook, &["bad.js"]),
        harness.commit_fixtures(&hook, &["good.js"]),
    );

    bad.unwrap().assert_rejected();
    good.unwrap().assert_accepted();
}

#[tokio::test]
async fn scenario_cleans_up_its_repository() {
    let Some((data, harness)) = harness_for(BackendKind::Git).await else {
        return;
    };

    harness
        .commit_fixtures(&hook_for(BackendKind::Git), &["good.js"])
        .await
        .unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(data.path().join("test"))
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert!(leftovers.is_empty(), "repositories left behind: {leftovers:?}");
}

#[test]
fn harness_defaults_to_running_platform() {
    let config = HarnessConfig::new(fixtures_root());
    assert_eq!(config.platform, Platform::current());
}
