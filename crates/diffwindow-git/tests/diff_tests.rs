// Copyright (c) 2026 - present diffwindow contributors
// SPDX-License-Identifier: MIT

//! Tests for reducing a commit window to a single diff


use diffwindow_git::{
    ChangeStatus, ExclusionFilter, GitError, Stage, WindowOptions, compute_windowed_diff,
};
use similar_asserts::assert_eq;
use test_utils::{ALICE, BOB, Change, DAY, T0, TestGitRepo, at};

// ============================================================================
// Degenerate windows
// ============================================================================

#[test]
fn test_empty_window_is_empty_range() {
    let repo = TestGitRepo::new("empty_window");
    repo.commit_file(ALICE, T0, "README.md", "hi\n", "init");

    let result = repo.open().reduce_diff(&[]);
    match result {
        Err(err @ GitError::EmptyRange) => {
            assert!(err.is_empty_range());
            assert_eq!(err.stage(), Stage::DiffReduction);
        }
        other => panic!("Expected EmptyRange, got {other:?}"),
    }
}

#[test]
fn test_single_root_commit_diffs_against_empty_tree() {
    let repo = TestGitRepo::new("root_commit");
    repo.commit_file(ALICE, T0, "README.md", "Hello, World!", "Initial commit");

    let git = repo.open();
    let commits = git
        .select_commits(&WindowOptions::since(at(T0 - DAY)))
        .expect("select");
    assert_eq!(commits.len(), 1);

    let diff = git.reduce_diff(&commits).expect("reduce");
    assert!(diff.base.is_none());
    assert_eq!(diff.target, commits[0].sha);
    assert_eq!(diff.files.len(), 1);
    assert_eq!(diff.files[0].path, "README.md");
    assert_eq!(diff.files[0].status, ChangeStatus::Added);
    assert_eq!(diff.files[0].insertions, 1);

    let patch = diff.patch();
    assert!(patch.contains("README.md"), "patch:\n{patch}");
    assert!(patch.contains("+Hello, World!"), "patch:\n{patch}");
}

#[test]
fn test_single_commit_diffs_against_first_parent() {
    let repo = TestGitRepo::new("single_commit");
    let c1 = repo.commit_file(ALICE, T0, "a.txt", "one\n", "c1");
    repo.commit_file(ALICE, T0 + DAY, "b.txt", "two\n", "c2");

    let git = repo.open();
    let commits = git
        .select_commits(&WindowOptions::since(at(T0 + DAY)))
        .expect("select");
    let diff = git.reduce_diff(&commits).expect("reduce");

    assert_eq!(diff.base.as_deref(), Some(c1.as_str()));
    let paths: Vec<&str> = diff.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["b.txt"]);
}

#[test]
fn test_single_commit_window_base_ignores_author_filter() {
    // Only Alice's c3 matches, but its base is Bob's c2 (the immediate
    // parent), not an earlier Alice commit.
    let repo = TestGitRepo::new("single_commit_filtered");
    repo.commit_file(ALICE, T0, "a.txt", "alice 1\n", "c1");
    let c2 = repo.commit_file(BOB, T0 + DAY, "b.txt", "bob\n", "c2");
    repo.commit_file(ALICE, T0 + 2 * DAY, "a.txt", "alice 2\n", "c3");

    let git = repo.open();
    let commits = git
        .select_commits(&WindowOptions::since(at(T0 + DAY)).by_author(ALICE.email))
        .expect("select");
    assert_eq!(commits.len(), 1);

    let diff = git.reduce_diff(&commits).expect("reduce");
    assert_eq!(diff.base.as_deref(), Some(c2.as_str()));
    let paths: Vec<&str> = diff.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["a.txt"]);
}

// ============================================================================
// Net effect
// ============================================================================

#[test]
fn test_multi_commit_window_equals_direct_tree_diff() {
    let repo = TestGitRepo::new("net_effect");
    repo.commit_file(ALICE, T0, "a.txt", "1\n", "c1");
    let c2 = repo.commit_file(ALICE, T0 + DAY, "b.txt", "2\n", "c2");
    repo.commit_file(BOB, T0 + 2 * DAY, "a.txt", "1\n3\n", "c3");
    let c4 = repo.commit_file(ALICE, T0 + 3 * DAY, "c.txt", "4\n", "c4");

    let git = repo.open();
    let commits = git
        .select_commits(&WindowOptions::since(at(T0 + DAY)))
        .expect("select");
    assert_eq!(commits.len(), 3);

    let reduced = git.reduce_diff(&commits).expect("reduce");
    let direct = git.diff_commits(Some(&c2), &c4).expect("direct diff");
    assert_eq!(reduced, direct);
    assert_eq!(reduced.patch(), direct.patch());
}

#[test]
fn test_multi_commit_window_starts_from_oldest_tree() {
    // The oldest commit in the window is the base, so its own changes are
    // not part of the result.
    let repo = TestGitRepo::new("oldest_base");
    repo.commit_file(ALICE, T0, "a.txt", "1\n", "c1");
    repo.commit_file(ALICE, T0 + DAY, "b.txt", "2\n", "c2");
    repo.commit_file(ALICE, T0 + 2 * DAY, "c.txt", "3\n", "c3");

    let git = repo.open();
    let commits = git
        .select_commits(&WindowOptions::since(at(T0 + DAY)))
        .expect("select");
    let diff = git.reduce_diff(&commits).expect("reduce");

    let paths: Vec<&str> = diff.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["c.txt"]);
}

#[test]
fn test_file_added_then_deleted_nets_to_nothing() {
    let repo = TestGitRepo::new("add_delete");
    repo.commit_file(ALICE, T0, "README.md", "hello\n", "c1");
    repo.commit_file(ALICE, T0 + DAY, "tmp.txt", "scratch\n", "c2");
    repo.commit(
        ALICE,
        T0 + 2 * DAY,
        "c3",
        &[Change::Remove("tmp.txt")],
    );
    repo.commit_file(ALICE, T0 + 3 * DAY, "README.md", "hello\nworld\n", "c4");

    let git = repo.open();
    let commits = git
        .select_commits(&WindowOptions::since(at(T0)))
        .expect("select");
    let diff = git.reduce_diff(&commits).expect("reduce");

    let paths: Vec<&str> = diff.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["README.md"]);
    assert!(!diff.patch().contains("tmp.txt"));
}

#[test]
fn test_file_modified_twice_nets_to_one_change() {
    let repo = TestGitRepo::new("modify_twice");
    repo.commit_file(ALICE, T0, "a.txt", "one\n", "c1");
    repo.commit_file(ALICE, T0 + DAY, "a.txt", "two\n", "c2");
    repo.commit_file(ALICE, T0 + 2 * DAY, "a.txt", "three\n", "c3");

    let git = repo.open();
    let commits = git
        .select_commits(&WindowOptions::since(at(T0)))
        .expect("select");
    let diff = git.reduce_diff(&commits).expect("reduce");

    assert_eq!(diff.files.len(), 1);
    let file = &diff.files[0];
    assert_eq!(file.status, ChangeStatus::Modified);
    assert_eq!((file.insertions, file.deletions), (1, 1));

    let patch = diff.patch();
    assert!(patch.contains("-one"), "patch:\n{patch}");
    assert!(patch.contains("+three"), "patch:\n{patch}");
    assert!(!patch.contains("two"), "patch:\n{patch}");
    assert_eq!(patch.matches("@@ -").count(), 1);
}

#[test]
fn test_author_window_spans_intervening_commits() {
    // Bounds come from Alice's commits; Bob's change in between is part of
    // the net tree difference.
    let repo = TestGitRepo::new("author_span");
    let c1 = repo.commit_file(ALICE, T0, "a.txt", "1\n", "c1");
    repo.commit_file(BOB, T0 + DAY, "bob.txt", "b\n", "c2");
    let c3 = repo.commit_file(ALICE, T0 + 2 * DAY, "a.txt", "1\n2\n", "c3");
    repo.commit_file(BOB, T0 + 3 * DAY, "late.txt", "x\n", "c4");

    let git = repo.open();
    let commits = git
        .select_commits(&WindowOptions::since(at(T0)).by_author(ALICE.email))
        .expect("select");
    let diff = git.reduce_diff(&commits).expect("reduce");

    assert_eq!(diff.base.as_deref(), Some(c1.as_str()));
    assert_eq!(diff.target, c3);
    let paths: Vec<&str> = diff.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["a.txt", "bob.txt"]);
}

// ============================================================================
// Statistics and filtering
// ============================================================================

#[test]
fn test_per_file_statistics() {
    let repo = TestGitRepo::new("stats");
    repo.commit(
        ALICE,
        T0,
        "c1",
        &[
            Change::Write("keep.txt", "a\nb\nc\n"),
            Change::Write("gone.txt", "x\ny\n"),
        ],
    );
    repo.commit(
        ALICE,
        T0 + DAY,
        "c2",
        &[
            Change::Write("keep.txt", "a\nB\nc\nd\n"),
            Change::Remove("gone.txt"),
            Change::Write("new.txt", "n\n"),
        ],
    );

    let git = repo.open();
    let commits = git
        .select_commits(&WindowOptions::since(at(T0 + DAY)))
        .expect("select");
    let summary = git.reduce_diff(&commits).expect("reduce").summary();

    assert_eq!(summary.files_changed, 3);
    let stat = |path: &str| {
        summary
            .files
            .iter()
            .find(|f| f.path == path)
            .map(|f| (f.status, f.insertions, f.deletions))
            .expect("file in summary")
    };
    assert_eq!(stat("keep.txt"), (ChangeStatus::Modified, 2, 1));
    assert_eq!(stat("gone.txt"), (ChangeStatus::Deleted, 0, 2));
    assert_eq!(stat("new.txt"), (ChangeStatus::Added, 1, 0));
    assert_eq!(summary.insertions, 3);
    assert_eq!(summary.deletions, 3);
}

#[test]
fn test_lock_files_filtered_from_output() {
    let repo = TestGitRepo::new("lock_filter");
    repo.commit_file(ALICE, T0, "src/main.rs", "fn main() {}\n", "c1");
    repo.commit(
        ALICE,
        T0 + DAY,
        "c2",
        &[
            Change::Write("src/main.rs", "fn main() { run() }\n"),
            Change::Write("Cargo.lock", "# generated\n"),
            Change::Write("web/package-lock.json", "{}\n"),
        ],
    );

    let git = repo.open();
    let commits = git
        .select_commits(&WindowOptions::since(at(T0 + DAY)))
        .expect("select");
    let diff = git
        .reduce_diff(&commits)
        .expect("reduce")
        .without_excluded(&ExclusionFilter::lock_files().expect("built-in patterns"));

    let paths: Vec<&str> = diff.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["src/main.rs"]);
    assert!(!diff.patch().contains("Cargo.lock"));
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_compute_windowed_diff_is_idempotent() {
    let repo = TestGitRepo::new("idempotent");
    repo.commit_file(ALICE, T0, "a.txt", "1\n", "c1");
    repo.commit_file(BOB, T0 + DAY, "a.txt", "1\n2\n", "c2");
    repo.commit_file(ALICE, T0 + 2 * DAY, "b.txt", "3\n", "c3");

    let window = WindowOptions::since(at(T0));
    let first = compute_windowed_diff(&repo.source(), &window).expect("first");
    let second = compute_windowed_diff(&repo.source(), &window).expect("second");

    assert!(!first.is_empty());
    assert_eq!(first.patch(), second.patch());
    assert_eq!(first, second);
}

#[test]
fn test_compute_windowed_diff_empty_window() {
    let repo = TestGitRepo::new("windowed_empty");
    repo.commit_file(ALICE, T0, "a.txt", "1\n", "c1");

    let window = WindowOptions::since(at(T0 + DAY));
    let result = compute_windowed_diff(&repo.source(), &window);
    assert!(matches!(result, Err(GitError::EmptyRange)));
}

#[test]
fn test_compute_windowed_diff_unknown_branch() {
    let repo = TestGitRepo::new("windowed_branch");
    repo.commit_file(ALICE, T0, "a.txt", "1\n", "c1");

    let window = WindowOptions::since(at(T0)).on_branch("missing");
    let err = compute_windowed_diff(&repo.source(), &window).expect_err("unknown branch");
    assert_eq!(err.stage(), Stage::RangeSelection);
}
