// Copyright (c) 2026 - present diffwindow contributors
// SPDX-License-Identifier: MIT

//! Reduction of a commit window to a single unified diff

use git2::{Delta, DiffOptions, Oid, Patch, Tree};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commit::Commit;
use crate::error::GitError;
use crate::exclude::ExclusionFilter;
use crate::repo::GitRepo;

/// How a file changed between base and target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    /// File exists only in the target
    Added,
    /// File exists only in the base
    Deleted,
    /// Content changed
    Modified,
    /// Moved to a new path
    Renamed,
    /// Copied from another path
    Copied,
    /// Kind changed, e.g. file to symlink
    TypeChanged,
    /// Anything else git2 reports
    Unknown,
}

impl From<Delta> for ChangeStatus {
    fn from(delta: Delta) -> Self {
        match delta {
            Delta::Added => ChangeStatus::Added,
            Delta::Deleted => ChangeStatus::Deleted,
            Delta::Modified => ChangeStatus::Modified,
            Delta::Renamed => ChangeStatus::Renamed,
            Delta::Copied => ChangeStatus::Copied,
            Delta::Typechange => ChangeStatus::TypeChanged,
            _ => ChangeStatus::Unknown,
        }
    }
}

/// Changes to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    /// Path to the file (new path, or old path for deletions)
    pub path: String,
    /// Change status
    pub status: ChangeStatus,
    /// Number of lines added
    pub insertions: usize,
    /// Number of lines deleted
    pub deletions: usize,
    /// Unified diff text for this file, headers included
    #[serde(skip)]
    pub patch: String,
}

/// Aggregate statistics over a diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Number of files changed
    pub files_changed: usize,
    /// Total lines added
    pub insertions: usize,
    /// Total lines deleted
    pub deletions: usize,
    /// Per-file changes
    pub files: Vec<FileDiff>,
}

/// The net diff between a base and a target commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Commit whose tree is the base, `None` for the empty tree
    pub base: Option<String>,
    /// Commit whose tree is the target
    pub target: String,
    /// Per-file changes in diff order
    pub files: Vec<FileDiff>,
}

impl DiffResult {
    /// The full unified diff text
    #[must_use]
    pub fn patch(&self) -> String {
        self.files.iter().map(|f| f.patch.as_str()).collect()
    }

    /// Whether no file differs between base and target
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Aggregate line statistics
    #[must_use]
    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            files_changed: self.files.len(),
            insertions: self.files.iter().map(|f| f.insertions).sum(),
            deletions: self.files.iter().map(|f| f.deletions).sum(),
            files: self.files.clone(),
        }
    }

    /// Drop every file whose path the filter excludes
    #[must_use]
    pub fn without_excluded(mut self, filter: &ExclusionFilter) -> Self {
        self.files.retain(|f| !filter.is_excluded(&f.path));
        self
    }
}

impl GitRepo {
    /// Reduce a newest-first commit window to one diff
    ///
    /// With several commits the base is the oldest commit's tree and the
    /// target the newest commit's tree, so the result is the net effect of
    /// the window. A single commit is compared against its first parent, or
    /// against the empty tree when it is a root commit. The filters used to
    /// select the window play no part in choosing that parent.
    ///
    /// # Errors
    ///
    /// Returns `GitError::EmptyRange` for an empty window and
    /// `GitError::DiffComputation` if a tree cannot be resolved or diffed.
    pub fn reduce_diff(&self, commits: &[Commit]) -> Result<DiffResult, GitError> {
        let (Some(newest), Some(oldest)) = (commits.first(), commits.last()) else {
            return Err(GitError::EmptyRange);
        };

        let base = if newest.sha == oldest.sha {
            newest.first_parent()
        } else {
            Some(oldest.sha.as_str())
        };

        debug!(
            newest = newest.short_sha(),
            oldest = oldest.short_sha(),
            base = ?base,
            window = commits.len(),
            "Reducing commit window"
        );

        self.diff_commits(base, &newest.sha)
    }

    /// Diff the trees of two commits directly
    ///
    /// `base` of `None` diffs against the empty tree.
    ///
    /// # Errors
    ///
    /// Returns `GitError::DiffComputation` if a tree cannot be resolved or diffed.
    pub fn diff_commits(&self, base: Option<&str>, target: &str) -> Result<DiffResult, GitError> {
        let base_tree = base.map(|sha| self.commit_tree(sha)).transpose()?;
        let target_tree = self.commit_tree(target)?;
        let files = self.diff_trees(base_tree.as_ref(), &target_tree)?;

        Ok(DiffResult {
            base: base.map(str::to_string),
            target: target.to_string(),
            files,
        })
    }

    fn commit_tree(&self, sha: &str) -> Result<Tree<'_>, GitError> {
        let context = || format!("resolve tree of {sha}");
        let oid = Oid::from_str(sha).map_err(GitError::diff(context()))?;
        self.repo
            .find_commit(oid)
            .and_then(|c| c.tree())
            .map_err(GitError::diff(context()))
    }

    fn diff_trees(
        &self,
        base: Option<&Tree<'_>>,
        target: &Tree<'_>,
    ) -> Result<Vec<FileDiff>, GitError> {
        let mut opts = DiffOptions::new();
        opts.context_lines(3);

        let diff = self
            .repo
            .diff_tree_to_tree(base, Some(target), Some(&mut opts))
            .map_err(GitError::diff("tree-to-tree diff"))?;

        let mut files = Vec::with_capacity(diff.deltas().len());
        for (idx, delta) in diff.deltas().enumerate() {
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|| "<unknown>".to_string());
            let status = ChangeStatus::from(delta.status());

            let patch = Patch::from_diff(&diff, idx)
                .map_err(GitError::diff(format!("patch for {path}")))?;

            let (insertions, deletions, text) = match patch {
                Some(mut patch) => {
                    let (_, insertions, deletions) = patch
                        .line_stats()
                        .map_err(GitError::diff(format!("line stats for {path}")))?;
                    let buf = patch
                        .to_buf()
                        .map_err(GitError::diff(format!("render patch for {path}")))?;
                    (insertions, deletions, String::from_utf8_lossy(&buf).into_owned())
                }
                // Binary content has no line-level patch
                None => (
                    0,
                    0,
                    format!("diff --git a/{path} b/{path}\nBinary files differ\n"),
                ),
            };

            files.push(FileDiff {
                path,
                status,
                insertions,
                deletions,
                patch: text,
            });
        }

        Ok(files)
    }
}
