// Copyright (c) 2026 - present diffwindow contributors
// SPDX-License-Identifier: MIT

//! Commit range selection
//!
//! Walks history newest-first from a branch head or `HEAD` and keeps the
//! commits that fall inside a time window, optionally narrowed to a single
//! author.

use chrono::{DateTime, Utc};
use git2::{BranchType, ErrorCode, Oid, Repository, Revwalk, Sort};
use tracing::debug;

use crate::commit::Commit;
use crate::error::{GitError, Stage};
use crate::repo::GitRepo;

/// Remote that a fresh clone tracks its branches under
const DEFAULT_REMOTE: &str = "origin";

/// Which commits belong to a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOptions {
    /// Only include commits authored at or after this instant
    pub since: DateTime<Utc>,
    /// Start from this branch head (defaults to HEAD)
    pub branch: Option<String>,
    /// Only include commits whose author email equals this exactly
    pub author_email: Option<String>,
}

impl WindowOptions {
    /// Create a window starting at `since` with no branch or author filter
    #[must_use]
    pub fn since(since: DateTime<Utc>) -> Self {
        Self {
            since,
            branch: None,
            author_email: None,
        }
    }

    /// Start traversal from the given branch
    #[must_use]
    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Only keep commits by the given author email
    #[must_use]
    pub fn by_author(mut self, email: impl Into<String>) -> Self {
        self.author_email = Some(email.into());
        self
    }

    /// Whether a commit satisfies the window predicate
    #[must_use]
    pub fn matches(&self, commit: &Commit) -> bool {
        commit.timestamp >= self.since
            && self
                .author_email
                .as_deref()
                .is_none_or(|email| commit.author_email == email)
    }
}

/// Lazy newest-first commit iterator over a prepared revision walk
pub struct CommitWalk<'repo> {
    repo: &'repo Repository,
    revwalk: Revwalk<'repo>,
    stage: Stage,
}

impl<'repo> CommitWalk<'repo> {
    pub(crate) fn new(repo: &'repo Repository, stage: Stage) -> Result<Self, GitError> {
        let mut revwalk = repo.revwalk().map_err(GitError::traversal(stage))?;
        revwalk
            .set_sorting(Sort::TIME | Sort::TOPOLOGICAL)
            .map_err(GitError::traversal(stage))?;
        Ok(Self {
            repo,
            revwalk,
            stage,
        })
    }

    pub(crate) fn push(&mut self, oid: Oid) -> Result<(), GitError> {
        self.revwalk
            .push(oid)
            .map_err(GitError::traversal(self.stage))
    }

    pub(crate) fn push_all_refs(&mut self) -> Result<(), GitError> {
        self.revwalk
            .push_glob("*")
            .map_err(GitError::traversal(self.stage))
    }
}

impl Iterator for CommitWalk<'_> {
    type Item = Result<Commit, GitError>;

    fn next(&mut self) -> Option<Self::Item> {
        let stage = self.stage;
        let oid = match self.revwalk.next()? {
            Ok(oid) => oid,
            Err(e) => return Some(Err(GitError::traversal(stage)(e))),
        };
        Some(
            self.repo
                .find_commit(oid)
                .map(|c| Commit::from_git2(&c))
                .map_err(GitError::traversal(stage)),
        )
    }
}

impl GitRepo {
    /// Resolve the commit traversal starts from
    ///
    /// A named branch is looked up locally first and then as a
    /// remote-tracking branch of `origin`, since a fresh clone only has its
    /// default branch checked out locally. `Ok(None)` means `HEAD` is unborn.
    ///
    /// # Errors
    ///
    /// Returns `GitError::ReferenceNotFound` if the branch does not resolve.
    pub fn resolve_start(&self, branch: Option<&str>) -> Result<Option<Oid>, GitError> {
        let Some(name) = branch else {
            return match self.repo.head() {
                Ok(head) => head
                    .peel_to_commit()
                    .map(|c| Some(c.id()))
                    .map_err(GitError::traversal(Stage::RangeSelection)),
                Err(e) if e.code() == ErrorCode::UnbornBranch => Ok(None),
                Err(e) => Err(GitError::traversal(Stage::RangeSelection)(e)),
            };
        };

        let remote_name = format!("{DEFAULT_REMOTE}/{name}");
        let branch_ref = self
            .repo
            .find_branch(name, BranchType::Local)
            .or_else(|_| self.repo.find_branch(&remote_name, BranchType::Remote))
            .map_err(|_| GitError::ReferenceNotFound {
                branch: name.to_string(),
            })?;

        let commit = branch_ref
            .get()
            .peel_to_commit()
            .map_err(|_| GitError::ReferenceNotFound {
                branch: name.to_string(),
            })?;
        Ok(Some(commit.id()))
    }

    /// Walk history newest-first from a branch head or `HEAD`
    ///
    /// # Errors
    ///
    /// Returns `GitError::ReferenceNotFound` for an unknown branch, or
    /// `GitError::HistoryTraversal` if the walker cannot be prepared.
    pub fn walk_from(&self, branch: Option<&str>) -> Result<CommitWalk<'_>, GitError> {
        let mut walk = CommitWalk::new(&self.repo, Stage::RangeSelection)?;
        if let Some(start) = self.resolve_start(branch)? {
            walk.push(start)?;
        }
        Ok(walk)
    }

    /// Select the commits inside a window, newest first
    ///
    /// Traversal continues past commits that fail the predicate, so an
    /// intervening commit by another author, or one with a skewed clock,
    /// does not truncate the window. An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns `GitError::ReferenceNotFound` for an unknown branch, or
    /// `GitError::HistoryTraversal` if history cannot be read.
    pub fn select_commits(&self, options: &WindowOptions) -> Result<Vec<Commit>, GitError> {
        let mut commits = Vec::new();
        let mut visited = 0usize;

        for commit in self.walk_from(options.branch.as_deref())? {
            let commit = commit?;
            visited += 1;
            if options.matches(&commit) {
                commits.push(commit);
            }
        }

        debug!(
            since = %options.since,
            branch = ?options.branch,
            author = ?options.author_email,
            visited,
            selected = commits.len(),
            "Selected commit window"
        );

        Ok(commits)
    }
}
