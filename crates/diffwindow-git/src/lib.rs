// Copyright (c) 2026 - present diffwindow contributors
// SPDX-License-Identifier: MIT

//! diffwindow-git: time-windowed diffs over git history
//!
//! Selects the commits in a time window (optionally narrowed to a branch and
//! an author), reduces them to a single net diff, aggregates contributors,
//! and filters noisy paths out of the result.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use chrono::{Duration, Utc};
//! use diffwindow_git::{RepoSource, WindowOptions, compute_windowed_diff};
//!
//! let source = RepoSource::new("https://github.com/rust-lang/log.git");
//! let window = WindowOptions::since(Utc::now() - Duration::days(7)).on_branch("master");
//! let diff = compute_windowed_diff(&source, &window).expect("windowed diff");
//!
//! println!("{}", diff.patch());
//! ```

pub mod checkout;
pub mod commit;
pub mod contributors;
pub mod diff;
pub mod error;
pub mod exclude;
pub mod repo;
pub mod window;

pub use checkout::{RepoSource, WorkingCopy};
pub use commit::Commit;
pub use contributors::Contributor;
pub use diff::{ChangeStatus, DiffResult, DiffSummary, FileDiff};
pub use error::{GitError, Stage};
pub use exclude::{ExclusionFilter, is_path_excluded};
pub use repo::GitRepo;
pub use window::WindowOptions;

use tracing::info;

/// Clone `source`, select the commits in `window` and reduce them to one diff
///
/// The clone is removed before this returns, whatever the outcome.
///
/// # Errors
///
/// Returns `GitError::RepositoryAccess` if the clone fails,
/// `GitError::ReferenceNotFound` for an unknown branch,
/// `GitError::EmptyRange` when no commit falls in the window, and
/// `GitError::DiffComputation` if the diff cannot be produced.
pub fn compute_windowed_diff(
    source: &RepoSource,
    window: &WindowOptions,
) -> Result<DiffResult, GitError> {
    let checkout = WorkingCopy::checkout(source)?;
    let commits = checkout.repo().select_commits(window)?;
    let diff = checkout.repo().reduce_diff(&commits)?;

    info!(
        location = %source.location,
        commits = commits.len(),
        files = diff.files.len(),
        "Computed windowed diff"
    );

    Ok(diff)
}

/// Clone `source` and list every distinct author, sorted by email
///
/// # Errors
///
/// Returns `GitError::RepositoryAccess` if the clone fails and
/// `GitError::HistoryTraversal` if history cannot be read.
pub fn list_contributors(source: &RepoSource) -> Result<Vec<Contributor>, GitError> {
    let checkout = WorkingCopy::checkout(source)?;
    checkout.repo().contributors()
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::checkout::{RepoSource, WorkingCopy};
    pub use crate::commit::Commit;
    pub use crate::contributors::Contributor;
    pub use crate::diff::{DiffResult, DiffSummary};
    pub use crate::error::{GitError, Stage};
    pub use crate::exclude::ExclusionFilter;
    pub use crate::repo::GitRepo;
    pub use crate::window::WindowOptions;
}
