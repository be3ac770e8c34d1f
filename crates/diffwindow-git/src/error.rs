// Copyright (c) 2026 - present diffwindow contributors
// SPDX-License-Identifier: MIT

//! Error types for diffwindow-git

use std::fmt;

use thiserror::Error;

/// The stage of a windowed-diff operation that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Cloning or opening the repository
    Checkout,
    /// Walking history and selecting the commit window
    RangeSelection,
    /// Reducing the window to a single diff
    DiffReduction,
    /// Compiling or applying path exclusion patterns
    Filtering,
    /// Aggregating contributors over all references
    Contributors,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Checkout => "checkout",
            Stage::RangeSelection => "range selection",
            Stage::DiffReduction => "diff reduction",
            Stage::Filtering => "filtering",
            Stage::Contributors => "contributors",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during git operations
#[derive(Debug, Error)]
pub enum GitError {
    /// The repository could not be cloned or opened
    #[error("Repository access failed for {location}: {source}")]
    RepositoryAccess {
        /// The location (URL or path) that was requested
        location: String,
        /// Underlying error from the clone or open
        #[source]
        source: git2::Error,
    },

    /// The scratch directory backing a working copy could not be prepared
    #[error("Failed to prepare working copy at {path}: {source}")]
    WorkingCopy {
        /// The scratch directory
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A branch name did not resolve to a commit
    #[error("Branch reference not found: {branch}")]
    ReferenceNotFound {
        /// The branch name that could not be resolved
        branch: String,
    },

    /// No commits matched the requested window
    #[error("No commits found in the requested window")]
    EmptyRange,

    /// History traversal failed while selecting or aggregating commits
    #[error("History traversal failed during {stage}: {source}")]
    HistoryTraversal {
        /// Which stage was walking history
        stage: Stage,
        /// Underlying error from the revision walker
        #[source]
        source: git2::Error,
    },

    /// A tree could not be resolved or the diff engine failed
    #[error("Diff computation failed ({context}): {source}")]
    DiffComputation {
        /// What was being resolved or computed
        context: String,
        /// Underlying error from git2
        #[source]
        source: git2::Error,
    },

    /// An exclusion pattern failed to compile
    #[error("Invalid exclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as supplied
        pattern: String,
        /// Underlying regex compile error
        #[source]
        source: regex::Error,
    },
}

impl GitError {
    /// The stage that produced this error
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            GitError::RepositoryAccess { .. } | GitError::WorkingCopy { .. } => Stage::Checkout,
            GitError::ReferenceNotFound { .. } => Stage::RangeSelection,
            GitError::EmptyRange | GitError::DiffComputation { .. } => Stage::DiffReduction,
            GitError::HistoryTraversal { stage, .. } => *stage,
            GitError::InvalidPattern { .. } => Stage::Filtering,
        }
    }

    /// Whether this error means "nothing matched" rather than "something broke"
    #[must_use]
    pub fn is_empty_range(&self) -> bool {
        matches!(self, GitError::EmptyRange)
    }

    pub(crate) fn traversal(stage: Stage) -> impl FnOnce(git2::Error) -> GitError {
        move |source| GitError::HistoryTraversal { stage, source }
    }

    pub(crate) fn diff(context: impl Into<String>) -> impl FnOnce(git2::Error) -> GitError {
        let context = context.into();
        move |source| GitError::DiffComputation { context, source }
    }
}
