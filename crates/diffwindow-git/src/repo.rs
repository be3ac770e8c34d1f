// Copyright (c) 2026 - present diffwindow contributors
// SPDX-License-Identifier: MIT

//! Read-only repository handle
//!
//! Wraps a `git2::Repository`. Range selection, diff reduction and
//! contributor aggregation are implemented on this type in their own modules.

use std::path::Path;

use git2::Repository;

use crate::error::GitError;

/// A git repository wrapper used for read-only history queries
pub struct GitRepo {
    pub(crate) repo: Repository,
}

impl GitRepo {
    /// Open a git repository at the given path
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryAccess` if the path is not a git repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|source| GitError::RepositoryAccess {
            location: path.display().to_string(),
            source,
        })?;
        Ok(Self { repo })
    }

    pub(crate) fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    /// Check if the repository is bare
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.repo.is_bare()
    }

    /// Get the repository path (the `.git` directory, or the root of a bare repo)
    #[must_use]
    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    /// Get the HEAD commit SHA
    ///
    /// # Errors
    ///
    /// Returns `GitError` if HEAD cannot be resolved.
    pub fn head_sha(&self) -> Result<String, GitError> {
        let head = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|_| GitError::ReferenceNotFound {
                branch: "HEAD".to_string(),
            })?;
        Ok(head.id().to_string())
    }
}

impl std::fmt::Debug for GitRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepo")
            .field("path", &self.repo.path())
            .finish()
    }
}
