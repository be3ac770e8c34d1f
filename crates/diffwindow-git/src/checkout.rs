// Copyright (c) 2026 - present diffwindow contributors
// SPDX-License-Identifier: MIT

//! Scoped working copies
//!
//! Every operation clones its source into a private scratch directory that
//! is removed when the [`WorkingCopy`] is dropped, on success and on every
//! error path alike.

use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use git2::FetchOptions;
use git2::build::RepoBuilder;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::GitError;
use crate::repo::GitRepo;

/// Where to clone a repository from, and how much history to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSource {
    /// URL or local path accepted by git
    pub location: String,
    /// Fetch at most this many commits of history (`None` for all)
    pub depth: Option<NonZeroU32>,
}

impl RepoSource {
    /// A source with full history
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            depth: None,
        }
    }

    /// Bound the clone depth; zero means unbounded
    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = NonZeroU32::new(depth);
        self
    }
}

/// A uniquely named directory under the system temp dir, removed on drop
#[derive(Debug)]
struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    fn create() -> Result<Self, GitError> {
        let path = std::env::temp_dir().join(format!("diffwindow-{}", Uuid::new_v4()));
        fs::create_dir_all(&path).map_err(|source| GitError::WorkingCopy {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { path })
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to remove working copy");
        } else {
            debug!(path = %self.path.display(), "Removed working copy");
        }
    }
}

/// A bare clone that lives exactly as long as this value
#[derive(Debug)]
pub struct WorkingCopy {
    // Declared before `dir` so the repository closes before the directory goes
    repo: GitRepo,
    dir: ScratchDir,
}

impl WorkingCopy {
    /// Clone `source` into a fresh scratch directory
    ///
    /// Shallow clones (`depth`) need a network transport; libgit2 rejects
    /// them for local paths.
    ///
    /// # Errors
    ///
    /// Returns `GitError::WorkingCopy` if the scratch directory cannot be
    /// created and `GitError::RepositoryAccess` if the clone fails. The
    /// scratch directory is removed in both cases.
    pub fn checkout(source: &RepoSource) -> Result<Self, GitError> {
        let dir = ScratchDir::create()?;

        let mut fetch = FetchOptions::new();
        if let Some(depth) = source.depth {
            fetch.depth(i32::try_from(depth.get()).unwrap_or(i32::MAX));
        }

        info!(
            location = %source.location,
            depth = ?source.depth,
            path = %dir.path.display(),
            "Cloning repository"
        );

        let repo = RepoBuilder::new()
            .bare(true)
            .fetch_options(fetch)
            .clone(&source.location, &dir.path)
            .map_err(|source_err| GitError::RepositoryAccess {
                location: source.location.clone(),
                source: source_err,
            })?;

        Ok(Self {
            repo: GitRepo::from_repository(repo),
            dir,
        })
    }

    /// The cloned repository
    #[must_use]
    pub fn repo(&self) -> &GitRepo {
        &self.repo
    }

    /// The scratch directory holding the clone
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir.path
    }
}
