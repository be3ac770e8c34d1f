//! Distinct author identities across all references

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commit::Commit;
use crate::error::{GitError, Stage};
use crate::repo::GitRepo;
use crate::window::CommitWalk;

/// An author identity, unique by email
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contributor {
    /// Display name as first observed
    pub name: String,
    /// Email address, the identity key
    pub email: String,
}

/// Deduplicate commit authors by email, sorted by email
///
/// The first name observed for an email is kept.
pub fn collect_contributors<'a, I>(commits: I) -> Vec<Contributor>
where
    I: IntoIterator<Item = &'a Commit>,
{
    let mut by_email: BTreeMap<&str, &str> = BTreeMap::new();
    for commit in commits {
        by_email
            .entry(commit.author_email.as_str())
            .or_insert(commit.author.as_str());
    }
    by_email
        .into_iter()
        .map(|(email, name)| Contributor {
            name: name.to_string(),
            email: email.to_string(),
        })
        .collect()
}

impl GitRepo {
    /// List every distinct author reachable from any reference
    ///
    /// # Errors
    ///
    /// Returns `GitError::HistoryTraversal` if history cannot be read.
    pub fn contributors(&self) -> Result<Vec<Contributor>, GitError> {
        let mut walk = CommitWalk::new(&self.repo, Stage::Contributors)?;
        walk.push_all_refs()?;
        // Detached HEAD is not under refs/
        if let Ok(head) = self.repo.head().and_then(|h| h.peel_to_commit()) {
            walk.push(head.id())?;
        }

        let commits = walk.collect::<Result<Vec<_>, _>>()?;
        let contributors = collect_contributors(&commits);

        debug!(
            commits = commits.len(),
            contributors = contributors.len(),
            "Aggregated contributors"
        );

        Ok(contributors)
    }
}
