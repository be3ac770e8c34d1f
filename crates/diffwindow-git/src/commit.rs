//! Commit snapshots read out of a repository

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A read-only view of a git commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// The commit SHA (40 hex characters)
    pub sha: String,
    /// Commit message
    pub message: String,
    /// Author name
    pub author: String,
    /// Author email
    pub author_email: String,
    /// Authoring timestamp
    pub timestamp: DateTime<Utc>,
    /// Parent commit SHAs, first parent first
    pub parents: Vec<String>,
    /// SHA of the root tree
    pub tree: String,
}

impl Commit {
    /// Build a snapshot from a git2 commit
    ///
    /// Authors with non-UTF-8 names fall back to "Unknown"; out-of-range
    /// timestamps fall back to the Unix epoch.
    #[must_use]
    pub fn from_git2(git_commit: &git2::Commit<'_>) -> Self {
        let author = git_commit.author();
        let timestamp =
            DateTime::from_timestamp(author.when().seconds(), 0).unwrap_or(DateTime::UNIX_EPOCH);

        Self {
            sha: git_commit.id().to_string(),
            message: git_commit.message().unwrap_or("").to_string(),
            author: author.name().unwrap_or("Unknown").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            timestamp,
            parents: git_commit.parent_ids().map(|id| id.to_string()).collect(),
            tree: git_commit.tree_id().to_string(),
        }
    }

    /// Get the short SHA (first 7 characters)
    #[must_use]
    pub fn short_sha(&self) -> &str {
        &self.sha[..7.min(self.sha.len())]
    }

    /// Check if this is a root commit (has no parents)
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// The first parent, if any
    #[must_use]
    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }

    /// Get the first line of the commit message (subject)
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use similar_asserts::assert_eq;

    fn sample_commit() -> Commit {
        Commit {
            sha: "1945ab9c752534e733c38ba0109dc3b741f0a6eb".to_string(),
            message: "feat: window selection\n\nDetailed description here.".to_string(),
            author: "Test Author".to_string(),
            author_email: "test@example.com".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 1, 17, 2, 33, 6).unwrap(),
            parents: vec!["c460aeb7fb2d109c17e43de0ce681faec0b7374d".to_string()],
            tree: "4b825dc642cb6eb9a060e54bf8d69288fbee4904".to_string(),
        }
    }

    #[test]
    fn test_commit_serialization_roundtrip() {
        let commit = sample_commit();
        let json = serde_json::to_string(&commit).expect("serialize");
        let deserialized: Commit = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(commit, deserialized);
    }

    #[test]
    fn test_short_sha() {
        let commit = sample_commit();
        assert_eq!(commit.short_sha(), "1945ab9");
    }

    #[test]
    fn test_short_sha_handles_short_input() {
        let mut commit = sample_commit();
        commit.sha = "abc".to_string();
        assert_eq!(commit.short_sha(), "abc");
    }

    #[test]
    fn test_root_and_first_parent() {
        let mut commit = sample_commit();
        assert!(!commit.is_root());
        assert_eq!(
            commit.first_parent(),
            Some("c460aeb7fb2d109c17e43de0ce681faec0b7374d")
        );

        commit.parents.clear();
        assert!(commit.is_root());
        assert_eq!(commit.first_parent(), None);
    }

    #[test]
    fn test_subject() {
        let mut commit = sample_commit();
        assert_eq!(commit.subject(), "feat: window selection");

        commit.message = String::new();
        assert_eq!(commit.subject(), "");
    }
}
