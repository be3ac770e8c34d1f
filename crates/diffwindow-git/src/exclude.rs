// Copyright (c) 2026 - present diffwindow contributors
// SPDX-License-Identifier: MIT

//! Path exclusion by regular expression
//!
//! Used to keep lock-file churn and similar noise out of diff output.

use regex::Regex;

use crate::error::GitError;

/// Patterns excluded when the caller configures none
pub const DEFAULT_EXCLUSIONS: &[&str] = &[r"(^|/)[^/]*-lock\.(json|yaml)$", r"\.lock$"];

/// An ordered set of compiled exclusion patterns
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    patterns: Vec<Regex>,
}

impl ExclusionFilter {
    /// Compile patterns in order
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidPattern` for the first pattern that fails to
    /// compile. A malformed rule is never treated as non-matching.
    pub fn new<I, S>(patterns: I) -> Result<Self, GitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|source| GitError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// The built-in lock-file exclusions
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidPattern` if a built-in pattern fails to
    /// compile; none is ever dropped silently.
    pub fn lock_files() -> Result<Self, GitError> {
        Self::new(DEFAULT_EXCLUSIONS)
    }

    /// Whether any pattern matches the path
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(path))
    }

    /// Number of patterns
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the filter has no patterns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The source text of each pattern, in order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }
}

/// Decide whether a single path is excluded by the given patterns
///
/// # Errors
///
/// Returns `GitError::InvalidPattern` if any pattern fails to compile.
/// Every pattern is compiled before matching, so a malformed pattern fails
/// even when an earlier one already matches the path.
pub fn is_path_excluded<S: AsRef<str>>(path: &str, patterns: &[S]) -> Result<bool, GitError> {
    Ok(ExclusionFilter::new(patterns)?.is_excluded(path))
}
