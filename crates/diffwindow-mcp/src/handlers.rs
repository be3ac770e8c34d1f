//! Tool handlers for the MCP server
//!
//! This module implements the handlers for each MCP tool, bridging MCP
//! requests to windowed-diff operations and returning typed responses.
//! Handlers are synchronous; the server runs them on a blocking thread.

use std::num::NonZeroU32;

use chrono::{DateTime, TimeDelta, Utc};
use diffwindow_git::{
    Contributor, DiffSummary, ExclusionFilter, GitError, RepoSource, WindowOptions,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// Error Types
// ============================================================================

/// Handler errors
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Git operation failed
    #[error("Git operation failed during {stage}: {0}", stage = .0.stage())]
    Git(#[from] GitError),

    /// Invalid input - missing or malformed field
    #[error("Invalid input: {0}. Check the tool's required parameters.")]
    InvalidInput(String),

    /// No tool with this name is registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// JSON serialization error
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Settings
// ============================================================================

/// Server-wide settings applied to every tool call
#[derive(Debug, Clone, Default)]
pub struct ToolSettings {
    /// Paths dropped from diff output
    pub exclusions: ExclusionFilter,
    /// Clone depth when the call does not give one
    pub default_depth: Option<NonZeroU32>,
}

impl ToolSettings {
    fn source(&self, location: &str, depth: Option<u32>) -> RepoSource {
        let mut source = RepoSource::new(location);
        source.depth = depth.and_then(NonZeroU32::new).or(self.default_depth);
        source
    }
}

// ============================================================================
// Input Types
// ============================================================================

/// Input for the git_diff tool
#[derive(Debug, Clone, Deserialize)]
pub struct GitDiffInput {
    /// URL or path of the repository to clone
    pub repository_url: String,
    /// Size of the window in days; fractions allowed
    pub num_days: f64,
    /// Only include commits by this author email
    pub author_email: Option<String>,
    /// Branch to walk instead of the default HEAD
    pub branch: Option<String>,
    /// Clone depth (optional)
    pub depth: Option<u32>,
    /// Also return per-file statistics
    #[serde(default)]
    pub include_stats: bool,
}

/// Input for the git_contributors tool
#[derive(Debug, Clone, Deserialize)]
pub struct ContributorsInput {
    /// URL or path of the repository to clone
    pub repository_url: String,
    /// Clone depth (optional)
    pub depth: Option<u32>,
}

// ============================================================================
// Output Types
// ============================================================================

/// Response from the git_diff tool
#[derive(Debug, Clone, Serialize)]
pub struct GitDiffResponse {
    /// Start of the window
    pub since: DateTime<Utc>,
    /// Base commit, `None` for the empty tree or when nothing matched
    pub base: Option<String>,
    /// Target commit, `None` when no commit fell in the window
    pub target: Option<String>,
    /// Unified diff with excluded files removed
    pub diff: String,
    /// Per-file statistics (if requested)
    pub summary: Option<DiffSummary>,
    /// Number of changed files dropped by exclusion rules
    pub excluded_files: usize,
}

impl GitDiffResponse {
    /// Whether any commit fell inside the window
    #[must_use]
    pub fn has_commits(&self) -> bool {
        self.target.is_some()
    }

    /// Human-readable text for the tool result
    #[must_use]
    pub fn text(&self) -> String {
        if !self.has_commits() {
            return format!("No commits found since {}", self.since.to_rfc3339());
        }
        if self.diff.is_empty() {
            return format!(
                "No changes in the selected window ({} file(s) excluded)",
                self.excluded_files
            );
        }
        self.diff.clone()
    }
}

/// Response from the git_contributors tool
#[derive(Debug, Clone, Serialize)]
pub struct ContributorsResponse {
    /// Number of distinct contributors
    pub count: usize,
    /// Contributors sorted by email
    pub contributors: Vec<Contributor>,
}

// ============================================================================
// Handler Functions
// ============================================================================

/// Parse input from MCP arguments into a typed struct
pub fn parse_input<T: for<'de> Deserialize<'de>>(
    args: Option<Map<String, Value>>,
) -> Result<T, HandlerError> {
    let value = args
        .map(Value::Object)
        .unwrap_or(Value::Object(serde_json::Map::new()));
    serde_json::from_value(value).map_err(|e| HandlerError::InvalidInput(e.to_string()))
}

/// Treat blank optional strings as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Start of a window `num_days` before `now`
///
/// Windows too large to represent start at the earliest representable
/// instant.
///
/// # Errors
///
/// Returns `HandlerError::InvalidInput` for negative or non-finite values.
pub fn window_start(now: DateTime<Utc>, num_days: f64) -> Result<DateTime<Utc>, HandlerError> {
    if !num_days.is_finite() || num_days < 0.0 {
        return Err(HandlerError::InvalidInput(format!(
            "num_days must be a non-negative number of days, got {num_days}"
        )));
    }

    let seconds = (num_days * 86_400.0).round();
    let start = (seconds < i64::MAX as f64)
        .then(|| TimeDelta::try_seconds(seconds as i64))
        .flatten()
        .and_then(|delta| now.checked_sub_signed(delta))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    Ok(start)
}

/// Handle the git_diff tool
///
/// Clones the repository, reduces the window to one diff and removes
/// excluded files.
pub fn handle_git_diff(
    args: Option<Map<String, Value>>,
    settings: &ToolSettings,
) -> Result<GitDiffResponse, HandlerError> {
    handle_git_diff_at(args, settings, Utc::now())
}

/// Handle the git_diff tool with an explicit "now"
pub fn handle_git_diff_at(
    args: Option<Map<String, Value>>,
    settings: &ToolSettings,
    now: DateTime<Utc>,
) -> Result<GitDiffResponse, HandlerError> {
    let input: GitDiffInput = parse_input(args)?;

    if input.repository_url.trim().is_empty() {
        return Err(HandlerError::InvalidInput(
            "repository_url is required. Provide a clone URL or a local path.".to_string(),
        ));
    }

    let since = window_start(now, input.num_days)?;
    let mut window = WindowOptions::since(since);
    window.branch = non_blank(input.branch);
    window.author_email = non_blank(input.author_email);

    let source = settings.source(&input.repository_url, input.depth);
    debug!(?source, ?window, "Handling git_diff");

    let diff = match diffwindow_git::compute_windowed_diff(&source, &window) {
        Ok(diff) => diff,
        Err(GitError::EmptyRange) => {
            info!(location = %source.location, %since, "No commits in window");
            return Ok(GitDiffResponse {
                since,
                base: None,
                target: None,
                diff: String::new(),
                summary: None,
                excluded_files: 0,
            });
        }
        Err(e) => return Err(e.into()),
    };

    let changed = diff.files.len();
    let diff = diff.without_excluded(&settings.exclusions);
    let excluded_files = changed - diff.files.len();

    Ok(GitDiffResponse {
        since,
        base: diff.base.clone(),
        target: Some(diff.target.clone()),
        summary: input.include_stats.then(|| diff.summary()),
        diff: diff.patch(),
        excluded_files,
    })
}

/// Handle the git_contributors tool
///
/// Lists distinct authors across all references.
pub fn handle_contributors(
    args: Option<Map<String, Value>>,
    settings: &ToolSettings,
) -> Result<ContributorsResponse, HandlerError> {
    let input: ContributorsInput = parse_input(args)?;

    if input.repository_url.trim().is_empty() {
        return Err(HandlerError::InvalidInput(
            "repository_url is required. Provide a clone URL or a local path.".to_string(),
        ));
    }

    let source = settings.source(&input.repository_url, input.depth);
    let contributors = diffwindow_git::list_contributors(&source)?;

    Ok(ContributorsResponse {
        count: contributors.len(),
        contributors,
    })
}

// ============================================================================
// Tests
// ============================================================================
