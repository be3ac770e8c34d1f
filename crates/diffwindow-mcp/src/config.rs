//! Configuration for the diffwindow-mcp server
//!
//! This module provides the command-line configuration: path exclusion
//! rules, default clone depth and logging options.

use std::num::NonZeroU32;

use clap::Parser;
use diffwindow_git::exclude::DEFAULT_EXCLUSIONS;
use diffwindow_git::{ExclusionFilter, GitError};

use crate::handlers::ToolSettings;

/// Diffwindow MCP Server - time-windowed git diffs for AI assistants
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "diffwindow-mcp")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Regular expression for paths to drop from diff output
    ///
    /// May be repeated. The environment variable takes one pattern per
    /// line, since commas are regex syntax. Applied in addition to the
    /// built-in lock-file rules.
    #[arg(short = 'x', long = "exclude", env = "DIFFWINDOW_EXCLUDE", value_delimiter = '\n')]
    pub exclude: Vec<String>,

    /// Do not apply the built-in lock-file exclusions
    #[arg(long, default_value = "false")]
    pub no_default_excludes: bool,

    /// Default clone depth used when a tool call does not give one
    ///
    /// Omit for full history. Shallow clones only work over network
    /// transports.
    #[arg(short, long, env = "DIFFWINDOW_DEPTH")]
    pub depth: Option<NonZeroU32>,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr to avoid interfering with MCP stdio
    /// transport.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Config {
    /// All exclusion patterns in evaluation order: built-ins first
    #[must_use]
    pub fn exclusion_patterns(&self) -> Vec<String> {
        let defaults = if self.no_default_excludes {
            &[][..]
        } else {
            DEFAULT_EXCLUSIONS
        };
        defaults
            .iter()
            .map(|p| (*p).to_string())
            .chain(self.exclude.iter().cloned())
            .collect()
    }

    /// Compile the exclusion patterns
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidExclusion` for the first malformed pattern.
    pub fn exclusion_filter(&self) -> Result<ExclusionFilter, ConfigError> {
        Ok(ExclusionFilter::new(self.exclusion_patterns())?)
    }

    /// Validate the configuration
    ///
    /// Malformed exclusion rules fail here, at startup, rather than on the
    /// first tool call.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidExclusion` if a pattern does not compile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.exclusion_filter().map(|_| ())
    }

    /// Build the settings shared by every tool invocation
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidExclusion` if a pattern does not compile.
    pub fn tool_settings(&self) -> Result<ToolSettings, ConfigError> {
        Ok(ToolSettings {
            exclusions: self.exclusion_filter()?,
            default_depth: self.depth,
        })
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An exclusion pattern failed to compile
    #[error("Invalid exclusion rule: {0}")]
    InvalidExclusion(#[from] GitError),
}
