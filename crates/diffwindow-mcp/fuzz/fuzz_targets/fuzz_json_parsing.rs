#![no_main]

//! Fuzz target for JSON parsing
//!
//! This target tests that arbitrary bytes never cause panics
//! when parsed as JSON for tool arguments.

use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

use diffwindow_mcp::handlers::{ContributorsInput, GitDiffInput};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _: Result<Value, _> = serde_json::from_str(s);

        // Try to parse as each input type
        let _: Result<GitDiffInput, _> = serde_json::from_str(s);
        let _: Result<ContributorsInput, _> = serde_json::from_str(s);

        let _: Result<Map<String, Value>, _> = serde_json::from_str(s);
    }

    // Raw bytes should fail gracefully
    let _: Result<Value, _> = serde_json::from_slice(data);
});
