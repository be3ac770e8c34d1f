#![no_main]

//! Fuzz target for window arithmetic
//!
//! Any `num_days` must yield a start no later than "now" or an
//! InvalidInput error, never a panic or overflow.

use chrono::{DateTime, Utc};
use libfuzzer_sys::fuzz_target;

use diffwindow_mcp::handlers::window_start;

fuzz_target!(|input: (i64, f64)| {
    let (seconds, days) = input;
    let Some(now) = DateTime::<Utc>::from_timestamp(seconds, 0) else {
        return;
    };
    if let Ok(start) = window_start(now, days) {
        assert!(start <= now);
    }
});
