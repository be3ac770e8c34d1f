#![no_main]

use diffwindow_git::{ExclusionFilter, GitError};
use libfuzzer_sys::fuzz_target;

// Input is "pattern\npath"; compiling must either succeed or fail with
// InvalidPattern, and matching must never panic.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (pattern, path) = text.split_once('\n').unwrap_or((text, ""));

    match ExclusionFilter::new([pattern]) {
        Ok(filter) => {
            let _ = filter.is_excluded(path);
        }
        Err(GitError::InvalidPattern { .. }) => {}
        Err(other) => panic!("unexpected error kind: {other}"),
    }
});
