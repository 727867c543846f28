#![no_main]

//! Fuzz target for FeedbackEntry::parse_line()
//!
//! Any line that parses must serialize back to itself.
//!
//! Run with: cargo +nightly fuzz run fuzz_parse_feedback_line

use archai_core::FeedbackEntry;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    if let Some(entry) = FeedbackEntry::parse_line(line) {
        let reparsed = FeedbackEntry::parse_line(&entry.to_line());
        assert_eq!(reparsed.as_ref(), Some(&entry));
    }
});
