#![no_main]
use chanlog::normalize::{collapse_newlines, sanitize, truncate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let clean = sanitize(data);
    assert!(!clean.contains('\x1b'));
    assert!(!clean.chars().any(|c| c.is_ascii_control() && c != '\t' && c != '\n'));

    assert!(!collapse_newlines(&clean).contains('\n'));

    let cut = truncate(data, 16);
    assert!(cut.chars().count() <= 19);
});
