// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for phrase boundary matching.
//!
//! A phrase must match itself standing alone, and must never match when it is
//! glued onto a longer name on either side.

#![no_main]

use arbitrary::Arbitrary;
use cranscope::search::matching::PhraseMatcher;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    phrase: String,
    glue: char,
}

fuzz_target!(|input: Input| {
    let phrase = input.phrase.trim().to_lowercase();
    let Ok(Some(matcher)) = PhraseMatcher::new(&phrase) else {
        return;
    };

    let standalone = format!("by {phrase} <x@example.org>");
    assert!(matcher.is_match(&standalone), "{phrase:?} missed itself");

    let starts_alnum = phrase.chars().next().is_some_and(char::is_alphanumeric);
    if input.glue.is_ascii_lowercase() && starts_alnum && !phrase.contains(input.glue) {
        let glued = format!("{}{phrase}", input.glue);
        assert!(!matcher.is_match(&glued), "{phrase:?} matched inside {glued:?}");
    }
});
