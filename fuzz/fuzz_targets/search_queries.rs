// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for keyword and author query handling.
//!
//! Arbitrary text goes straight into pattern construction, so regex
//! metacharacters, emoji and null bytes all have to come out as either a
//! candidate list or an empty one. Never a panic, never an error.

#![no_main]

use cranscope::testing::{make_author_record, make_record, oracle_with};
use cranscope::{AuthorEngine, KeywordEngine, KeywordOptions, PackageIndex};
use libfuzzer_sys::fuzz_target;
use std::sync::{Arc, OnceLock};

struct Engines {
    keyword: KeywordEngine,
    author: AuthorEngine,
}

fn engines() -> &'static Engines {
    static ENGINES: OnceLock<Engines> = OnceLock::new();
    ENGINES.get_or_init(|| {
        let index = Arc::new(PackageIndex::from_records(vec![
            make_record("zoo", "Irregular Time Series", "Ordered observations (Z's)"),
            make_record("cpp11", "A C++11 Interface for R's C Interface", "Header-only C++ bindings"),
            make_record("stringi", "Fast and Portable Character String Processing", "ICU: ünïcödé, 日本語"),
            make_author_record("dplyr", "Hadley Wickham [aut, cre]", "Hadley Wickham <hadley@posit.co>"),
            make_author_record("scMeta", "Meijun Chen [aut, cre]", "Meijun Chen <m@example.org>"),
            make_author_record("coauthr", "Chen, Jun and Li, Wei", "Wei Li <w@example.org>"),
        ]));
        let oracle = oracle_with(&[]);
        Engines {
            keyword: KeywordEngine::new(index.clone(), oracle.clone()),
            author: AuthorEngine::new(index, oracle),
        }
    })
}

fuzz_target!(|query: &[u8]| {
    let Ok(query) = std::str::from_utf8(query) else {
        return;
    };
    let engines = engines();

    for include_partial in [false, true] {
        let hits = engines
            .keyword
            .candidates(query, KeywordOptions { include_partial })
            .expect("keyword scan must not fail");
        // whole-word matches always come before partial ones
        let first_partial = hits.iter().position(|c| !c.is_exact_match).unwrap_or(hits.len());
        assert!(hits[first_partial..].iter().all(|c| !c.is_exact_match));
    }

    let hits = engines.author.candidates(query).expect("author scan must not fail");
    for hit in hits {
        assert!(hit.score > 0.0);
        assert!(!hit.match_reasons.is_empty());
    }
});
