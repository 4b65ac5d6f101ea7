// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the snapshot loader.
//!
//! Whatever the bytes, parsing either fails cleanly or yields an index with
//! unique, sorted names.

#![no_main]

use cranscope::index::snapshot;
use cranscope::PackageIndex;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(parsed) = snapshot::parse(json) else {
        return;
    };

    let index = PackageIndex::from_records(parsed.records);
    let names: Vec<&str> = index.all().map(|r| r.name.as_str()).collect();
    assert!(names.windows(2).all(|w| w[0] < w[1]), "names not unique and sorted");
    for name in names {
        assert!(index.get(name).is_some());
    }
});
