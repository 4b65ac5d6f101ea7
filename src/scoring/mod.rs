// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and ranking: how search results get their numbers and their order.
//!
//! The key rule is that annual downloads dominate everything. Match weights
//! decide whether a package qualifies; downloads decide where it lands.

mod core;
pub mod ranking;

pub use core::*;
