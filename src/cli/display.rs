// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the cranscope CLI.
//!
//! OneDark on dark terminals, One Light on light ones. `CRANSCOPE_THEME`
//! forces a theme, then `COLORFGBG` is consulted, then dark is assumed.
//! Colors are off when stdout is not a TTY or `NO_COLOR` is set.

use cranscope::{
    MatchReason, PopularityTier, RankRow, RankedPackage, SearchResultPage, TrendingEntry,
};
use std::sync::OnceLock;

/// Width between │ and │, excluding the border characters.
pub const BOX_WIDTH: usize = 80;

// ═══════════════════════════════════════════════════════════════════════════
// THEME DETECTION
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

static THEME: OnceLock<Theme> = OnceLock::new();

fn detect_theme() -> Theme {
    if let Ok(theme) = std::env::var("CRANSCOPE_THEME") {
        match theme.to_lowercase().as_str() {
            "light" | "l" => return Theme::Light,
            "dark" | "d" => return Theme::Dark,
            _ => {}
        }
    }

    // "fg;bg" where a bright background (7, 9-15) means light
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        if let Some(Ok(bg)) = colorfgbg.split(';').next_back().map(str::parse::<u8>) {
            if bg >= 7 && bg != 8 {
                return Theme::Light;
            }
        }
    }

    Theme::Dark
}

pub fn theme() -> Theme {
    *THEME.get_or_init(detect_theme)
}

// ═══════════════════════════════════════════════════════════════════════════
// PALETTES
// ═══════════════════════════════════════════════════════════════════════════

fn rgb(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

mod onedark {
    pub const GREEN: (u8, u8, u8) = (152, 195, 121);
    pub const YELLOW: (u8, u8, u8) = (229, 192, 123);
    pub const BLUE: (u8, u8, u8) = (97, 175, 239);
    pub const MAGENTA: (u8, u8, u8) = (198, 120, 221);
    pub const CYAN: (u8, u8, u8) = (86, 182, 194);
    pub const GRAY: (u8, u8, u8) = (92, 99, 112);
    pub const BRIGHT_GREEN: (u8, u8, u8) = (166, 226, 46);
}

mod onelight {
    pub const GREEN: (u8, u8, u8) = (80, 161, 79);
    pub const YELLOW: (u8, u8, u8) = (193, 132, 1);
    pub const BLUE: (u8, u8, u8) = (64, 120, 242);
    pub const MAGENTA: (u8, u8, u8) = (166, 38, 164);
    pub const CYAN: (u8, u8, u8) = (1, 132, 188);
    pub const GRAY: (u8, u8, u8) = (160, 161, 167);
    pub const BRIGHT_GREEN: (u8, u8, u8) = (68, 140, 39);
}

macro_rules! theme_color {
    ($name:ident) => {
        #[allow(non_snake_case)]
        pub fn $name() -> String {
            let (r, g, b) = match theme() {
                Theme::Dark => onedark::$name,
                Theme::Light => onelight::$name,
            };
            rgb(r, g, b)
        }
    };
}

theme_color!(GREEN);
theme_color!(YELLOW);
theme_color!(BLUE);
theme_color!(MAGENTA);
theme_color!(CYAN);
theme_color!(GRAY);
theme_color!(BRIGHT_GREEN);

// ═══════════════════════════════════════════════════════════════════════════
// CORE UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Apply a theme color with optional modifiers.
pub fn themed(color_fn: fn() -> String, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), color_fn(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Visible length, ignoring ANSI escapes.
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

pub fn pad_right(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visible))
    }
}

pub fn pad_left(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(width - visible), s)
    }
}

/// Cut plain text to `max` characters, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut cut: String = flat.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

/// │ content          │
pub fn row(content: &str) {
    let border = border_color();
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    println!("{}│{}{}{}{}│{}", border, reset(), content, " ".repeat(pad), border, reset());
}

/// ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    let border = border_color();
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!(
        "{}┌{}{}{}{}┐{}",
        border,
        reset(),
        label_part,
        border,
        "─".repeat(remaining),
        reset()
    );
}

/// └──────────────────┘
pub fn section_bot() {
    println!("{}└{}┘{}", border_color(), "─".repeat(BOX_WIDTH), reset());
}

fn border_color() -> String {
    if use_colors() {
        GRAY()
    } else {
        String::new()
    }
}

fn reset() -> &'static str {
    if use_colors() {
        RESET
    } else {
        ""
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// 1234567 -> "1.2M", 45300 -> "45.3k"
pub fn format_downloads(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

pub fn tier_badge(tier: PopularityTier) -> String {
    let color: fn() -> String = match tier {
        PopularityTier::Popular => BRIGHT_GREEN,
        PopularityTier::Moderate => GREEN,
        PopularityTier::Small => YELLOW,
        PopularityTier::Niche => GRAY,
    };
    themed(color, &[], tier.as_str())
}

pub fn reason_label(reason: MatchReason) -> String {
    let color: fn() -> String = match reason {
        MatchReason::Title => BRIGHT_GREEN,
        MatchReason::Description => CYAN,
        MatchReason::Partial => GRAY,
        MatchReason::Author => MAGENTA,
        MatchReason::Maintainer => BLUE,
    };
    themed(color, &[], reason.as_str())
}

fn result_line(rank: usize, result: &RankedPackage) -> String {
    let name = themed(CYAN, &[BOLD], &result.package);
    let downloads = themed(GREEN, &[], &format_downloads(result.yearly_downloads));
    let reasons: Vec<String> = result.match_reasons.iter().map(|r| reason_label(*r)).collect();
    format!(
        " {} {} {} {} {}",
        pad_left(&rank.to_string(), 3),
        pad_right(&name, 22),
        pad_left(&downloads, 8),
        pad_right(&tier_badge(result.popularity_tier), 9),
        reasons.join(", ")
    )
}

/// Render one result page as a boxed table.
pub fn print_page(heading: &str, page: &SearchResultPage) {
    section_top(heading);
    if page.results.is_empty() {
        row(&themed(GRAY, &[DIM], " no matches"));
    }
    for (i, result) in page.results.iter().enumerate() {
        row(&result_line(page.offset + i + 1, result));
        if !result.title.is_empty() {
            row(&format!("     {}", themed(GRAY, &[], &truncate(&result.title, BOX_WIDTH - 6))));
        }
    }
    let footer = if page.has_more {
        format!(
            " showing {}-{} of {} (next: --offset {})",
            page.offset + 1,
            page.next_offset(),
            page.total_results,
            page.next_offset()
        )
    } else {
        format!(" {} result(s)", page.total_results)
    };
    row(&themed(GRAY, &[DIM], &footer));
    section_bot();
}

/// Render rank estimates.
pub fn print_ranks(rows: &[RankRow]) {
    section_top("Rank estimates");
    for r in rows {
        let rank = r
            .estimate
            .rank
            .map(|n| format!("~#{n}"))
            .unwrap_or_else(|| "n/a".to_string());
        let pct = r
            .estimate
            .percentile
            .map(|p| format!("top {:.1}%", 100.0 - p))
            .unwrap_or_default();
        row(&format!(
            " {} {} {} {}",
            pad_right(&themed(CYAN, &[BOLD], &r.package), 22),
            pad_left(&format_downloads(r.estimate.downloads), 8),
            pad_left(&rank, 8),
            pct
        ));
    }
    section_bot();
}

/// Render trending packages, fastest growth first.
pub fn print_trending(rows: &[TrendingEntry]) {
    section_top("Trending packages");
    if rows.is_empty() {
        row(&themed(GRAY, &[DIM], " nothing grew past the threshold"));
    }
    for (i, r) in rows.iter().enumerate() {
        row(&format!(
            " {} {} {} {} {}",
            pad_left(&(i + 1).to_string(), 3),
            pad_right(&themed(CYAN, &[BOLD], &r.package), 22),
            pad_left(&format_downloads(r.previous_downloads), 8),
            pad_left(&format_downloads(r.recent_downloads), 8),
            themed(GREEN, &[], &format!("+{:.1}%", r.growth_rate))
        ));
    }
    if let Some(first) = rows.first() {
        row(&themed(GRAY, &[DIM], &format!(" {}", first.period)));
    }
    section_bot();
}
