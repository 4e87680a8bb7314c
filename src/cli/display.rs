// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the smilefuzz CLI.
//!
//! OneDark colors on a TTY, plain text everywhere else. `NO_COLOR` wins over
//! everything, so piping a replay summary into a file or CI log never leaves
//! escape codes behind.

use smilefuzz::corpus::Verdict;

// ═══════════════════════════════════════════════════════════════════════════
// COLORS
// ═══════════════════════════════════════════════════════════════════════════

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

/// OneDark palette: https://github.com/joshdick/onedark.vim
mod onedark {
    pub const RED: (u8, u8, u8) = (224, 108, 117); // #e06c75
    pub const GREEN: (u8, u8, u8) = (152, 195, 121); // #98c379
    pub const YELLOW: (u8, u8, u8) = (229, 192, 123); // #e5c07b
    pub const CYAN: (u8, u8, u8) = (86, 182, 194); // #56b6c2
    pub const GRAY: (u8, u8, u8) = (92, 99, 112); // #5c6370
    pub const MAGENTA: (u8, u8, u8) = (198, 120, 221); // #c678dd
}

fn rgb((r, g, b): (u8, u8, u8)) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

/// Check if colors should be used (TTY detection)
pub fn use_colors() -> bool {
    // Respect NO_COLOR standard
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

fn paint(color: (u8, u8, u8), bold: bool, text: &str) -> String {
    if !use_colors() {
        return text.to_string();
    }
    let weight = if bold { BOLD } else { "" };
    format!("{}{}{}{}", weight, rgb(color), text, RESET)
}

pub fn heading(text: &str) -> String {
    paint(onedark::CYAN, true, text)
}

pub fn dim(text: &str) -> String {
    paint(onedark::GRAY, false, text)
}

pub fn accent(text: &str) -> String {
    paint(onedark::MAGENTA, false, text)
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Color-coded verdict label.
pub fn verdict_badge(verdict: Verdict) -> String {
    let (label, color, bold) = match verdict {
        Verdict::Completed => ("[ OK ]", onedark::GREEN, false),
        Verdict::Rejected => ("[REJ ]", onedark::YELLOW, false),
        Verdict::Finding => ("[FIND]", onedark::RED, true),
        Verdict::Panic => ("[PANIC]", onedark::RED, true),
    };
    paint(color, bold, label)
}

/// Hex dump, 16 bytes per line, offset in the left column.
pub fn hex_dump(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return dim("(empty)");
    }
    let mut out = String::new();
    for (line, chunk) in bytes.chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        out.push_str(&format!("{}  {}\n", dim(&format!("{:06x}", line * 16)), hex.join(" ")));
    }
    out.pop();
    out
}
