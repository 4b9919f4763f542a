// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn test_paint_examples_header() {
    let out = paint_examples("Examples:");
    assert_eq!(out, "\x1b[38;5;74mExamples:\x1b[0m");
}

#[test]
fn test_paint_examples_command_line() {
    let out = paint_examples("  readping flush    Replay everything");
    assert_eq!(out, "  \x1b[38;5;250mreadping flush\x1b[0m    Replay everything");
}

#[test]
fn test_paint_examples_plain_line_untouched() {
    assert_eq!(paint_examples("just text"), "just text");
}

#[test]
fn test_paint_examples_preserves_line_count() {
    let text = "Examples:\n  readping a    A\n  readping b    B";
    assert_eq!(paint_examples(text).lines().count(), 3);
}
