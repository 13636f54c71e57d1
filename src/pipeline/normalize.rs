//! Normalization: deterministic cleanup of text extracted from a PDF.
//!
//! pdfium returns the text layer more or less as laid out on the page:
//! runs of empty lines between paragraphs, running footers such as `Page 3`
//! or a bare `12`, bullet glyphs, and spaces used for justification. None of
//! that helps the model and all of it eats into the prompt budget.
//!
//! ## Rule Order
//!
//! Rules run in a fixed order; each consumes the previous rule's output.
//! Footer detection works on trimmed lines, so trimming comes first, and the
//! space collapse runs last because nothing after it can reintroduce runs.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all normalization rules to raw extracted text.
///
/// Rules (applied in order):
/// 1. Collapse runs of 2+ newlines into one
/// 2. Trim every line and drop the empty ones
/// 3. Drop page/chapter footer lines (`Page 12`, `chapter 3`, `7`)
/// 4. Rejoin with single newlines
/// 5. Replace `•` bullets with `-`
/// 6. Collapse runs of 2+ spaces into one
///
/// Empty input gives empty output. Idempotent.
pub fn normalize(input: &str) -> String {
    let s = collapse_newline_runs(input);
    let lines = trimmed_lines(&s);
    let lines = drop_footer_lines(lines);
    let s = lines.join("\n");
    let s = normalise_bullets(&s);
    collapse_spaces(&s)
}

// ── Rule 1: Collapse newline runs ────────────────────────────────────────────

static RE_NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

fn collapse_newline_runs(input: &str) -> String {
    RE_NEWLINE_RUN.replace_all(input, "\n").into_owned()
}

// ── Rule 2: Trim lines, drop empties ─────────────────────────────────────────

fn trimmed_lines(input: &str) -> Vec<&str> {
    input
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

// ── Rule 3: Drop page/chapter footers ────────────────────────────────────────

static RE_FOOTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:page|chapter)?\s*\d{1,3}$").unwrap());

fn is_footer_line(line: &str) -> bool {
    RE_FOOTER.is_match(line)
}

fn drop_footer_lines(lines: Vec<&str>) -> Vec<&str> {
    lines.into_iter().filter(|line| !is_footer_line(line)).collect()
}

// ── Rule 5: Bullets ──────────────────────────────────────────────────────────

fn normalise_bullets(input: &str) -> String {
    input.replace('•', "-")
}

// ── Rule 6: Collapse spaces ──────────────────────────────────────────────────

static RE_SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

fn collapse_spaces(input: &str) -> String {
    RE_SPACE_RUN.replace_all(input, " ").into_owned()
}

// ── Tests ────────────────────────────────────────────────────────────────────
