//! Structured question records produced by the parser and read by every sink.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter of a multiple-choice option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    /// Map an ASCII capital `A`–`D` to its label.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(OptionLabel::A),
            'B' => Some(OptionLabel::B),
            'C' => Some(OptionLabel::C),
            'D' => Some(OptionLabel::D),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            OptionLabel::A => 'A',
            OptionLabel::B => 'B',
            OptionLabel::C => 'C',
            OptionLabel::D => 'D',
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One answer choice. `text` is the whole line as generated, label included
/// (e.g. `"B. Mitochondria"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqOption {
    pub label: OptionLabel,
    pub text: String,
}

/// One generated question.
///
/// Created once from a single question block and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedQuestion {
    pub stem: String,
    /// Options in the order they appeared; not necessarily four.
    pub options: Vec<McqOption>,
    /// Canonical answer letter: first non-space character after `Answer:`.
    pub answer_label: Option<char>,
    /// The full `Answer: …` line, kept verbatim for display.
    pub answer_line: Option<String>,
    /// Bracketed annotation lines (`[Easy]`, `[Topic: Cells]`), one entry per line.
    pub tags: Vec<String>,
}
