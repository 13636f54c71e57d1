//! Result types of a PDF-to-MCQ run.

use crate::error::GenerationError;
use crate::question::ParsedQuestion;
use serde::{Deserialize, Serialize};

/// Everything one run produced.
///
/// A failed generation call still yields an `McqOutput`: `reply` then holds
/// the prefixed error message, `questions` is empty and `generation_error`
/// carries the structured cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McqOutput {
    /// Normalized document text (before prompt truncation).
    pub cleaned_text: String,
    /// Prompt that was sent to the generation service.
    pub prompt: String,
    /// Text shown to the user: generated questions or an error message.
    pub reply: String,
    /// Questions parsed from `reply`, in presentation order.
    pub questions: Vec<ParsedQuestion>,
    /// Set when the generation call failed.
    pub generation_error: Option<GenerationError>,
    pub stats: RunStats,
}

impl McqOutput {
    /// `true` when the generation service answered and its reply was parsed.
    pub fn is_success(&self) -> bool {
        self.generation_error.is_none()
    }
}

/// Counters and timings for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub pages_extracted: usize,
    pub raw_chars: usize,
    pub cleaned_chars: usize,
    pub prompt_chars: usize,
    pub questions_parsed: usize,
    pub extract_duration_ms: u64,
    pub generation_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Text extracted from a PDF, before normalization.
#[derive(Debug, Clone, Default)]
pub struct ExtractedText {
    /// Per-page text, each page followed by a newline.
    pub text: String,
    pub page_count: usize,
}
