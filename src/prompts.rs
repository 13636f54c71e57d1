//! Prompt template for question generation.
//!
//! The field formats spelled out here (lettered options, bracketed tags, the
//! `Answer:` line, blank-line separation) are exactly what
//! [`crate::pipeline::parse`] accepts. Change one and you must change the
//! other.

/// Instruction template. `{count}` and `{content}` are substituted by
/// [`build_prompt`].
pub const MCQ_PROMPT_TEMPLATE: &str = r#"
You are a smart question paper generator bot.
Generate {count} well-formatted multiple choice questions (MCQs) from the following content.
- Each question should have 4 options labeled A, B, C, D.
- Add a difficulty level tag at the end: [Easy], [Medium], or [Hard]
- Add a topic tag if identifiable, format: [Topic: <topic_name>]
- Clearly mark the correct answer using this format: "Answer: <option letter>"
- Separate each question with a blank line.

Content:
{content}
"#;

/// Build the completion prompt for `question_count` questions.
///
/// Only the first `char_limit` characters of `cleaned` are embedded.
pub fn build_prompt(cleaned: &str, question_count: u8, char_limit: usize) -> String {
    let content = truncate_chars(cleaned, char_limit);
    MCQ_PROMPT_TEMPLATE
        .replace("{count}", &question_count.to_string())
        .replace("{content}", content)
}

/// Slice `text` to at most `limit` characters without splitting a code point.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
