//! Parsing: turn the model's reply into [`ParsedQuestion`] records.
//!
//! Parsing is permissive. The model is asked for a precise layout (see
//! [`crate::prompts`]) but does not always deliver it, so every line is
//! classified on its own and anything unrecognised is dropped. Nothing here
//! returns an error.
//!
//! Classification lives in exactly one place, [`classify_line`]; the export
//! sinks only ever see the structured records.

use crate::question::{McqOption, OptionLabel, ParsedQuestion};
use once_cell::sync::Lazy;
use regex::Regex;

/// What a single line of a question block is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// First line of a block.
    Stem,
    /// `A.` – `D.` followed by the option text.
    Option(OptionLabel),
    /// `Answer: X`, with the first non-space character after the colon.
    Answer(Option<char>),
    /// A line carrying bracketed metadata.
    Tag,
    /// Anything else; ignored.
    Unclassified,
}

static RE_OPTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-D])\.").unwrap());

const ANSWER_PREFIX: &str = "answer:";

/// Classify one trimmed line. `first` marks the first line of a block.
///
/// Precedence: stem, option, answer, tag. An option line that happens to
/// contain brackets is still an option.
pub fn classify_line(line: &str, first: bool) -> LineKind {
    if first {
        return LineKind::Stem;
    }
    if let Some(caps) = RE_OPTION.captures(line) {
        if let Some(label) = caps[1].chars().next().and_then(OptionLabel::from_char) {
            return LineKind::Option(label);
        }
    }
    if let Some(rest) = strip_answer_prefix(line) {
        return LineKind::Answer(rest.trim().chars().next());
    }
    if line.contains('[') && line.contains(']') {
        return LineKind::Tag;
    }
    LineKind::Unclassified
}

/// Case-insensitive `answer:` prefix strip.
fn strip_answer_prefix(line: &str) -> Option<&str> {
    let head = line.get(..ANSWER_PREFIX.len())?;
    if head.eq_ignore_ascii_case(ANSWER_PREFIX) {
        Some(&line[ANSWER_PREFIX.len()..])
    } else {
        None
    }
}

/// Split the reply into trimmed, non-empty question blocks.
///
/// A block boundary is an empty or whitespace-only line.
pub fn split_blocks(raw: &str) -> Vec<String> {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in unified.split('\n') {
        if line.trim().is_empty() {
            push_block(&mut blocks, &mut current);
        } else {
            current.push(line);
        }
    }
    push_block(&mut blocks, &mut current);
    blocks
}

fn push_block(blocks: &mut Vec<String>, lines: &mut Vec<&str>) {
    if !lines.is_empty() {
        blocks.push(lines.join("\n").trim().to_string());
        lines.clear();
    }
}

/// Parse a single block. Returns `None` if the block has no stem.
pub fn parse_block(block: &str) -> Option<ParsedQuestion> {
    let mut lines = block.lines().map(str::trim);
    let stem = lines.next().filter(|l| !l.is_empty())?;

    let mut question = ParsedQuestion {
        stem: stem.to_string(),
        ..Default::default()
    };

    for line in lines {
        match classify_line(line, false) {
            LineKind::Option(label) => question.options.push(McqOption {
                label,
                text: line.to_string(),
            }),
            LineKind::Answer(letter) => {
                if question.answer_line.is_none() {
                    question.answer_label = letter;
                    question.answer_line = Some(line.to_string());
                }
            }
            LineKind::Tag => question.tags.push(line.to_string()),
            LineKind::Stem | LineKind::Unclassified => {}
        }
    }

    Some(question)
}

/// Parse the whole reply into questions, in presentation order.
///
/// The result never holds more records than the reply has non-empty blocks.
pub fn parse(raw: &str) -> Vec<ParsedQuestion> {
    split_blocks(raw)
        .iter()
        .filter_map(|block| parse_block(block))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_line() {
        assert_eq!(classify_line("What is 2+2?", true), LineKind::Stem);
        assert_eq!(classify_line("A. four", false), LineKind::Option(OptionLabel::A));
        assert_eq!(classify_line("D.", false), LineKind::Option(OptionLabel::D));
        assert_eq!(classify_line("Answer: B", false), LineKind::Answer(Some('B')));
        assert_eq!(classify_line("ANSWER:   c) x", false), LineKind::Answer(Some('c')));
        assert_eq!(classify_line("Answer:", false), LineKind::Answer(None));
        assert_eq!(classify_line("[Medium] [Topic: Cells]", false), LineKind::Tag);
        assert_eq!(classify_line("E. five", false), LineKind::Unclassified);
        assert_eq!(classify_line("a. lower", false), LineKind::Unclassified);
        assert_eq!(classify_line("A) paren", false), LineKind::Unclassified);
        assert_eq!(classify_line("just text", false), LineKind::Unclassified);
    }

    #[test]
    fn test_option_wins_over_tag() {
        assert_eq!(
            classify_line("B. see [ref]", false),
            LineKind::Option(OptionLabel::B)
        );
    }

    #[test]
    fn test_answer_wins_over_tag() {
        assert_eq!(
            classify_line("Answer: A [Easy]", false),
            LineKind::Answer(Some('A'))
        );
    }

    #[test]
    fn test_reference_example() {
        let raw = "Q1 stem\nA. one\nB. two\nAnswer: B\n[Easy]\n\nQ2 stem\nC. x";
        let qs = parse(raw);
        assert_eq!(qs.len(), 2);

        assert_eq!(qs[0].stem, "Q1 stem");
        let labels: Vec<_> = qs[0].options.iter().map(|o| o.label).collect();
        assert_eq!(labels, vec![OptionLabel::A, OptionLabel::B]);
        assert_eq!(qs[0].options[1].text, "B. two");
        assert_eq!(qs[0].answer_label, Some('B'));
        assert_eq!(qs[0].answer_line.as_deref(), Some("Answer: B"));
        assert_eq!(qs[0].tags, vec!["[Easy]".to_string()]);

        assert_eq!(qs[1].stem, "Q2 stem");
        assert_eq!(qs[1].options.len(), 1);
        assert_eq!(qs[1].options[0].label, OptionLabel::C);
        assert_eq!(qs[1].answer_label, None);
        assert!(qs[1].answer_line.is_none());
        assert!(qs[1].tags.is_empty());
    }

    #[test]
    fn test_whitespace_only_line_separates_blocks() {
        let qs = parse("One\nA. a\n   \nTwo\nB. b");
        assert_eq!(qs.len(), 2);
        assert_eq!(qs[1].stem, "Two");
    }

    #[test]
    fn test_crlf_reply() {
        let qs = parse("One\r\nA. a\r\nAnswer: A\r\n\r\nTwo\r\n");
        assert_eq!(qs.len(), 2);
        assert_eq!(qs[0].answer_label, Some('A'));
        assert_eq!(qs[0].options[0].text, "A. a");
    }

    #[test]
    fn test_indented_lines_are_trimmed() {
        let qs = parse("  Stem  \n   A. left   \n\tAnswer: A");
        assert_eq!(qs[0].stem, "Stem");
        assert_eq!(qs[0].options[0].text, "A. left");
        assert_eq!(qs[0].answer_label, Some('A'));
    }

    #[test]
    fn test_first_answer_line_kept() {
        let qs = parse("Stem\nAnswer: C\nAnswer: D");
        assert_eq!(qs[0].answer_label, Some('C'));
        assert_eq!(qs[0].answer_line.as_deref(), Some("Answer: C"));
    }

    #[test]
    fn test_unclassified_lines_dropped() {
        let qs = parse("Stem\nnoise\nA. real\n1) bogus\nExplanation: because");
        assert_eq!(qs[0].options.len(), 1);
        assert!(qs[0].tags.is_empty());
        assert!(qs[0].answer_label.is_none());
    }

    #[test]
    fn test_more_than_four_options_kept_in_order() {
        let qs = parse("Stem\nD. d\nC. c\nB. b\nA. a\nA. again");
        let labels: String = qs[0].options.iter().map(|o| o.label.as_char()).collect();
        assert_eq!(labels, "DCBAA");
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n   \n\t\n").is_empty());
    }

    #[test]
    fn test_placeholder_reply_becomes_single_stem() {
        let qs = parse("⚠️ No output received.");
        assert_eq!(qs.len(), 1);
        assert!(qs[0].options.is_empty());
    }

    #[test]
    fn test_never_more_records_than_blocks() {
        let garbled = [
            "\u{0}\u{1}\n\n\n]]][[[\n\nAnswer:\n\n\nA.",
            "a\n \nb\n\t\nc\n\n\n\n",
            "Answer: \u{00e9}\n[\n]\n\n.",
            "💥\n\n💥💥\n  \n💥💥💥",
        ];
        for raw in garbled {
            let blocks = split_blocks(raw).len();
            let parsed = parse(raw);
            assert!(parsed.len() <= blocks, "{raw:?}");
            assert!(parsed.iter().all(|q| !q.stem.is_empty()));
        }
    }

    #[test]
    fn test_multibyte_line_shorter_than_prefix() {
        // `get` must not panic on a char boundary inside the prefix window.
        assert_eq!(classify_line("éé", false), LineKind::Unclassified);
        assert_eq!(classify_line("Answ€r: A", false), LineKind::Unclassified);
    }

    #[test]
    fn unicode_whitespace_line_separates_blocks() {
        for sep in ["\u{a0}", " \u{2003}\t", "\u{3000}"] {
            let raw = format!("Q1\nA. a\n{sep}\nQ2\nB. b");
            let qs = parse(&raw);
            assert_eq!(qs.len(), 2, "separator {sep:?}");
            assert_eq!(qs[1].stem, "Q2");
            assert_eq!(qs[1].options.len(), 1);
        }
    }
}
