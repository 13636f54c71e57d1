//! Web-form sink: a self-contained HTML quiz.
//!
//! One `<fieldset>` per question, one radio input per option, bracketed tags
//! as muted paragraphs under the options and a single submit button. The
//! answer line is deliberately not rendered; this is the version handed to
//! the people taking the quiz.

use crate::question::ParsedQuestion;
use std::fmt::Write;

const QUIZ_TITLE: &str = "MCQ Quiz";

/// Render the question set as an HTML document.
pub fn render_html(questions: &[ParsedQuestion]) -> String {
    let mut html = String::with_capacity(512 + questions.len() * 512);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{QUIZ_TITLE}</title>");
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>{QUIZ_TITLE}</h1>");
    html.push_str("<form>\n");

    for (i, q) in questions.iter().enumerate() {
        let idx = i + 1;
        html.push_str("<fieldset>\n");
        let _ = writeln!(
            html,
            "<legend><strong>Q{idx}. {}</strong></legend>",
            escape_html(&q.stem)
        );
        for opt in &q.options {
            let _ = writeln!(
                html,
                "<label><input type=\"radio\" name=\"q{idx}\" value=\"{}\"/> {}</label><br>",
                opt.label,
                escape_html(&opt.text)
            );
        }
        for tag in &q.tags {
            let _ = writeln!(html, "<p style=\"color:gray\">{}</p>", escape_html(tag));
        }
        html.push_str("</fieldset>\n<br>\n");
    }

    html.push_str("<input type=\"submit\" value=\"Submit\">\n</form>\n</body>\n</html>\n");
    html
}

/// Escape the five characters that are significant in HTML text and
/// attribute values.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
