//! Word-processor sink: a DOCX document built with docx-rs.
//!
//! Stems form one decimal numbered list, so Word renumbers them when
//! questions are reordered. Options are indented paragraphs, the answer
//! line is italic and tags are plain paragraphs. An empty paragraph closes
//! every question block.

use crate::config::ExportFormat;
use crate::error::Pdf2McqError;
use crate::question::ParsedQuestion;
use docx_rs::{
    AbstractNumbering, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat, Numbering,
    NumberingId, Paragraph, Run, SpecialIndentType, Start, Style, StyleType,
};
use std::io::Cursor;

/// Heading at the top of the document.
pub const DOCUMENT_HEADING: &str = "Generated MCQs";

const TITLE_STYLE_ID: &str = "Title";
const STEM_NUMBERING_ID: usize = 1;
/// 20pt in twentieths of a point.
const OPTION_INDENT_TWIPS: i32 = 400;

/// Build the in-memory document.
pub fn build_docx(questions: &[ParsedQuestion]) -> Docx {
    let mut docx = Docx::new()
        .add_style(
            Style::new(TITLE_STYLE_ID, StyleType::Paragraph)
                .name("Title")
                .size(52)
                .bold(),
        )
        .add_abstract_numbering(
            AbstractNumbering::new(STEM_NUMBERING_ID).add_level(
                Level::new(
                    0,
                    Start::new(1),
                    NumberFormat::new("decimal"),
                    LevelText::new("%1."),
                    LevelJc::new("left"),
                )
                .indent(Some(420), Some(SpecialIndentType::Hanging(420)), None, None),
            ),
        )
        .add_numbering(Numbering::new(STEM_NUMBERING_ID, STEM_NUMBERING_ID))
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(DOCUMENT_HEADING))
                .style(TITLE_STYLE_ID),
        );

    for q in questions {
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(&q.stem))
                .numbering(NumberingId::new(STEM_NUMBERING_ID), IndentLevel::new(0)),
        );
        for opt in &q.options {
            docx = docx.add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(&opt.text))
                    .indent(Some(OPTION_INDENT_TWIPS), None, None, None),
            );
        }
        if let Some(ref answer) = q.answer_line {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(answer).italic()));
        }
        for tag in &q.tags {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(tag)));
        }
        docx = docx.add_paragraph(Paragraph::new());
    }

    docx
}

/// Render the question set as DOCX bytes.
pub fn render_docx(questions: &[ParsedQuestion]) -> Result<Vec<u8>, Pdf2McqError> {
    let mut cursor = Cursor::new(Vec::new());
    build_docx(questions)
        .build()
        .pack(&mut cursor)
        .map_err(|e| Pdf2McqError::ExportFailed {
            format: ExportFormat::Docx,
            detail: e.to_string(),
        })?;
    Ok(cursor.into_inner())
}
