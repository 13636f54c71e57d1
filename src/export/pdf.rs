//! Print-document sink: an A4 PDF laid out with the standard Helvetica faces.
//!
//! The layout is a single flowing frame inside fixed margins. Each question
//! is a bold stem, indented options, an oblique answer line and small gray
//! tags, followed by a fixed spacer. A page break follows every fifth
//! question. Text is word-wrapped using the standard Helvetica advance
//! widths, measured on the WinAnsi bytes that are actually drawn.

use crate::config::ExportFormat;
use crate::error::Pdf2McqError;
use crate::question::ParsedQuestion;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

/// A4 in points.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
/// Same margin on all four sides.
pub const MARGIN: f32 = 40.0;
/// Questions per page before a forced break.
pub const QUESTIONS_PER_PAGE: usize = 5;

const LEADING_FACTOR: f32 = 1.2;
const QUESTION_SPACER: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
    Oblique,
}

impl Face {
    fn resource_name(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
            Face::Oblique => "F3",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Face::Regular => "Helvetica",
            Face::Bold => "Helvetica-Bold",
            Face::Oblique => "Helvetica-Oblique",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    face: Face,
    size: f32,
    rgb: [f32; 3],
    indent: f32,
    space_before: f32,
    space_after: f32,
}

const STEM_STYLE: TextStyle = TextStyle {
    face: Face::Bold,
    size: 12.0,
    rgb: [0.0, 0.0, 0.545],
    indent: 0.0,
    space_before: 0.0,
    space_after: 6.0,
};

const OPTION_STYLE: TextStyle = TextStyle {
    face: Face::Regular,
    size: 11.0,
    rgb: [0.0, 0.0, 0.0],
    indent: 20.0,
    space_before: 0.0,
    space_after: 2.0,
};

const ANSWER_STYLE: TextStyle = TextStyle {
    face: Face::Oblique,
    size: 11.0,
    rgb: [0.0, 0.5, 0.0],
    indent: 0.0,
    space_before: 4.0,
    space_after: 10.0,
};

const TAG_STYLE: TextStyle = TextStyle {
    face: Face::Regular,
    size: 9.0,
    rgb: [0.5, 0.5, 0.5],
    indent: 0.0,
    space_before: 0.0,
    space_after: 10.0,
};

/// Render the question set as PDF bytes.
///
/// An empty set yields a valid single blank page.
pub fn render_pdf(questions: &[ParsedQuestion]) -> Result<Vec<u8>, Pdf2McqError> {
    let mut layout = Layout::new();

    for (i, q) in questions.iter().enumerate() {
        let idx = i + 1;
        layout.paragraph(&format!("{idx}. {}", q.stem), &STEM_STYLE);
        for opt in &q.options {
            layout.paragraph(&opt.text, &OPTION_STYLE);
        }
        if let Some(ref answer) = q.answer_line {
            layout.paragraph(answer, &ANSWER_STYLE);
        }
        for tag in &q.tags {
            layout.paragraph(tag, &TAG_STYLE);
        }
        layout.spacer(QUESTION_SPACER);
        if idx % QUESTIONS_PER_PAGE == 0 && idx < questions.len() {
            layout.page_break();
        }
    }

    let pages = layout.finish();
    debug!("PDF layout: {} questions on {} pages", questions.len(), pages.len());
    assemble(pages).map_err(|e| Pdf2McqError::ExportFailed {
        format: ExportFormat::Pdf,
        detail: e.to_string(),
    })
}

// ── Layout ───────────────────────────────────────────────────────────────────

/// Flows paragraphs top to bottom, opening a new page when the frame is full.
struct Layout {
    done: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    /// Distance from the page bottom to the top of the next line.
    cursor_y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            done: Vec::new(),
            current: Vec::new(),
            cursor_y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn at_top(&self) -> bool {
        self.cursor_y >= PAGE_HEIGHT - MARGIN
    }

    fn page_break(&mut self) {
        self.done.push(std::mem::take(&mut self.current));
        self.cursor_y = PAGE_HEIGHT - MARGIN;
    }

    fn spacer(&mut self, height: f32) {
        self.cursor_y -= height;
    }

    fn paragraph(&mut self, text: &str, style: &TextStyle) {
        if !self.at_top() {
            self.cursor_y -= style.space_before;
        }
        let leading = style.size * LEADING_FACTOR;
        let max_width = PAGE_WIDTH - 2.0 * MARGIN - style.indent;

        for line in wrap_text(text, style.face, style.size, max_width) {
            if self.cursor_y - leading < MARGIN {
                self.page_break();
            }
            let baseline = self.cursor_y - style.size;
            self.current.extend(text_ops(&line, style, MARGIN + style.indent, baseline));
            self.cursor_y -= leading;
        }
        self.cursor_y -= style.space_after;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.done.is_empty() {
            self.done.push(self.current);
        }
        self.done
    }
}

fn text_ops(line: &str, style: &TextStyle, x: f32, y: f32) -> Vec<Operation> {
    let [r, g, b] = style.rgb;
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![style.face.resource_name().into(), style.size.into()]),
        Operation::new("rg", vec![r.into(), g.into(), b.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(line))]),
        Operation::new("ET", vec![]),
    ]
}

// ── Text metrics ─────────────────────────────────────────────────────────────

/// Helvetica advance widths for WinAnsi 0x20..=0x7E, in 1/1000 em (AFM).
/// Helvetica-Oblique shares these metrics.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p'..'~'
];

/// Helvetica-Bold advance widths for WinAnsi 0x20..=0x7E, in 1/1000 em (AFM).
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,      // 'p'..'~'
];

/// Width charged for bytes outside printable ASCII. No WinAnsi glyph in the
/// standard faces is wider than one em.
const UPPER_BYTE_WIDTH: u16 = 1000;

/// Advance width of one encoded byte, in 1/1000 em.
fn glyph_width(byte: u8, face: Face) -> u16 {
    let table = match face {
        Face::Bold => &HELVETICA_BOLD_WIDTHS,
        Face::Regular | Face::Oblique => &HELVETICA_WIDTHS,
    };
    match byte {
        0x20..=0x7E => table[usize::from(byte - 0x20)],
        _ => UPPER_BYTE_WIDTH,
    }
}

/// Width of `text` in points, measured on the bytes actually drawn.
fn text_width(text: &str, face: Face, size: f32) -> f32 {
    let units: u32 = encode_win_ansi(text)
        .into_iter()
        .map(|b| u32::from(glyph_width(b, face)))
        .sum();
    units as f32 / 1000.0 * size
}

/// Greedy word wrap. Words wider than the frame are split by character.
fn wrap_text(text: &str, face: Face, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if text_width(&candidate, face, size) <= max_width {
            line = candidate;
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        for c in word.chars() {
            line.push(c);
            if text_width(&line, face, size) > max_width && line.chars().count() > 1 {
                line.pop();
                lines.push(std::mem::take(&mut line));
                line.push(c);
            }
        }
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Encode for the standard fonts' WinAnsiEncoding; unmapped characters
/// become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

// ── Document assembly ────────────────────────────────────────────────────────

fn assemble(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for face in [Face::Regular, Face::Bold, Face::Oblique] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf)?;
    Ok(buf)
}
