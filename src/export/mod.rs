//! Export sinks: render parsed questions into downloadable documents.
//!
//! Each sink reads the full, ordered question set and produces a complete
//! buffer on its own; no sink depends on another's output.
//!
//! | Format | Module | Output |
//! |--------|--------|--------|
//! | PDF    | [`pdf`]  | A4 print document |
//! | DOCX   | [`docx`] | Word document with a numbered list |
//! | HTML   | [`html`] | Self-contained quiz form |

pub mod docx;
pub mod html;
pub mod pdf;

use crate::config::ExportFormat;
use crate::error::Pdf2McqError;
use crate::question::ParsedQuestion;

/// One rendered download.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn file_name(&self) -> &'static str {
        self.format.file_name()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Render the question set in one format.
pub fn render(format: ExportFormat, questions: &[ParsedQuestion]) -> Result<ExportArtifact, Pdf2McqError> {
    let bytes = match format {
        ExportFormat::Pdf => pdf::render_pdf(questions)?,
        ExportFormat::Docx => docx::render_docx(questions)?,
        ExportFormat::Html => html::render_html(questions).into_bytes(),
    };
    Ok(ExportArtifact { format, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_format_renders_empty_set() {
        for format in ExportFormat::ALL {
            let artifact = render(format, &[]).unwrap();
            assert!(!artifact.bytes.is_empty(), "{format} is empty");
            assert_eq!(artifact.file_name(), format.file_name());
        }
    }

    #[test]
    fn html_artifact_is_utf8_markup() {
        let artifact = render(ExportFormat::Html, &[]).unwrap();
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert!(text.contains("<form>"));
        assert_eq!(artifact.format.mime_type(), "text/html");
    }
}
