//! Text extraction: read the text layer of every page via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which keeps thread-local
//! state and blocks while it parses. `tokio::task::spawn_blocking` moves that
//! work onto the blocking pool so the async runtime is never stalled.

use crate::error::Pdf2McqError;
use crate::output::ExtractedText;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable naming an explicit pdfium shared library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Extract the text of every page. Each page's text is followed by `\n`.
pub async fn extract_text(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<ExtractedText, Pdf2McqError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(|s| s.to_string());

    tokio::task::spawn_blocking(move || extract_text_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| Pdf2McqError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Bind to pdfium: `PDFIUM_LIB_PATH` first, then the working directory, then
/// the system library.
pub fn bind_pdfium() -> Result<Pdfium, Pdf2McqError> {
    let bindings = match std::env::var(PDFIUM_LIB_PATH_ENV) {
        Ok(lib) if !lib.is_empty() => {
            debug!("Binding pdfium from {}={}", PDFIUM_LIB_PATH_ENV, lib);
            Pdfium::bind_to_library(&lib)
        }
        _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| Pdf2McqError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Blocking implementation of text extraction.
fn extract_text_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<ExtractedText, Pdf2McqError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| classify_load_error(pdf_path, password, format!("{:?}", e)))?;

    let pages = document.pages();
    let page_count = pages.len() as usize;
    info!("PDF loaded: {} pages", page_count);

    let mut text = String::new();
    for (idx, page) in pages.iter().enumerate() {
        let page_text = page
            .text()
            .map_err(|e| Pdf2McqError::ExtractionFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?
            .all();
        debug!("Page {}: {} chars", idx + 1, page_text.chars().count());
        text.push_str(&page_text);
        text.push('\n');
    }

    Ok(ExtractedText { text, page_count })
}

/// Map a pdfium load failure onto the matching fatal error.
fn classify_load_error(pdf_path: &Path, password: Option<&str>, detail: String) -> Pdf2McqError {
    if detail.contains("Password") || detail.contains("password") {
        if password.is_some() {
            Pdf2McqError::WrongPassword {
                path: pdf_path.to_path_buf(),
            }
        } else {
            Pdf2McqError::PasswordRequired {
                path: pdf_path.to_path_buf(),
            }
        }
    } else {
        Pdf2McqError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail,
        }
    }
}
