//! Error types for the edgequake-pdf2mcq library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2McqError`] — **Fatal**: the run cannot proceed at all (bad input
//!   file, wrong password, pdfium missing, no API key). Returned as
//!   `Err(Pdf2McqError)` from the top-level `generate*` functions.
//!
//! * [`GenerationError`] — **Non-fatal**: the single call to the generation
//!   service failed (network, HTTP status, malformed body). It never escapes
//!   [`crate::generate()`]; instead it is stored in
//!   [`crate::output::McqOutput::generation_error`] and its
//!   [`user_message`](GenerationError::user_message) is shown to the user in
//!   place of the generated questions.

use crate::config::ExportFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Prefix that marks a generation failure in user-facing output.
///
/// Distinct from anything a model would plausibly emit, so callers can tell
/// an error reply apart from generated questions at a glance.
pub const GENERATION_ERROR_PREFIX: &str = "❌ Error calling generation API: ";

/// All fatal errors returned by the edgequake-pdf2mcq library.
#[derive(Debug, Error)]
pub enum Pdf2McqError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium could not extract the text layer of a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    ExtractionFailed { page: usize, detail: String },

    // ── Generation service ────────────────────────────────────────────────
    /// No API key is available for the generation service.
    #[error("Generation service is not configured.\n{hint}")]
    ProviderNotConfigured { hint: String },

    // ── Export errors ─────────────────────────────────────────────────────
    /// A sink failed to serialise the question set.
    #[error("Failed to render {format}: {detail}")]
    ExportFailed { format: ExportFormat, detail: String },

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Text extraction needs the pdfium shared library. You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Place libpdfium next to where you run pdf2mcq.\n\
  • Install pdfium system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal failure of the one call to the generation service.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum GenerationError {
    /// The request never produced a response (DNS, connect, TLS, reset).
    #[error("request to {endpoint} failed: {detail}")]
    Transport { endpoint: String, detail: String },

    /// The service answered with a non-success HTTP status and a non-JSON body.
    #[error("HTTP {status} from {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body was not JSON.
    #[error("malformed response body: {detail}")]
    MalformedResponse { detail: String },
}

impl GenerationError {
    /// The message shown to the user in place of generated questions.
    pub fn user_message(&self) -> String {
        format!("{GENERATION_ERROR_PREFIX}{self}")
    }
}
