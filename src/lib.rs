//! # edgequake-pdf2mcq
//!
//! Generate multiple-choice questions (MCQs) from a PDF with a hosted
//! language model, then export them as a printable PDF, a Word document and
//! a self-contained HTML quiz.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      validate the file (or stage uploaded bytes)
//!  ├─ 2. Extract    read the text layer via pdfium (spawn_blocking)
//!  ├─ 3. Normalize  drop footers, blank runs, bullets, repeated spaces
//!  ├─ 4. Prompt     first 3000 chars into the MCQ template
//!  ├─ 5. Generate   one POST to the completions endpoint
//!  ├─ 6. Parse      classify each line: stem, option, answer, tag
//!  └─ 7. Export     PDF · DOCX · HTML
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2mcq::{export_all, generate, ExportFormat, McqConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key read from TOGETHER_API_KEY when not set here.
//!     let config = McqConfig::builder().question_count(10).build()?;
//!     let output = generate("lecture.pdf", &config).await?;
//!     println!("{}", output.reply);
//!     if output.is_success() {
//!         export_all(&output.questions, "out", &ExportFormat::ALL).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2mcq` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod export;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod question;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExportFormat, McqConfig, McqConfigBuilder};
pub use error::{GenerationError, Pdf2McqError};
pub use export::ExportArtifact;
pub use generate::{
    export_all, extract_clean_text, generate, generate_from_bytes, generate_from_text, render_all,
};
pub use output::{ExtractedText, McqOutput, RunStats};
pub use pipeline::normalize::normalize;
pub use pipeline::parse::{classify_line, parse, LineKind};
pub use prompts::build_prompt;
pub use question::{McqOption, OptionLabel, ParsedQuestion};
