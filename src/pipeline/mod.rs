//! Pipeline stages for PDF-to-MCQ generation.
//!
//! Each submodule implements exactly one transformation step, so each is
//! testable on its own and none knows about the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ normalize ──▶ llm ──▶ parse
//! (path)    (pdfium)    (cleanup)    (HTTP)  (classify)
//! ```
//!
//! 1. [`input`]     — validate a path, or stage uploaded bytes in a temp file
//! 2. [`extract`]   — read every page's text layer; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 3. [`normalize`] — deterministic cleanup that strips footers, blank runs
//!    and bullet glyphs
//! 4. [`llm`]       — the single call to the generation service; the only
//!    stage with network I/O
//! 5. [`parse`]     — permissive line classification into question records
//!
//! The prompt template between 3 and 4 lives in [`crate::prompts`].

pub mod extract;
pub mod input;
pub mod llm;
pub mod normalize;
pub mod parse;
