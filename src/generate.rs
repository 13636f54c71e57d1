//! Run entry points: PDF in, parsed questions and downloads out.
//!
//! A run is strictly sequential: one extraction, one generation call, one
//! parse. Nothing is shared between runs.

use crate::config::{ExportFormat, McqConfig};
use crate::error::{GenerationError, Pdf2McqError};
use crate::export::{self, ExportArtifact};
use crate::output::{ExtractedText, McqOutput, RunStats};
use crate::pipeline::{extract, input, llm, normalize, parse};
use crate::prompts::build_prompt;
use crate::question::ParsedQuestion;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Environment variable read when no API key is configured.
pub const API_KEY_ENV: &str = "TOGETHER_API_KEY";

/// Generate questions from a PDF on disk.
///
/// # Errors
/// Returns `Err(Pdf2McqError)` only for fatal errors: bad input, pdfium
/// failures, missing API key. A failed generation call is *not* an error;
/// see [`McqOutput::generation_error`].
pub async fn generate(
    pdf_path: impl AsRef<Path>,
    config: &McqConfig,
) -> Result<McqOutput, Pdf2McqError> {
    let resolved = input::resolve_local(pdf_path)?;
    run(resolved.path(), config).await
}

/// Generate questions from PDF bytes held in memory (an upload).
///
/// The bytes are staged in a temp file for pdfium and removed on return.
pub async fn generate_from_bytes(
    bytes: &[u8],
    config: &McqConfig,
) -> Result<McqOutput, Pdf2McqError> {
    let staged = input::stage_bytes(bytes)?;
    run(staged.path(), config).await
}

/// Extract and normalize the text of a PDF without calling the service.
///
/// Needs no API key.
pub async fn extract_clean_text(
    pdf_path: impl AsRef<Path>,
    password: Option<&str>,
) -> Result<String, Pdf2McqError> {
    let resolved = input::resolve_local(pdf_path)?;
    let extracted = extract::extract_text(resolved.path(), password).await?;
    Ok(normalize::normalize(&extracted.text))
}

async fn run(pdf_path: &Path, config: &McqConfig) -> Result<McqOutput, Pdf2McqError> {
    let total_start = Instant::now();
    info!("Starting MCQ generation: {}", pdf_path.display());

    // Fail before the slow extraction if the call could never be made.
    let api_key = resolve_api_key(config)?;

    let extract_start = Instant::now();
    let extracted = extract::extract_text(pdf_path, config.password.as_deref()).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    let mut output = generate_from_text(&extracted, &api_key, config).await;
    output.stats.extract_duration_ms = extract_duration_ms;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Run complete: {} questions, {}ms total",
        output.stats.questions_parsed, output.stats.total_duration_ms
    );
    Ok(output)
}

/// Normalize, prompt, call the service and parse. Never fails: a generation
/// error becomes the reply text.
pub async fn generate_from_text(
    extracted: &ExtractedText,
    api_key: &str,
    config: &McqConfig,
) -> McqOutput {
    let cleaned_text = normalize::normalize(&extracted.text);
    debug!(
        "Normalized {} → {} chars",
        extracted.text.chars().count(),
        cleaned_text.chars().count()
    );

    let prompt = build_prompt(&cleaned_text, config.question_count, config.prompt_char_limit);

    let generation_start = Instant::now();
    let outcome = llm::generate_mcqs(&prompt, api_key, config).await;
    let generation_duration_ms = generation_start.elapsed().as_millis() as u64;

    let (reply, questions, generation_error) = settle(outcome);

    let stats = RunStats {
        pages_extracted: extracted.page_count,
        raw_chars: extracted.text.chars().count(),
        cleaned_chars: cleaned_text.chars().count(),
        prompt_chars: prompt.chars().count(),
        questions_parsed: questions.len(),
        generation_duration_ms,
        ..Default::default()
    };

    McqOutput {
        cleaned_text,
        prompt,
        reply,
        questions,
        generation_error,
        stats,
    }
}

/// Fold the generation result into (reply text, questions, error).
fn settle(
    outcome: Result<String, GenerationError>,
) -> (String, Vec<ParsedQuestion>, Option<GenerationError>) {
    match outcome {
        Ok(reply) => {
            let questions = parse::parse(&reply);
            debug!("Parsed {} questions", questions.len());
            (reply, questions, None)
        }
        Err(e) => {
            warn!("Generation failed: {}", e);
            (e.user_message(), Vec::new(), Some(e))
        }
    }
}

/// Configured key first, then `TOGETHER_API_KEY`.
fn resolve_api_key(config: &McqConfig) -> Result<String, Pdf2McqError> {
    config
        .api_key
        .clone()
        .filter(|k| !k.is_empty())
        .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
        .ok_or_else(|| Pdf2McqError::ProviderNotConfigured {
            hint: format!("Set {API_KEY_ENV} or pass --api-key."),
        })
}

/// Render the question set in every requested format.
pub fn render_all(
    questions: &[ParsedQuestion],
    formats: &[ExportFormat],
) -> Result<Vec<ExportArtifact>, Pdf2McqError> {
    formats
        .iter()
        .map(|&format| export::render(format, questions))
        .collect()
}

/// Render and write each requested format into `dir` under its fixed file
/// name. Returns the written paths in `formats` order.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn export_all(
    questions: &[ParsedQuestion],
    dir: impl AsRef<Path>,
    formats: &[ExportFormat],
) -> Result<Vec<PathBuf>, Pdf2McqError> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| Pdf2McqError::OutputWriteFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

    let mut written = Vec::with_capacity(formats.len());
    for artifact in render_all(questions, formats)? {
        let path = dir.join(artifact.file_name());
        write_atomic(&path, &artifact.bytes).await?;
        info!(
            "Wrote {} ({}, {} bytes)",
            path.display(),
            artifact.mime_type(),
            artifact.bytes.len()
        );
        written.push(path);
    }
    Ok(written)
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Pdf2McqError> {
    let write_err = |e| Pdf2McqError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    if let Err(e) = tokio::fs::write(&tmp_path, bytes).await {
        tokio::fs::remove_file(&tmp_path).await.ok();
        return Err(write_err(e));
    }
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        warn!("Rename to {} failed, removing temp file", path.display());
        tokio::fs::remove_file(&tmp_path).await.ok();
        return Err(write_err(e));
    }
    Ok(())
}
