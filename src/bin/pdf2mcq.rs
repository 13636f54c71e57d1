//! CLI binary for edgequake-pdf2mcq.
//!
//! A thin shim over the library crate: one PDF in, one generation call,
//! the reply on stdout and the three downloads in the output directory.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2mcq::config::{DEFAULT_ENDPOINT, DEFAULT_MODEL, MAX_QUESTIONS, MIN_QUESTIONS};
use edgequake_pdf2mcq::{export_all, extract_clean_text, generate, ExportFormat, McqConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Five questions, all three downloads in the current directory
  pdf2mcq lecture.pdf

  # Twelve questions into ./quiz, HTML only
  pdf2mcq -n 12 -o quiz --formats html lecture.pdf

  # Inspect the cleaned text that would be sent (no API key needed)
  pdf2mcq --text-only lecture.pdf

  # Structured output
  pdf2mcq --json lecture.pdf > run.json

DOWNLOADS:
  generated_mcqs.pdf    application/pdf
  generated_mcqs.docx   application/vnd.openxmlformats-officedocument.wordprocessingml.document
  generated_mcqs.html   text/html

ENVIRONMENT VARIABLES:
  TOGETHER_API_KEY   API key for the generation service
  PDF2MCQ_ENDPOINT   Override the completions endpoint
  PDF2MCQ_MODEL      Override the model ID
  PDFIUM_LIB_PATH    Path to an existing libpdfium
  RUST_LOG           Override the log filter
"#;

/// Generate multiple-choice questions from a PDF.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2mcq",
    version,
    about = "Generate multiple-choice questions from a PDF and export them as PDF, DOCX and HTML",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Number of questions to generate (1–20).
    #[arg(short = 'n', long, env = "PDF2MCQ_QUESTIONS", default_value_t = 5,
          value_parser = clap::value_parser!(u8).range(MIN_QUESTIONS as i64..=MAX_QUESTIONS as i64))]
    questions: u8,

    /// Directory the downloads are written to.
    #[arg(short, long, env = "PDF2MCQ_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Download formats to write.
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = vec![FormatArg::Pdf, FormatArg::Docx, FormatArg::Html])]
    formats: Vec<FormatArg>,

    /// API key for the generation service.
    #[arg(long, env = "TOGETHER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Completions endpoint.
    #[arg(long, env = "PDF2MCQ_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Model ID.
    #[arg(long, env = "PDF2MCQ_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Max tokens the model may generate.
    #[arg(long, env = "PDF2MCQ_MAX_TOKENS", default_value_t = 1200)]
    max_tokens: usize,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "PDF2MCQ_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Nucleus sampling cut-off (0.0–1.0).
    #[arg(long, env = "PDF2MCQ_TOP_P", default_value_t = 0.9)]
    top_p: f32,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2MCQ_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Print the cleaned document text and exit; no generation call.
    #[arg(long)]
    text_only: bool,

    /// Print the full run result as JSON instead of the reply text.
    #[arg(long)]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "PDF2MCQ_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2MCQ_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the reply and errors.
    #[arg(short, long, env = "PDF2MCQ_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    Pdf,
    Docx,
    Html,
}

impl From<FormatArg> for ExportFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Pdf => ExportFormat::Pdf,
            FormatArg::Docx => ExportFormat::Docx,
            FormatArg::Html => ExportFormat::Html,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner is the user-facing feedback; library INFO logs would
    // fight with it for the same terminal line.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.text_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Text-only mode ───────────────────────────────────────────────────
    if cli.text_only {
        let text = extract_clean_text(&cli.input, cli.password.as_deref())
            .await
            .context("Failed to extract text")?;
        println!("{text}");
        return Ok(());
    }

    let config = build_config(&cli)?;

    // ── Generate ─────────────────────────────────────────────────────────
    let spinner = show_progress.then(generation_spinner);
    let result = generate(&cli.input, &config).await;
    if let Some(ref bar) = spinner {
        bar.finish_and_clear();
    }
    let output = result.context("MCQ generation failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.reply.as_bytes())
            .context("Failed to write to stdout")?;
        if !output.reply.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    // A failed call has nothing worth exporting; the error is already on stdout.
    if !output.is_success() {
        if !cli.quiet {
            eprintln!("{} generation failed, no files written", red("✘"));
        }
        return Ok(());
    }

    // ── Export ───────────────────────────────────────────────────────────
    let formats: Vec<ExportFormat> = dedup_formats(&cli.formats);
    let written = export_all(&output.questions, &cli.out_dir, &formats)
        .await
        .context("Failed to write downloads")?;

    if !cli.quiet {
        eprintln!(
            "{} {} questions  {}ms",
            green("✔"),
            bold(&output.stats.questions_parsed.to_string()),
            output.stats.total_duration_ms,
        );
        for (path, format) in written.iter().zip(&formats) {
            eprintln!(
                "   {}  {}",
                bold(&path.display().to_string()),
                dim(format.mime_type())
            );
        }
    }

    Ok(())
}

fn generation_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
    bar.set_style(style);
    bar.set_prefix("Generating");
    bar.set_message("Generating MCQs…");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Map CLI args to `McqConfig`.
fn build_config(cli: &Cli) -> Result<McqConfig> {
    let mut builder = McqConfig::builder()
        .question_count(cli.questions)
        .endpoint(cli.endpoint.clone())
        .model(cli.model.clone())
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .top_p(cli.top_p);

    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.clone());
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }

    builder.build().context("Invalid configuration")
}

/// Keep the first occurrence of each format, in the order given.
fn dedup_formats(args: &[FormatArg]) -> Vec<ExportFormat> {
    let mut formats: Vec<ExportFormat> = Vec::with_capacity(args.len());
    for &arg in args {
        let format = ExportFormat::from(arg);
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    formats
}
