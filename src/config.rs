//! Configuration types for question generation and export.
//!
//! Every knob of a run lives in [`McqConfig`], built via its
//! [`McqConfigBuilder`]. Setters clamp values into their legal range and
//! [`McqConfigBuilder::build`] rejects whatever clamping cannot fix.

use crate::error::Pdf2McqError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default completion endpoint of the generation service.
pub const DEFAULT_ENDPOINT: &str = "https://api.together.ai/v1/completions";

/// Default model served by the generation service.
pub const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";

/// Smallest and largest number of questions a single run may request.
pub const MIN_QUESTIONS: u8 = 1;
pub const MAX_QUESTIONS: u8 = 20;

/// Configuration for one PDF-to-MCQ run.
///
/// # Example
/// ```rust
/// use edgequake_pdf2mcq::McqConfig;
///
/// let config = McqConfig::builder()
///     .question_count(10)
///     .api_key("secret")
///     .build()
///     .unwrap();
/// assert_eq!(config.question_count, 10);
/// ```
#[derive(Clone)]
pub struct McqConfig {
    /// Number of questions to request. Range: 1–20. Default: 5.
    pub question_count: u8,

    /// Completion endpoint the prompt is POSTed to.
    pub endpoint: String,

    /// Bearer credential for the generation service.
    pub api_key: Option<String>,

    /// Model identifier sent in the request body.
    pub model: String,

    /// Maximum tokens the model may generate. Default: 1200.
    ///
    /// Twenty questions with four options and tags fit comfortably in 1200
    /// tokens; lower values cut the last question mid-block.
    pub max_tokens: usize,

    /// Sampling temperature. Default: 0.7.
    pub temperature: f32,

    /// Nucleus sampling cut-off. Default: 0.9.
    pub top_p: f32,

    /// How many characters of cleaned text are embedded in the prompt. Default: 3000.
    pub prompt_char_limit: usize,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,
}

impl Default for McqConfig {
    fn default() -> Self {
        Self {
            question_count: 5,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1200,
            temperature: 0.7,
            top_p: 0.9,
            prompt_char_limit: 3000,
            password: None,
        }
    }
}

impl fmt::Debug for McqConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McqConfig")
            .field("question_count", &self.question_count)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("prompt_char_limit", &self.prompt_char_limit)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl McqConfig {
    /// Create a new builder for `McqConfig`.
    pub fn builder() -> McqConfigBuilder {
        McqConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`McqConfig`].
#[derive(Debug)]
pub struct McqConfigBuilder {
    config: McqConfig,
}

impl McqConfigBuilder {
    pub fn question_count(mut self, n: u8) -> Self {
        self.config.question_count = n.clamp(MIN_QUESTIONS, MAX_QUESTIONS);
        self
    }

    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n.max(1);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn top_p(mut self, p: f32) -> Self {
        self.config.top_p = p.clamp(0.0, 1.0);
        self
    }

    pub fn prompt_char_limit(mut self, n: usize) -> Self {
        self.config.prompt_char_limit = n;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<McqConfig, Pdf2McqError> {
        let c = &self.config;
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&c.question_count) {
            return Err(Pdf2McqError::InvalidConfig(format!(
                "question count must be {MIN_QUESTIONS}–{MAX_QUESTIONS}, got {}",
                c.question_count
            )));
        }
        if !c.endpoint.starts_with("http://") && !c.endpoint.starts_with("https://") {
            return Err(Pdf2McqError::InvalidConfig(format!(
                "endpoint must be an HTTP/HTTPS URL, got '{}'",
                c.endpoint
            )));
        }
        if c.prompt_char_limit == 0 {
            return Err(Pdf2McqError::InvalidConfig(
                "prompt character limit must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Export formats ───────────────────────────────────────────────────────

/// One of the three downloadable renderings of a question set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Print document (`generated_mcqs.pdf`).
    Pdf,
    /// Word-processor document (`generated_mcqs.docx`).
    Docx,
    /// Self-contained web form (`generated_mcqs.html`).
    Html,
}

impl ExportFormat {
    /// All formats, in the order they are offered for download.
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Pdf, ExportFormat::Docx, ExportFormat::Html];

    /// Fixed download file name.
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "generated_mcqs.pdf",
            ExportFormat::Docx => "generated_mcqs.docx",
            ExportFormat::Html => "generated_mcqs.html",
        }
    }

    /// MIME type served with the download.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Html => "text/html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Docx => "DOCX",
            ExportFormat::Html => "HTML",
        };
        f.write_str(name)
    }
}
