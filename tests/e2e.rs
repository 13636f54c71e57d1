//! End-to-end integration tests for edgequake-pdf2mcq.
//!
//! The offline tests drive the whole text → prompt → reply → downloads path
//! against a local one-shot HTTP server standing in for the completions
//! service. They need neither pdfium nor an API key.
//!
//! The live tests read real PDF files in `./test_cases/` and call the real
//! service. They are gated behind the `E2E_ENABLED` environment variable so
//! they do not run in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 TOGETHER_API_KEY=... cargo test --test e2e -- --nocapture

use edgequake_pdf2mcq::{
    build_prompt, export_all, extract_clean_text, generate, generate_from_bytes,
    generate_from_text, normalize, parse, render_all, ExportFormat, ExtractedText, McqConfig,
    Pdf2McqError,
};
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// ── Test helpers ─────────────────────────────────────────────────────────────

const REFERENCE_REPLY: &str = "What is 2+2?\n\
A. 3\n\
B. 4\n\
C. 5\n\
D. 22\n\
Answer: B\n\
[Easy]\n\
\n\
Capital of France?\n\
A. Paris\n\
B. Rome\n\
Answer: A";

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

/// Skip this test if E2E_ENABLED is not set *or* no PDF file at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            return;
        }
        p
    }};
}

/// Serve exactly one HTTP response, then hand back the raw request.
async fn one_shot_server(
    status_line: &'static str,
    body: String,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if request_complete(&buf) {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&buf).into_owned()
    });
    (format!("http://{addr}/v1/completions"), handle)
}

fn request_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|l| {
            let (name, value) = l.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);
    buf.len() >= header_end + 4 + content_length
}

fn request_json(raw: &str) -> serde_json::Value {
    let body = raw.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or("");
    serde_json::from_str(body).unwrap()
}

fn extracted(text: &str) -> ExtractedText {
    ExtractedText {
        text: text.to_string(),
        page_count: 1,
    }
}

// ── Offline pipeline tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_text_to_downloads_with_mock_service() {
    let reply_json = serde_json::json!({ "choices": [{ "text": format!("\n  {REFERENCE_REPLY}  \n") }] });
    let (endpoint, server) = one_shot_server("200 OK", reply_json.to_string()).await;

    let config = McqConfig::builder()
        .question_count(2)
        .endpoint(endpoint)
        .build()
        .unwrap();
    let page = "Arithmetic\n\n\n  Two   plus two is four.  \n• Paris is in France\nPage 3\n";
    let output = generate_from_text(&extracted(page), "test-key", &config).await;

    assert!(output.is_success(), "reply: {}", output.reply);
    assert_eq!(
        output.cleaned_text,
        "Arithmetic\nTwo plus two is four.\n- Paris is in France"
    );
    assert_eq!(output.reply, REFERENCE_REPLY);
    assert_eq!(output.questions.len(), 2);
    assert_eq!(output.stats.questions_parsed, 2);
    assert_eq!(output.stats.pages_extracted, 1);

    let request = server.await.unwrap();
    assert!(request.contains("authorization: Bearer test-key") || request.contains("Authorization: Bearer test-key"));
    let body = request_json(&request);
    assert_eq!(body["prompt"], output.prompt);
    assert!(output.prompt.contains("Generate 2 well-formatted multiple choice questions"));
    assert!(output.prompt.contains("- Paris is in France"));

    let q1 = &output.questions[0];
    assert_eq!(q1.stem, "What is 2+2?");
    assert_eq!(q1.options.len(), 4);
    assert_eq!(q1.answer_label, Some('B'));
    assert_eq!(q1.tags, vec!["[Easy]".to_string()]);
    let q2 = &output.questions[1];
    assert_eq!(q2.stem, "Capital of France?");
    assert_eq!(q2.answer_label, Some('A'));
    assert!(q2.tags.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let paths = export_all(&output.questions, dir.path(), &ExportFormat::ALL)
        .await
        .unwrap();
    assert_eq!(paths.len(), 3);

    let html = std::fs::read_to_string(dir.path().join("generated_mcqs.html")).unwrap();
    assert!(html.contains("Q1. What is 2+2?"));
    assert!(html.contains("Q2. Capital of France?"));
    assert_eq!(html.matches("type=\"radio\" name=\"q1\"").count(), 4);
    assert_eq!(html.matches("type=\"radio\" name=\"q2\"").count(), 2);
    assert!(!html.contains("Answer: B"));

    let pdf = std::fs::read(dir.path().join("generated_mcqs.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    let docx = std::fs::read(dir.path().join("generated_mcqs.docx")).unwrap();
    assert!(docx.starts_with(b"PK"));
}

#[tokio::test]
async fn test_failed_generation_yields_message_and_no_questions() {
    let (endpoint, server) =
        one_shot_server("503 Service Unavailable", "upstream unavailable".to_string()).await;
    let config = McqConfig::builder().endpoint(endpoint).build().unwrap();

    let output = generate_from_text(&extracted("Some lecture text"), "bad-key", &config).await;
    server.await.unwrap();

    assert!(!output.is_success());
    assert!(output.reply.starts_with("❌ Error calling generation API: "));
    assert!(output.questions.is_empty());
    assert_eq!(output.stats.questions_parsed, 0);
}

#[tokio::test]
async fn test_json_error_status_is_placeholder_and_exportable() {
    let body = r#"{"error":{"message":"invalid api key"}}"#.to_string();
    let (endpoint, server) = one_shot_server("401 Unauthorized", body).await;
    let config = McqConfig::builder().endpoint(endpoint).build().unwrap();

    let output = generate_from_text(&extracted("Some lecture text"), "bad-key", &config).await;
    server.await.unwrap();

    assert!(output.is_success());
    assert_eq!(output.reply, "⚠️ No output received.");
    assert_eq!(output.questions.len(), 1);

    let dir = tempfile::tempdir().unwrap();
    let paths = export_all(&output.questions, dir.path(), &ExportFormat::ALL)
        .await
        .unwrap();
    assert_eq!(paths.len(), 3);
}

#[tokio::test]
async fn test_missing_completion_text_is_placeholder() {
    let (endpoint, server) = one_shot_server("200 OK", r#"{"choices":[]}"#.to_string()).await;
    let config = McqConfig::builder().endpoint(endpoint).build().unwrap();

    let output = generate_from_text(&extracted("text"), "k", &config).await;
    server.await.unwrap();

    assert!(output.is_success());
    assert_eq!(output.reply, "⚠️ No output received.");
    assert_eq!(output.questions.len(), 1);
    assert_eq!(output.questions[0].stem, "⚠️ No output received.");
}

#[test]
fn test_prompt_truncates_cleaned_text() {
    let long = "word ".repeat(2000);
    let cleaned = normalize(&long);
    let prompt = build_prompt(&cleaned, 5, 3000);
    assert!(prompt.contains("Generate 5 well-formatted multiple choice questions"));
    assert!(prompt.chars().count() < cleaned.chars().count());
}

#[test]
fn test_normalize_is_idempotent_on_lecture_text() {
    let raw = "Chapter 1\n\n\nIntro\n  •  bullet   one\n12\nBody text here\n\n";
    let once = normalize(raw);
    assert_eq!(normalize(&once), once);
    assert!(!once.lines().any(|l| l.trim().is_empty()));
    assert!(!once.contains('•'));
    assert!(!once.contains("  "));
}

#[test]
fn test_every_nonempty_block_becomes_a_question() {
    let reply = "Q1\nA. a\n\n\n   \n\nQ2\n\nQ3\nAnswer: c";
    let questions = parse(reply);
    let stems: Vec<_> = questions.iter().map(|q| q.stem.as_str()).collect();
    assert_eq!(stems, vec!["Q1", "Q2", "Q3"]);
    assert_eq!(questions[2].answer_label, Some('c'));
}

#[test]
fn test_render_all_handles_many_questions() {
    let reply: String = (1..=12)
        .map(|i| format!("Question {i}?\nA. yes\nB. no\nAnswer: A\n[Medium]"))
        .collect::<Vec<_>>()
        .join("\n\n");
    let questions = parse(&reply);
    assert_eq!(questions.len(), 12);

    let artifacts = render_all(&questions, &ExportFormat::ALL).unwrap();
    let html = String::from_utf8(artifacts[2].bytes.clone()).unwrap();
    assert!(html.contains("Q12. Question 12?"));
    assert_eq!(html.matches("<fieldset>").count(), 12);
}

// ── Input validation (no pdfium, no LLM) ────────────────────────────────────

#[tokio::test]
async fn test_non_pdf_upload_is_rejected() {
    let config = McqConfig::builder().api_key("k").build().unwrap();
    let err = generate_from_bytes(b"hello world", &config).await.unwrap_err();
    assert!(matches!(err, Pdf2McqError::NotAPdf { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_nonexistent_file_is_rejected() {
    let config = McqConfig::builder().api_key("k").build().unwrap();
    let err = generate("/definitely/not/a/real/file.pdf", &config)
        .await
        .unwrap_err();
    assert!(matches!(err, Pdf2McqError::FileNotFound { .. }), "got {err:?}");

    let err = extract_clean_text("/definitely/not/a/real/file.pdf", None)
        .await
        .unwrap_err();
    assert!(matches!(err, Pdf2McqError::FileNotFound { .. }));
}

// ── Live tests (need pdfium and the generation service) ─────────────────────

#[tokio::test]
async fn test_extract_clean_text_sample() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));

    let text = extract_clean_text(&path, None)
        .await
        .expect("extraction should succeed");

    assert!(!text.trim().is_empty(), "cleaned text is empty");
    assert_eq!(normalize(&text), text, "cleaned text must be a fixed point");
    println!("Cleaned text: {} chars", text.chars().count());
}

#[tokio::test]
async fn test_generate_sample_live() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));
    if std::env::var("TOGETHER_API_KEY").is_err() {
        println!("SKIP — TOGETHER_API_KEY not set");
        return;
    }

    let config = McqConfig::builder()
        .question_count(3)
        .build()
        .expect("valid config");
    let output = generate(&path, &config)
        .await
        .expect("run should succeed");

    println!("Reply:\n{}", output.reply);
    assert!(output.is_success(), "generation failed: {}", output.reply);
    assert!(!output.questions.is_empty());
    assert!(output.questions.iter().all(|q| !q.stem.is_empty()));

    let dir = tempfile::tempdir().unwrap();
    let paths = export_all(&output.questions, dir.path(), &ExportFormat::ALL)
        .await
        .expect("export should succeed");
    for p in paths {
        assert!(std::fs::metadata(&p).unwrap().len() > 0, "{} empty", p.display());
    }
}
