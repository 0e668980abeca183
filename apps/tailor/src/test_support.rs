//! Shared fixtures for unit and router tests.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use docx_rs::{Docx, Paragraph, Run};

use crate::extract::web::JobPageFetcher;
use crate::llm_client::{
    Candidate, CandidateContent, GenerateContentResponse, LlmError, Part, PromptFeedback,
    TextGenerator,
};

/// Serves `app` on an ephemeral localhost port and returns its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Builds an in-memory `.docx` with one paragraph per entry.
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let mut docx = Docx::new();
    for text in paragraphs {
        let paragraph = if text.is_empty() {
            Paragraph::new()
        } else {
            Paragraph::new().add_run(Run::new().add_text(*text))
        };
        docx = docx.add_paragraph(paragraph);
    }
    let mut cursor = Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).unwrap();
    cursor.into_inner()
}

enum StubReply {
    Text(String),
    Blocked { reason: String, text: String },
    Fail(String),
    Panic,
}

/// Scripted `TextGenerator` that records how it was called.
pub struct StubGenerator {
    reply: StubReply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl StubGenerator {
    fn new(reply: StubReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::new(StubReply::Text(text.to_string()))
    }

    pub fn blocked_with_text(reason: &str, text: &str) -> Self {
        Self::new(StubReply::Blocked {
            reason: reason.to_string(),
            text: text.to_string(),
        })
    }

    pub fn failing(message: &str) -> Self {
        Self::new(StubReply::Fail(message.to_string()))
    }

    pub fn panicking() -> Self {
        Self::new(StubReply::Panic)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

fn response_with_text(text: &str) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(CandidateContent {
                parts: vec![Part {
                    text: Some(text.to_string()),
                }],
            }),
            finish_reason: Some("STOP".to_string()),
        }],
        ..Default::default()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        match &self.reply {
            StubReply::Text(text) => Ok(response_with_text(text)),
            StubReply::Blocked { reason, text } => Ok(GenerateContentResponse {
                prompt_feedback: Some(PromptFeedback {
                    block_reason: Some(reason.clone()),
                }),
                ..response_with_text(text)
            }),
            StubReply::Fail(message) => Err(LlmError::Api {
                status: 400,
                message: message.clone(),
            }),
            StubReply::Panic => panic!("generator exploded"),
        }
    }
}

/// Scripted `JobPageFetcher`.
pub struct StubJobPages {
    page: Option<String>,
    calls: AtomicUsize,
}

impl StubJobPages {
    pub fn returning(text: &str) -> Self {
        Self {
            page: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            page: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobPageFetcher for StubJobPages {
    async fn fetch_job_text(&self, _url: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.page.clone()
    }
}

pub const BOUNDARY: &str = "tailor-test-boundary";

/// Hand-built multipart/form-data body. `file` is `(filename, bytes)`.
pub fn multipart_body(file: Option<(&str, &[u8])>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some((filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resumeFile\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Number of entries in `dir`.
pub fn dir_entry_count(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
