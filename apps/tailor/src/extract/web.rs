//! Job posting text from a web page.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{error, info, warn};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
/// Below this many characters the page is still used, with a warning.
const LOW_CONTENT_CHARS: usize = 100;

/// Elements whose text never counts as posting content.
const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "header", "footer", "nav", "aside", "form", "button", "input",
];

/// Resolves a job link to posting text. `None` means the page could not be used.
#[async_trait]
pub trait JobPageFetcher: Send + Sync {
    async fn fetch_job_text(&self, url: &str) -> Option<String>;
}

/// Fetches pages over HTTP with a browser user agent and a fixed timeout.
#[derive(Clone)]
pub struct HttpJobPageFetcher {
    client: Client,
}

impl HttpJobPageFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder()
                .user_agent(BROWSER_USER_AGENT)
                .timeout(timeout)
                .build()?,
        })
    }
}

#[async_trait]
impl JobPageFetcher for HttpJobPageFetcher {
    async fn fetch_job_text(&self, url: &str) -> Option<String> {
        info!("Attempting to fetch content from URL: {url}");

        let response = match self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                error!("Timeout error fetching URL {url}");
                return None;
            }
            Err(e) => {
                error!("Error fetching URL {url}: {e}");
                return None;
            }
        };
        info!("URL fetch successful (Status: {})", response.status());

        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) if e.is_timeout() => {
                error!("Timeout error reading body from URL {url}");
                return None;
            }
            Err(e) => {
                error!("Error reading body from URL {url}: {e}");
                return None;
            }
        };

        let html = String::from_utf8_lossy(&body);
        let text = extract_visible_text(&html);
        match &text {
            Some(t) => {
                info!("Extracted ~{} characters from {url}", t.chars().count());
                if t.chars().count() < LOW_CONTENT_CHARS {
                    warn!(
                        "Extracted very little text ({} chars) from {url}",
                        t.chars().count()
                    );
                }
            }
            None => warn!("Could not extract any body text from {url}"),
        }
        text
    }
}

/// Visible body text of an HTML document, with non-content elements removed.
///
/// Text nodes are trimmed, empty ones dropped, and the rest joined by newlines
/// before blank-line runs are collapsed. Returns `None` when there is no body or
/// no text survives.
pub fn extract_visible_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let body_selector = Selector::parse("body").ok()?;
    let Some(body) = document.select(&body_selector).next() else {
        warn!("Could not find body tag in page content");
        return None;
    };

    let mut pieces = Vec::new();
    collect_text(body, &mut pieces);

    let text = collapse_blank_lines(&pieces.join("\n"));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn collect_text(element: ElementRef<'_>, out: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if NON_CONTENT_TAGS.contains(&child_element.value().name()) {
                continue;
            }
            collect_text(child_element, out);
        }
    }
}

fn blank_run() -> &'static Regex {
    static BLANK_RUN: OnceLock<Regex> = OnceLock::new();
    BLANK_RUN.get_or_init(|| Regex::new(r"\n\s*\n").expect("blank-line pattern is valid"))
}

/// Collapses every run of blank lines to a single blank line and trims the ends.
pub fn collapse_blank_lines(text: &str) -> String {
    blank_run().replace_all(text, "\n\n").trim().to_string()
}
