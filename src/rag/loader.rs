// src/rag/loader.rs
use regex::Regex;
use reqwest::Client;
use scraper::Html;

use super::UpstreamError;

lazy_static::lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements whose text starts on its own line. Everything else is inline.
const BLOCK_ELEMENTS: &[&str] = &[
    "html", "body", "title", "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li",
    "dl", "dt", "dd", "section", "article", "header", "footer", "nav", "main", "aside",
    "blockquote", "pre", "table", "thead", "tbody", "tr", "td", "th", "form", "fieldset",
    "figure", "figcaption", "address", "details", "summary",
];

/// Fetches a web page and reduces it to its visible text.
#[derive(Debug, Clone, Default)]
pub struct WebPageLoader {
    client: Client,
}

impl WebPageLoader {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }

    pub async fn load(&self, url: &str) -> Result<String, UpstreamError> {
        tracing::info!("Fetching institute content from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::Fetch(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Fetch(format!("{} returned {}", url, status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Fetch(format!("Failed to read body of {}: {}", url, e)))?;

        let text = extract_text(&body);
        tracing::info!("Loaded {} characters of text from {}", text.chars().count(), url);
        Ok(text)
    }
}

/// Visible text of a page. Text under the same nearest block element is joined
/// into one line; scripts and styles are dropped.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_block = None;

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|el| SKIPPED_ELEMENTS.contains(&el.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        let block = node
            .ancestors()
            .find(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map(|el| BLOCK_ELEMENTS.contains(&el.name()))
                    .unwrap_or(false)
            })
            .map(|ancestor| ancestor.id());

        if block != current_block {
            push_line(&mut lines, &mut current);
            current_block = block;
        }
        current.push_str(text);
    }
    push_line(&mut lines, &mut current);

    lines.join("\n")
}

fn push_line(lines: &mut Vec<String>, buffer: &mut String) {
    let line = WHITESPACE.replace_all(buffer.trim(), " ");
    if !line.is_empty() {
        lines.push(line.into_owned());
    }
    buffer.clear();
}
