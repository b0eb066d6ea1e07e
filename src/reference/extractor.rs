//! Reference text extraction from paged documents stored in the object store

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::{ObjectGateway, StorageError};

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("reference document unavailable: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to parse '{key}': {reason}")]
    Parse { key: String, reason: String },

    #[error("reference document '{0}' contains no text")]
    Empty(String),
}

/// Splits a document body into per-page text, in page order
pub trait DocumentParser: Send + Sync {
    fn pages(&self, body: &[u8]) -> Result<Vec<String>, String>;
}

/// PDF parsing backed by `lopdf`
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfParser;

impl DocumentParser for PdfParser {
    fn pages(&self, body: &[u8]) -> Result<Vec<String>, String> {
        let document = lopdf::Document::load_mem(body).map_err(|e| e.to_string())?;

        let mut pages = Vec::new();
        for page_number in document.get_pages().keys() {
            match document.extract_text(&[*page_number]) {
                // lopdf ends each page's text with its own newline
                Ok(mut text) => {
                    if text.ends_with('\n') {
                        text.pop();
                    }
                    pages.push(text);
                }
                Err(e) => {
                    warn!("No text extracted from page {}: {}", page_number, e);
                    pages.push(String::new());
                }
            }
        }
        Ok(pages)
    }
}

/// Plain UTF-8 text with pages separated by form feeds (`\x0c`)
#[derive(Debug, Default, Clone, Copy)]
pub struct PagedTextParser;

impl DocumentParser for PagedTextParser {
    fn pages(&self, body: &[u8]) -> Result<Vec<String>, String> {
        let text = std::str::from_utf8(body).map_err(|e| e.to_string())?;
        Ok(text.split('\x0c').map(str::to_string).collect())
    }
}

/// Reads a reference document and flattens it to one string
#[derive(Clone)]
pub struct ReferenceExtractor {
    gateway: ObjectGateway,
    parser: Arc<dyn DocumentParser>,
}

impl ReferenceExtractor {
    pub fn new(gateway: ObjectGateway, parser: Arc<dyn DocumentParser>) -> Self {
        Self { gateway, parser }
    }

    pub fn pdf(gateway: ObjectGateway) -> Self {
        Self::new(gateway, Arc::new(PdfParser))
    }

    /// Text of every page in order, each followed by a newline
    pub async fn extract(&self, key: &str) -> Result<String, ReferenceError> {
        let body = self.gateway.read_bytes(key).await?;

        let parser = Arc::clone(&self.parser);
        let parsed = tokio::task::spawn_blocking(move || parser.pages(&body))
            .await
            .map_err(|e| ReferenceError::Parse {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        let pages = parsed.map_err(|reason| ReferenceError::Parse {
            key: key.to_string(),
            reason,
        })?;

        let text = join_pages(&pages);
        if text.trim().is_empty() {
            return Err(ReferenceError::Empty(key.to_string()));
        }

        debug!("Extracted {} pages ({} chars) from '{}'", pages.len(), text.len(), key);
        Ok(text)
    }
}

fn join_pages(pages: &[String]) -> String {
    pages.iter().fold(String::new(), |mut acc, page| {
        acc.push_str(page);
        acc.push('\n');
        acc
    })
}
