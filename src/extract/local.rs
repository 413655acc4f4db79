//! Local extraction with PDFium

use super::TextExtractor;
use crate::error::{Error, Result};
use crate::pdf::PdfReader;
use async_trait::async_trait;

/// Extracts text on this machine: page runs joined by spaces, pages by newlines
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalExtractor;

#[async_trait]
impl TextExtractor for LocalExtractor {
    fn name(&self) -> &str {
        "local"
    }

    async fn extract(&self, data: Vec<u8>) -> Result<String> {
        // Move CPU-heavy PDF work to blocking thread pool
        let reader = tokio::task::spawn_blocking(move || PdfReader::open_bytes(&data))
            .await
            .map_err(|e| Error::Pdfium {
                reason: format!("Task join error: {}", e),
            })??;

        tracing::debug!(pages = reader.page_count(), "extracted text locally");

        Ok(reader.full_text())
    }
}
