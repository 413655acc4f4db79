//! Remote extraction through a hosted document model

use super::TextExtractor;
use crate::api::{ContentPart, MessagesClient};
use crate::error::{Error, Result};
use crate::pdf::has_pdf_header;
use async_trait::async_trait;
use base64::Engine;

/// Instruction sent alongside the PDF
pub const EXTRACTION_INSTRUCTION: &str = "Extract all of the text from this PDF document. \
Return only the extracted text, without commentary.";

/// Reported when a failed extraction reply carries no error message
pub const EXTRACTION_FAILED: &str = "Failed to extract text";

/// Sends the PDF as a base64 document part and returns the model's text verbatim
#[derive(Clone)]
pub struct RemoteExtractor {
    client: MessagesClient,
}

impl RemoteExtractor {
    pub fn new(client: MessagesClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TextExtractor for RemoteExtractor {
    fn name(&self) -> &str {
        "remote"
    }

    async fn extract(&self, data: Vec<u8>) -> Result<String> {
        if !has_pdf_header(&data) {
            return Err(Error::InvalidPdf {
                reason: "Not a valid PDF file".to_string(),
            });
        }

        let encoded = base64::engine::general_purpose::STANDARD.encode(&data);

        tracing::debug!(
            bytes = data.len(),
            model = %self.client.model(),
            "submitting PDF for remote extraction"
        );

        let text = self
            .client
            .send(
                vec![
                    ContentPart::pdf(&encoded),
                    ContentPart::Text {
                        text: EXTRACTION_INSTRUCTION,
                    },
                ],
                EXTRACTION_FAILED,
            )
            .await?;

        // A reply without text means nothing was extractable, not a failure
        Ok(text.unwrap_or_default())
    }
}
