//! Text extraction strategies
//!
//! Both strategies honor the same contract: raw PDF bytes in, best-effort
//! plain text out. Empty text is a valid result (e.g. scanned pages without
//! OCR); only unreadable input or a failed remote call is an error.

mod local;
mod remote;

pub use local::LocalExtractor;
pub use remote::{RemoteExtractor, EXTRACTION_FAILED, EXTRACTION_INSTRUCTION};

use crate::api::MessagesClient;
use crate::config::{Config, ExtractionStrategy};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Converts PDF bytes into plain text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &str;

    /// Extract the text of the whole document
    async fn extract(&self, data: Vec<u8>) -> Result<String>;
}

/// Build the configured extractor
pub fn text_extractor(config: &Config, client: reqwest::Client) -> Arc<dyn TextExtractor> {
    match config.extraction {
        ExtractionStrategy::Local => Arc::new(LocalExtractor),
        ExtractionStrategy::Remote => {
            Arc::new(RemoteExtractor::new(MessagesClient::new(client, config)))
        }
    }
}
