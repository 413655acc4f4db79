//! In-process stand-ins for the extractor and answer backend

use crate::api::AnswerBackend;
use crate::error::{Error, Result};
use crate::extract::TextExtractor;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Hands out queued results, then empty text
pub struct FakeExtractor {
    results: Mutex<Vec<Result<String>>>,
}

impl FakeExtractor {
    pub fn returning(mut results: Vec<Result<String>>) -> Arc<Self> {
        results.reverse();
        Arc::new(Self {
            results: Mutex::new(results),
        })
    }
}

#[async_trait]
impl TextExtractor for FakeExtractor {
    fn name(&self) -> &str {
        "fake"
    }

    async fn extract(&self, _data: Vec<u8>) -> Result<String> {
        self.results
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

/// Records prompts; answers with a fixed text or a 500
#[derive(Default)]
pub struct FakeBackend {
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
    pub fail: bool,
    /// Hold every answer back this long
    pub delay: Option<Duration>,
}

#[async_trait]
impl AnswerBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            Err(Error::Api {
                status: 500,
                message: "Failed to get answer".to_string(),
            })
        } else {
            Ok("Employees get 20 days.".to_string())
        }
    }
}
