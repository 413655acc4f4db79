//! Error types for pdf-qa

use thiserror::Error;

/// Result type alias for pdf-qa
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for pdf-qa
#[derive(Error, Debug)]
pub enum Error {
    /// Selected file does not declare itself as a PDF
    #[error("Please upload a PDF file")]
    InvalidFileType { declared: String },

    /// Invalid PDF file
    #[error("Invalid PDF file: {reason}")]
    InvalidPdf { reason: String },

    /// PDFium error
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },

    /// IO error
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Hosted API answered with a non-success status.
    /// Only the message is displayed; it is what the user sees.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Missing or malformed configuration
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Where an error belongs in the user-facing taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Wrong input, rejected before any work started
    Validation,
    /// Reading or extracting the uploaded document failed
    Extraction,
    /// The question-answering call failed
    Answer,
    /// Startup configuration is unusable
    Config,
}

/// The operation an error was raised from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Question,
}

impl Error {
    /// Classify this error for the operation that produced it.
    ///
    /// Transport and API failures are ambiguous on their own: the same
    /// `Api` error is an extraction failure during upload and an answer
    /// failure when asking.
    pub fn category(&self, operation: Operation) -> ErrorCategory {
        match self {
            Error::InvalidFileType { .. } => ErrorCategory::Validation,
            Error::Config { .. } => ErrorCategory::Config,
            _ => match operation {
                Operation::Upload => ErrorCategory::Extraction,
                Operation::Question => ErrorCategory::Answer,
            },
        }
    }

    /// Build an API error from a failed response body.
    ///
    /// Both supported providers report failures as `{"error": {"message": ...}}`;
    /// anything else falls back to `fallback`.
    pub fn from_api_body(status: u16, body: &str, fallback: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());

        Error::Api { status, message }
    }
}
