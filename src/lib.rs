//! PDF question answering
//!
//! This crate loads one PDF at a time and answers questions about it:
//! - `source`: selected files and their declared type
//! - `extract`: text extraction, locally with PDFium or through a hosted model
//! - `api`: answer generation against hosted text-generation APIs
//! - `session`: upload/question flow, transcript and control state
//! - `console`: line-based terminal front end

pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod extract;
pub mod pdf;
pub mod session;
pub mod source;

#[cfg(test)]
mod testing;

pub use config::{Config, ExtractionStrategy, Provider};
pub use error::{Error, ErrorCategory, Operation, Result};
pub use session::{LoadedDocument, Phase, Role, Session, Status, StatusKind};
pub use source::SelectedFile;
