//! PDF processing layer
//!
//! Local text extraction through PDFium.

mod reader;

pub use reader::{has_pdf_header, join_pages, join_runs, PdfReader};
