//! PDF reader wrapper for PDFium

use crate::error::{Error, Result};
use pdfium_render::prelude::*;

/// Get PDFium instance (creates new instance each time - PDFium is not thread-safe)
fn create_pdfium() -> Result<Pdfium> {
    // Try to bind to system library or use static linking
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to initialize PDFium: {}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

/// Check the `%PDF` magic at the start of a buffer
pub fn has_pdf_header(data: &[u8]) -> bool {
    data.len() >= 4 && &data[0..4] == b"%PDF"
}

/// Join the text runs of one page with single spaces
pub fn join_runs<I, S>(runs: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut page = String::new();
    for (i, run) in runs.into_iter().enumerate() {
        if i > 0 {
            page.push(' ');
        }
        page.push_str(run.as_ref());
    }
    page
}

/// Concatenate page texts, each followed by a newline
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let capacity = pages.iter().map(|p| p.as_ref().len() + 1).sum();
    let mut text = String::with_capacity(capacity);
    for page in pages {
        text.push_str(page.as_ref());
        text.push('\n');
    }
    text
}

/// PDF reader using PDFium.
///
/// All page text is pulled out when the document is opened, so the reader
/// never holds on to PDFium handles.
pub struct PdfReader {
    page_texts: Vec<String>,
}

impl PdfReader {
    /// Open a PDF from bytes
    pub fn open_bytes(data: &[u8]) -> Result<Self> {
        if !has_pdf_header(data) {
            return Err(Error::InvalidPdf {
                reason: "Not a valid PDF file".to_string(),
            });
        }

        let pdfium = create_pdfium()?;

        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(Self::map_pdfium_error)?;

        let page_texts = Self::extract_all_page_texts(&document)?;

        Ok(Self { page_texts })
    }

    /// Pages in document order, 1 through page count
    fn extract_all_page_texts(document: &PdfDocument) -> Result<Vec<String>> {
        let pages = document.pages();
        let mut texts = Vec::with_capacity(pages.len() as usize);

        for index in 0..pages.len() {
            let page = pages.get(index).map_err(|e| Error::Pdfium {
                reason: format!("Failed to get page {}: {}", index + 1, e),
            })?;

            texts.push(Self::page_text(&page));
        }

        Ok(texts)
    }

    /// Text runs of a page in content order, joined with spaces.
    /// A page without a readable text layer yields an empty string.
    fn page_text(page: &PdfPage) -> String {
        match page.text() {
            Ok(text) => join_runs(text.segments().iter().map(|segment| segment.text())),
            Err(e) => {
                tracing::debug!(error = %e, "page has no readable text layer");
                String::new()
            }
        }
    }

    /// Map PDFium errors to our error type
    fn map_pdfium_error(err: PdfiumError) -> Error {
        match err {
            PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
                Error::InvalidPdf {
                    reason: "PDF is password protected".to_string(),
                }
            }
            PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::FormatError) => {
                Error::InvalidPdf {
                    reason: "File is damaged or not a PDF".to_string(),
                }
            }
            _ => Error::Pdfium {
                reason: format!("{}", err),
            },
        }
    }

    /// Get the number of pages
    pub fn page_count(&self) -> u32 {
        self.page_texts.len() as u32
    }

    /// Per-page text, first page first
    pub fn pages(&self) -> &[String] {
        &self.page_texts
    }

    /// Whole-document text: every page followed by a newline
    pub fn full_text(&self) -> String {
        join_pages(&self.page_texts)
    }
}
