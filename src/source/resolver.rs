//! Resolution of user-selected files

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// MIME type every upload must declare
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Where the bytes of a selected file live
#[derive(Debug, Clone)]
pub enum FileContents {
    /// On disk; read only once the upload is accepted
    Path(PathBuf),
    /// Already in memory
    Bytes(Vec<u8>),
}

/// A file picked by the user, before it has been read
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    /// MIME type the file claims to be, as a file picker would report it
    pub declared_type: String,
    pub size: u64,
    pub contents: FileContents,
}

impl SelectedFile {
    /// Select a file on disk. The declared type comes from the extension.
    ///
    /// A missing or unreadable file is still selectable; the failure
    /// surfaces when the upload reads it.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Self {
            declared_type: mime_type_for(path).to_string(),
            name,
            size,
            contents: FileContents::Path(path.to_path_buf()),
        }
    }

    /// Select an in-memory file with an explicit declared type
    pub fn from_bytes(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            size: data.len() as u64,
            contents: FileContents::Bytes(data),
        }
    }

    /// Whether the file declares itself as a PDF
    pub fn is_pdf(&self) -> bool {
        self.declared_type.eq_ignore_ascii_case(PDF_MIME_TYPE)
    }

    /// Reject anything not declared as a PDF
    pub fn validate(&self) -> Result<()> {
        if self.is_pdf() {
            Ok(())
        } else {
            Err(Error::InvalidFileType {
                declared: self.declared_type.clone(),
            })
        }
    }

    /// `Selected: <name> (<size>)`
    pub fn describe(&self) -> String {
        format!("Selected: {} ({})", self.name, format_file_size(self.size))
    }
}

impl FileContents {
    /// Read the raw bytes
    pub async fn read(self) -> Result<Vec<u8>> {
        match self {
            FileContents::Path(path) => Ok(tokio::fs::read(&path).await?),
            FileContents::Bytes(data) => Ok(data),
        }
    }
}

/// Declared MIME type for a path, by extension
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pdf") => PDF_MIME_TYPE,
        Some("txt") | Some("text") => "text/plain",
        Some("md") => "text/markdown",
        Some("html") | Some("htm") => "text/html",
        Some("json") => "application/json",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Human-readable size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2 MB`.
/// Values are rounded to two decimals; megabytes is the largest unit.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    let rounded = (scaled * 100.0).round() / 100.0;
    // `{}` on f64 already drops trailing zeros (2.50 -> 2.5, 2.00 -> 2)
    format!("{} {}", rounded, UNITS[unit])
}
