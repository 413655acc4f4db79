//! Source resolution for selected files

pub mod resolver;

pub use resolver::{format_file_size, mime_type_for, FileContents, SelectedFile, PDF_MIME_TYPE};
