//! Reference document text extraction for the research step.
//!
//! A [`DocumentReader`] turns a supplied document into plain text, one page
//! after another with a newline after each page. Readers fail explicitly
//! with a [`DocumentError`]; "no document supplied" is expressed by the
//! caller choosing [`ResearchSource::Embedded`] instead, never by an error.

use std::path::{Path, PathBuf};

use crate::error::DocumentError;

/// Page separator understood by [`PlainTextReader`].
pub const PAGE_BREAK: char = '\u{0c}';

/// Where research material comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResearchSource {
    /// The built-in sample question pack.
    #[default]
    Embedded,
    /// A user-supplied document.
    Document(PathBuf),
}

impl ResearchSource {
    /// Build a source from an optional document path.
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => ResearchSource::Document(p),
            None => ResearchSource::Embedded,
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self, ResearchSource::Document(_))
    }
}

/// Extracts plain text from a document.
pub trait DocumentReader: Send + Sync {
    /// Returns the concatenated text of every page.
    fn extract_text(&self, path: &Path) -> Result<String, DocumentError>;
}

fn ensure_exists(path: &Path) -> Result<(), DocumentError> {
    if path.exists() {
        Ok(())
    } else {
        Err(DocumentError::NotFound {
            path: path.display().to_string(),
        })
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Default reader: PDFs go to [`PdfReader`], everything else to
/// [`PlainTextReader`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDocumentReader;

impl DocumentReader for FileDocumentReader {
    fn extract_text(&self, path: &Path) -> Result<String, DocumentError> {
        match extension_of(path).as_deref() {
            Some("pdf") => PdfReader.extract_text(path),
            _ => PlainTextReader.extract_text(path),
        }
    }
}

/// Reader for PDF documents, one newline after each page's text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReader;

impl DocumentReader for PdfReader {
    fn extract_text(&self, path: &Path) -> Result<String, DocumentError> {
        ensure_exists(path)?;
        let path_str = path.display().to_string();

        let document = lopdf::Document::load(path).map_err(|e| DocumentError::Parse {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        let pages = document.get_pages();
        let mut text = String::new();
        for page_number in pages.keys() {
            match document.extract_text(&[*page_number]) {
                Ok(page_text) => text.push_str(page_text.trim_end()),
                // Image-only pages have nothing to contribute.
                Err(e) => {
                    tracing::debug!(path = %path_str, page = page_number, error = %e, "Skipping page without text");
                }
            }
            text.push('\n');
        }

        if text.trim().is_empty() {
            return Err(DocumentError::Empty { path: path_str });
        }

        tracing::debug!(path = %path_str, pages = pages.len(), chars = text.len(), "Extracted PDF text");
        Ok(text)
    }
}

/// Reader for plain-text documents (`.txt`, `.md`, `.text`, or no extension).
///
/// Pages are separated by form feeds, as produced by `pdftotext`; the
/// output has a newline after each page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextReader;

impl PlainTextReader {
    const SUPPORTED: [&'static str; 3] = ["txt", "md", "text"];
}

impl DocumentReader for PlainTextReader {
    fn extract_text(&self, path: &Path) -> Result<String, DocumentError> {
        ensure_exists(path)?;
        let path_str = path.display().to_string();

        if let Some(ext) = extension_of(path) {
            if !Self::SUPPORTED.contains(&ext.as_str()) {
                return Err(DocumentError::UnsupportedType {
                    path: path_str,
                    extension: ext,
                });
            }
        }

        let raw = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path_str.clone(),
            source,
        })?;

        let mut text = String::with_capacity(raw.len() + 1);
        for page in raw.split(PAGE_BREAK) {
            text.push_str(page);
            text.push('\n');
        }

        if text.trim().is_empty() {
            return Err(DocumentError::Empty { path: path_str });
        }

        tracing::debug!(path = %path_str, chars = text.len(), "Extracted document text");
        Ok(text)
    }
}
