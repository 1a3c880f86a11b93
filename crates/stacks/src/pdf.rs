//! PDF text extraction.
//!
//! Extraction is the only expensive operation in the archive, so its output
//! is cached per document (see [`Document::text`](crate::Document::text));
//! this module is just the uncached primitive.

use super::*;

/// Extracts the concatenated text of every page in the PDF at `path`.
///
/// # Errors
///
/// Returns [`StacksError::Pdf`] when the file cannot be parsed as a PDF or
/// its content streams cannot be decoded. Callers that treat extraction
/// failure as a per-document condition (text-scope search) map this to a
/// reported skip rather than propagating it.
#[instrument(level = "debug")]
pub fn extract_text(path: &Path) -> Result<String> {
  let document = lopdf::Document::load(path)?;
  let pages: Vec<u32> = document.get_pages().keys().copied().collect();
  let text = document.extract_text(&pages)?;
  debug!(chars = text.len(), pages = pages.len(), "extracted text");
  Ok(text)
}
