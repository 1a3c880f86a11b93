//! Canonical file locations for an archived key.
//!
//! Given an archive root and a key, [`DocumentPaths`] deterministically
//! resolves every location the archive uses for that key. Resolution is pure
//! path construction; callers are responsible for existence checks.

use super::*;

/// The canonical set of locations for one key.
///
/// ```text
/// <archive_root>/<key>/              key_dir
/// <archive_root>/<key>/<key>.pdf     pdf
/// <archive_root>/<key>/<key>.bib     bib
/// <archive_root>/<key>/.meta/        metadata_dir
/// <archive_root>/<key>/.meta/tags    tags
/// <archive_root>/<key>/.meta/text    text_cache
/// ```
///
/// The layout is preserved bit-for-bit for interoperability with hand-edited
/// archives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPaths {
  /// The key's own directory.
  key_dir:      PathBuf,
  /// Primary content file.
  pdf:          PathBuf,
  /// Bibliographic record file.
  bib:          PathBuf,
  /// Directory for metadata not part of the bibliographic record.
  metadata_dir: PathBuf,
  /// User-assigned tags, one per line.
  tags:         PathBuf,
  /// Cached extracted PDF text.
  text_cache:   PathBuf,
}

impl DocumentPaths {
  /// Resolves all locations for `key` under `archive_root`.
  pub fn new(archive_root: impl AsRef<Path>, key: &str) -> Self {
    let key_dir = archive_root.as_ref().join(key);
    let metadata_dir = key_dir.join(".meta");
    Self {
      pdf: key_dir.join(format!("{key}.pdf")),
      bib: key_dir.join(format!("{key}.bib")),
      tags: metadata_dir.join("tags"),
      text_cache: metadata_dir.join("text"),
      key_dir,
      metadata_dir,
    }
  }

  /// The key's own directory.
  pub fn key_dir(&self) -> &Path { &self.key_dir }

  /// Primary content file (`<key>.pdf`).
  pub fn pdf(&self) -> &Path { &self.pdf }

  /// Bibliographic record file (`<key>.bib`).
  pub fn bib(&self) -> &Path { &self.bib }

  /// Metadata directory (`.meta/`).
  pub fn metadata_dir(&self) -> &Path { &self.metadata_dir }

  /// Tag file inside the metadata directory.
  pub fn tags(&self) -> &Path { &self.tags }

  /// Extracted-text cache inside the metadata directory.
  pub fn text_cache(&self) -> &Path { &self.text_cache }
}
