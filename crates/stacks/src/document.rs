//! A single archived document.
//!
//! A [`Document`] is identity plus resolved locations; everything else is
//! read live from the archive. The bibliographic record is re-parsed on each
//! access so that hand edits to the `.bib` file are always visible, and
//! timestamps come straight from filesystem metadata. The only thing that
//! persists between runs is the extracted-text cache under `.meta/`.

use std::io::Read;

use super::*;

/// One archived reference document.
///
/// Constructed by the archive store; the key is immutable for the life of
/// the value (rekeying destroys the old identity and creates a new one).
#[derive(Debug, Clone)]
pub struct Document {
  /// Globally unique key, equal to the bibliographic record's identifier at
  /// the time the document was archived or last rekeyed.
  key:   String,
  /// Canonical locations for this key.
  paths: DocumentPaths,
}

impl Document {
  /// Binds a key to its resolved locations.
  pub(crate) fn new(key: impl Into<String>, paths: DocumentPaths) -> Self {
    Self { key: key.into(), paths }
  }

  /// The document's unique key.
  pub fn key(&self) -> &str { &self.key }

  /// Resolved file locations for this document.
  pub fn paths(&self) -> &DocumentPaths { &self.paths }

  /// Reads and parses the bibliographic record.
  ///
  /// The record is never cached; each call reflects the file's current
  /// contents.
  pub fn entry(&self) -> Result<bibliography::Entry> {
    let raw = fs::read_to_string(self.paths.bib())?;
    bibliography::single_entry(&raw)
  }

  /// The raw bibliographic record text.
  pub fn bibtex(&self) -> Result<String> { Ok(fs::read_to_string(self.paths.bib())?) }

  /// When the document was added, from the primary file's creation time
  /// (falling back to its modification time where creation time is not
  /// tracked).
  pub fn added(&self) -> Result<DateTime<Utc>> {
    let metadata = fs::metadata(self.paths.pdf())?;
    let time = metadata.created().or_else(|_| metadata.modified())?;
    Ok(time.into())
  }

  /// When the document was last read, from the primary file's access time.
  pub fn accessed(&self) -> Result<DateTime<Utc>> {
    Ok(fs::metadata(self.paths.pdf())?.accessed()?.into())
  }

  /// Touches the access timestamp by reading from the primary file.
  pub fn access(&self) -> Result<()> {
    let mut file = fs::File::open(self.paths.pdf())?;
    let mut buffer = [0u8; 1];
    let _ = file.read(&mut buffer)?;
    Ok(())
  }

  /// The document's user-assigned tags.
  ///
  /// An absent tag file is an empty set, not an error.
  pub fn tags(&self) -> Result<BTreeSet<String>> {
    if !self.paths.tags().exists() {
      return Ok(BTreeSet::new());
    }
    let raw = fs::read_to_string(self.paths.tags())?;
    Ok(raw.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect())
  }

  /// Replaces the document's tag set, creating the metadata directory if
  /// needed.
  pub fn write_tags(&self, tags: &BTreeSet<String>) -> Result<()> {
    fs::create_dir_all(self.paths.metadata_dir())?;
    let mut contents = tags.iter().cloned().collect::<Vec<_>>().join("\n");
    contents.push('\n');
    fs::write(self.paths.tags(), contents)?;
    Ok(())
  }

  /// Adds a single tag.
  pub fn add_tag(&self, tag: &str) -> Result<()> {
    let mut tags = self.tags()?;
    tags.insert(tag.to_string());
    self.write_tags(&tags)
  }

  /// Removes a single tag; removing an absent tag is a no-op.
  pub fn remove_tag(&self, tag: &str) -> Result<()> {
    let mut tags = self.tags()?;
    tags.remove(tag);
    self.write_tags(&tags)
  }

  /// The document's extracted text, with a flag telling whether it was
  /// freshly computed on this call.
  ///
  /// On the first successful extraction the text is cached under `.meta/`
  /// and `(Some(text), true)` is returned; later calls read the cache and
  /// return `(Some(text), false)`. Extraction failure yields `(None, false)`
  /// — a failure is surfaced to the caller, never treated as empty text, and
  /// is retried on the next call rather than cached.
  pub fn text(&self) -> Result<(Option<String>, bool)> {
    if self.paths.text_cache().exists() {
      return Ok((Some(fs::read_to_string(self.paths.text_cache())?), false));
    }

    match pdf::extract_text(self.paths.pdf()) {
      Ok(text) => {
        fs::create_dir_all(self.paths.metadata_dir())?;
        fs::write(self.paths.text_cache(), &text)?;
        Ok((Some(text), true))
      },
      Err(e) => {
        warn!(key = %self.key, error = %e, "text extraction failed");
        Ok((None, false))
      },
    }
  }
}
