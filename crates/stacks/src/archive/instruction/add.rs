//! Adding a document to the archive.

use super::*;

/// Archives a PDF and its bibliographic record under the key found in the
/// record.
///
/// The key directory is created and both source files are copied (or moved,
/// with [`Add::consume_sources`]) into their canonical locations.
///
/// The two file operations are not atomic as a pair: if the second fails
/// after the first succeeds, the key directory is left partially populated
/// and the failure is surfaced as [`StacksError::Io`]. No rollback is
/// attempted; a failed add needs manual inspection.
///
/// # Examples
///
/// ```no_run
/// use stacks::{archive::Add, prelude::*, Archive};
///
/// # fn example(archive: &Archive) -> Result<(), StacksError> {
/// // Copy the sources into the archive.
/// let document = Add::new("paper.pdf", "paper.bib").execute(archive)?;
///
/// // Or move them, for a destructive import.
/// let document = Add::new("other.pdf", "other.bib").consume_sources().execute(archive)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Add {
  /// Source PDF file.
  pdf:     PathBuf,
  /// Source bibliographic record file; must contain exactly one record.
  bib:     PathBuf,
  /// Move the sources instead of copying them.
  consume: bool,
}

impl Add {
  /// Creates an add instruction that copies the given sources.
  pub fn new(pdf: impl Into<PathBuf>, bib: impl Into<PathBuf>) -> Self {
    Self { pdf: pdf.into(), bib: bib.into(), consume: false }
  }

  /// Moves the source files into the archive instead of copying them.
  pub fn consume_sources(mut self) -> Self {
    self.consume = true;
    self
  }
}

impl ArchiveInstruction for Add {
  type Output = Document;

  #[instrument(skip(self, archive), fields(pdf = %self.pdf.display(), bib = %self.bib.display()))]
  fn execute(&self, archive: &Archive) -> Result<Document> {
    let raw = fs::read_to_string(&self.bib)?;
    let entry = bibliography::single_entry(&raw)?;
    let key = entry.key;

    if archive.contains(&key) {
      return Err(StacksError::DuplicateKey(key));
    }

    let paths = DocumentPaths::new(archive.config().archive(), &key);
    fs::create_dir(paths.key_dir())?;
    fs::create_dir(paths.metadata_dir())?;

    // Two separate file operations; a failure on the second leaves the
    // first's effects in place.
    if self.consume {
      move_file(&self.pdf, paths.pdf())?;
      move_file(&self.bib, paths.bib())?;
    } else {
      fs::copy(&self.pdf, paths.pdf())?;
      fs::copy(&self.bib, paths.bib())?;
    }

    debug!(key = %key, "archived document");
    Ok(Document::new(key, paths))
  }
}

/// Moves a file, falling back to copy-and-remove across filesystems.
pub(crate) fn move_file(src: &Path, dest: &Path) -> Result<()> {
  match fs::rename(src, dest) {
    Ok(()) => Ok(()),
    Err(_) => {
      fs::copy(src, dest)?;
      fs::remove_file(src)?;
      Ok(())
    },
  }
}
