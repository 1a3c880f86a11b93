//! Changing the key of an archived document.

use super::*;

/// Renames a document's key, moving its files and rewriting the identifier
/// inside the bibliographic record to match.
///
/// When no new key is supplied with [`Rekey::to`], the key is re-derived
/// from the record's current identifier — this supports hand-editing the
/// `.bib` file and then asking the directory structure to follow.
///
/// Rekeying invalidates any symlink whose target was the old key directory.
/// Repair is the caller's responsibility, via
/// [`FixLink`](crate::archive::FixLink); it is not performed implicitly.
///
/// # Examples
///
/// ```no_run
/// use stacks::{archive::Rekey, prelude::*, Archive};
///
/// # fn example(archive: &Archive) -> Result<(), StacksError> {
/// // Explicit new key.
/// let new_key = Rekey::new("smith2020").to("smith2020a").execute(archive)?;
///
/// // Re-derive from the (possibly hand-edited) record identifier.
/// let new_key = Rekey::new("jones2019").execute(archive)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Rekey {
  /// The key to change.
  old_key: String,
  /// The replacement key; derived from the record when absent.
  new_key: Option<String>,
}

impl Rekey {
  /// Creates a rekey instruction that derives the new key from the
  /// bibliographic record.
  pub fn new(old_key: impl Into<String>) -> Self {
    Self { old_key: old_key.into(), new_key: None }
  }

  /// Sets an explicit new key.
  pub fn to(mut self, new_key: impl Into<String>) -> Self {
    self.new_key = Some(new_key.into());
    self
  }
}

impl ArchiveInstruction for Rekey {
  type Output = String;

  #[instrument(skip(self, archive), fields(old_key = %self.old_key))]
  fn execute(&self, archive: &Archive) -> Result<String> {
    let document = archive.get(&self.old_key)?;
    let old_paths = document.paths();

    let raw = fs::read_to_string(old_paths.bib())?;
    let mut entry = bibliography::single_entry(&raw)?;

    let new_key = self.new_key.clone().unwrap_or_else(|| entry.key.clone());
    if archive.contains(&new_key) {
      return Err(StacksError::DuplicateKey(new_key));
    }

    let new_paths = DocumentPaths::new(archive.config().archive(), &new_key);

    // Rename the content files within the old directory, then move the
    // directory itself under the new key.
    fs::rename(old_paths.pdf(), old_paths.key_dir().join(format!("{new_key}.pdf")))?;
    fs::rename(old_paths.bib(), old_paths.key_dir().join(format!("{new_key}.bib")))?;
    fs::rename(old_paths.key_dir(), new_paths.key_dir())?;

    entry.key = new_key.clone();
    fs::write(new_paths.bib(), entry.to_bibtex())?;

    debug!(old_key = %self.old_key, new_key = %new_key, "rekeyed document");
    Ok(new_key)
  }
}
