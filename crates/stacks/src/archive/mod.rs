//! The archive store and its operations.
//!
//! [`Archive`] owns the on-disk collection of documents: one subdirectory
//! per key under the configured archive root. Mutating and compound
//! operations (adding, rekeying, searching, linking) are expressed as
//! instruction structs implementing [`ArchiveInstruction`], one explicit
//! request type per operation.
//!
//! # Examples
//!
//! ```no_run
//! use stacks::{archive::Add, prelude::*, Archive, Config};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = Archive::init(Config::default().with_library("/tmp/library"))?;
//! let document = Add::new("paper.pdf", "paper.bib").execute(&archive)?;
//! assert!(archive.contains(document.key()));
//! # Ok(())
//! # }
//! ```

use super::*;

pub mod instruction;

pub use self::instruction::*;

/// Handle to an on-disk library of archived documents.
///
/// The handle holds no state beyond its configuration; every operation reads
/// the directory tree directly, so external edits to the archive are always
/// visible. The store is the single source of truth for key uniqueness: a
/// key is present iff its directory exists.
#[derive(Debug)]
pub struct Archive {
  /// Library locations this archive operates on.
  config: Config,
}

impl Archive {
  /// Opens an existing library.
  ///
  /// # Errors
  ///
  /// Returns [`StacksError::Config`] if the library root or any of its
  /// expected subdirectories is missing; use [`Archive::init`] to create a
  /// new library tree.
  pub fn open(config: Config) -> Result<Self> {
    for path in [config.library().to_path_buf(), config.archive(), config.shelves()] {
      if !path.is_dir() {
        return Err(StacksError::Config(format!("{} does not exist", path.display())));
      }
    }
    Ok(Self { config })
  }

  /// Creates the library tree (archive, shelves, and bookmarks directories)
  /// and returns a handle to it.
  ///
  /// Existing directories are left untouched, so `init` on an existing
  /// library is safe.
  pub fn init(config: Config) -> Result<Self> {
    for path in [config.archive(), config.shelves(), config.bookmarks()] {
      fs::create_dir_all(&path)?;
    }
    debug!(library = %config.library().display(), "initialized library tree");
    Ok(Self { config })
  }

  /// The configuration this archive was opened with.
  pub fn config(&self) -> &Config { &self.config }

  /// Returns true iff `key` is present in the archive.
  pub fn contains(&self, key: &str) -> bool { self.config.archive().join(key).is_dir() }

  /// Enumerates every key in the archive.
  ///
  /// Order is filesystem-enumeration order and is NOT guaranteed sorted;
  /// callers needing determinism must sort explicitly.
  pub fn keys(&self) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    for entry in fs::read_dir(self.config.archive())? {
      let entry = entry?;
      if entry.file_type()?.is_dir() {
        keys.push(entry.file_name().to_string_lossy().into_owned());
      }
    }
    Ok(keys)
  }

  /// Returns every document in the archive, in [`Archive::keys`] order.
  pub fn documents(&self) -> Result<Vec<Document>> {
    let archive_root = self.config.archive();
    Ok(
      self
        .keys()?
        .into_iter()
        .map(|key| {
          let paths = DocumentPaths::new(&archive_root, &key);
          Document::new(key, paths)
        })
        .collect(),
    )
  }

  /// Returns the document for `key`.
  ///
  /// # Errors
  ///
  /// Returns [`StacksError::NotFound`] if the key is not present.
  pub fn get(&self, key: &str) -> Result<Document> {
    if !self.contains(key) {
      return Err(StacksError::NotFound(key.to_string()));
    }
    Ok(Document::new(key, DocumentPaths::new(self.config.archive(), key)))
  }

  /// Concatenates every document's raw bibliographic record into a single
  /// string, records separated by blank lines.
  pub fn compile_bibliography(&self) -> Result<String> {
    let mut records = Vec::new();
    for document in self.documents()? {
      records.push(document.bibtex()?.trim().to_string());
    }
    Ok(records.join("\n\n"))
  }
}
