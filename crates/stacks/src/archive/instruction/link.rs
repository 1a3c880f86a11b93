//! Symlink bookmarks, shelves, and link repair.
//!
//! Links are independent filesystem objects pointing at a key's directory
//! inside the archive; nothing ties their lifecycle to the document they
//! reference. When the archive moves or a key is renamed, links break —
//! [`FixLink`] and [`FixLinks`] detect and repair them by re-resolving the
//! key from the stale target's basename.
//!
//! This module uses Unix symbolic links and is only available on Unix
//! platforms.

use std::os::unix::fs::symlink;

use super::*;

/// Creates a symlink to a key's directory in the archive.
///
/// The destination defaults to the key's name in the current working
/// directory. An occupied destination (including an existing broken
/// symlink) is never overwritten.
///
/// # Examples
///
/// ```no_run
/// use stacks::{archive::Link, prelude::*, Archive};
///
/// # fn example(archive: &Archive) -> Result<(), StacksError> {
/// // ./smith2020 -> <archive>/smith2020
/// Link::new("smith2020").execute(archive)?;
///
/// // ./paper -> <archive>/smith2020
/// Link::new("smith2020").at("./paper").execute(archive)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Link {
  /// Key to link to.
  key:         String,
  /// Where to create the link; defaults to `./<key>`.
  destination: Option<PathBuf>,
}

impl Link {
  /// Creates a link instruction with the default destination.
  pub fn new(key: impl Into<String>) -> Self { Self { key: key.into(), destination: None } }

  /// Sets the link destination. Relative paths are resolved against the
  /// current working directory.
  pub fn at(mut self, destination: impl Into<PathBuf>) -> Self {
    self.destination = Some(destination.into());
    self
  }
}

impl ArchiveInstruction for Link {
  type Output = PathBuf;

  fn execute(&self, archive: &Archive) -> Result<PathBuf> {
    let document = archive.get(&self.key)?;

    let destination = match &self.destination {
      Some(path) if path.is_absolute() => path.clone(),
      Some(path) => std::env::current_dir()?.join(path),
      None => std::env::current_dir()?.join(&self.key),
    };

    // symlink_metadata so an existing broken link also counts as occupied.
    if destination.symlink_metadata().is_ok() {
      return Err(StacksError::AlreadyExists(destination));
    }

    symlink(document.paths().key_dir(), &destination)?;
    debug!(key = %self.key, destination = %destination.display(), "created link");
    Ok(destination)
  }
}

/// Creates a named symlink to a key in the library's bookmarks directory.
///
/// The bookmarks directory is created on first use. The bookmark name
/// defaults to the key itself.
#[derive(Debug)]
pub struct Bookmark {
  /// Key to bookmark.
  key:  String,
  /// Bookmark name; defaults to the key.
  name: Option<String>,
}

impl Bookmark {
  /// Creates a bookmark instruction named after the key.
  pub fn new(key: impl Into<String>) -> Self { Self { key: key.into(), name: None } }

  /// Sets the bookmark name.
  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }
}

impl ArchiveInstruction for Bookmark {
  type Output = PathBuf;

  fn execute(&self, archive: &Archive) -> Result<PathBuf> {
    let bookmarks = archive.config().bookmarks();
    if !bookmarks.is_dir() {
      fs::create_dir_all(&bookmarks)?;
      debug!(path = %bookmarks.display(), "created bookmarks directory");
    }

    let name = self.name.as_deref().unwrap_or(&self.key);
    Link::new(self.key.as_str()).at(bookmarks.join(name)).execute(archive)
  }
}

/// Per-link outcome of a repair attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
  /// The link now points at the given current archive location.
  Fixed(PathBuf),
  /// The key resolved from the link's target is not in the archive; the
  /// link was left untouched.
  MissingKey(String),
}

/// Repairs one symlink that has gone stale because the archive moved.
///
/// The key is taken from the final path component of the link's current
/// target. A key that is no longer in the archive is a reported, non-fatal
/// outcome ([`FixOutcome::MissingKey`]) — the whole point of this operation
/// is to run over many possibly-stale links.
///
/// Repair is remove-then-recreate: a crash between the two steps leaves the
/// link absent. This is an accepted, documented risk.
///
/// Applying `FixLink` to an already-valid link is idempotent.
#[derive(Debug)]
pub struct FixLink {
  /// The symlink to repair.
  path: PathBuf,
}

impl FixLink {
  /// Creates a repair instruction for `path`.
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }
}

impl ArchiveInstruction for FixLink {
  type Output = FixOutcome;

  fn execute(&self, archive: &Archive) -> Result<FixOutcome> {
    let metadata =
      fs::symlink_metadata(&self.path).map_err(|_| StacksError::NotALink(self.path.clone()))?;
    if !metadata.file_type().is_symlink() {
      return Err(StacksError::NotALink(self.path.clone()));
    }

    let target = fs::read_link(&self.path)?;
    let key = target
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .ok_or_else(|| StacksError::NotALink(self.path.clone()))?;

    if !archive.contains(&key) {
      warn!(link = %self.path.display(), key = %key, "link does not point to an archived key");
      return Ok(FixOutcome::MissingKey(key));
    }

    let current = archive.get(&key)?.paths().key_dir().to_path_buf();

    // Remove-then-recreate; not transactional.
    fs::remove_file(&self.path)?;
    symlink(&current, &self.path)?;
    debug!(link = %self.path.display(), target = %current.display(), "repaired link");
    Ok(FixOutcome::Fixed(current))
  }
}

/// Repairs every symlink directly inside a directory (non-recursive).
///
/// Individual failures do not stop the batch; each link's outcome is
/// reported alongside its path.
#[derive(Debug)]
pub struct FixLinks {
  /// Directory to scan for symlinks.
  directory: PathBuf,
}

impl FixLinks {
  /// Creates a batch repair instruction for `directory`.
  pub fn new(directory: impl Into<PathBuf>) -> Self { Self { directory: directory.into() } }
}

impl ArchiveInstruction for FixLinks {
  type Output = Vec<(PathBuf, Result<FixOutcome>)>;

  fn execute(&self, archive: &Archive) -> Result<Self::Output> {
    let mut report = Vec::new();
    for entry in fs::read_dir(&self.directory)? {
      let entry = entry?;
      let path = entry.path();
      let Ok(metadata) = fs::symlink_metadata(&path) else { continue };
      if !metadata.file_type().is_symlink() {
        continue;
      }
      let outcome = FixLink::new(&path).execute(archive);
      report.push((path, outcome));
    }
    Ok(report)
  }
}
