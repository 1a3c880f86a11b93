//! Error types for the stacks library.
//!
//! This module provides a single error type covering all failure modes of the
//! archive: structural errors (missing or colliding keys, occupied link
//! destinations), bibliographic parsing problems, and wrapped filesystem or
//! PDF errors.
//!
//! Structural errors abort the operation they occur in and are surfaced to
//! the caller as typed failures. Per-item errors encountered while iterating
//! a batch (link repair, text extraction during a search) are collected and
//! reported per item instead; see [`crate::archive::FixLinks`] and
//! [`crate::archive::SearchResults`].

use thiserror::Error;

use super::*;

/// Error type alias used for the [`stacks`](crate) crate.
pub type Result<T> = core::result::Result<T, StacksError>;

/// Errors that can occur when working with the archive.
///
/// Most variants carry the key or path involved so failures can be reported
/// without further context.
#[derive(Error, Debug)]
pub enum StacksError {
  /// The requested key is not present in the archive.
  ///
  /// Returned by lookups, rekeying, and link creation when the key directory
  /// does not exist.
  #[error("Key `{0}` was not found in the archive")]
  NotFound(String),

  /// The archive already contains a directory for this key.
  ///
  /// Returned by `add` and `rekey` to prevent silently overwriting an
  /// existing document.
  #[error("The archive already contains key `{0}`")]
  DuplicateKey(String),

  /// A bibliographic source contained more than one record.
  ///
  /// The archive supports exactly one record per document, so an `add` from
  /// a multi-record file is rejected before anything is written. The
  /// parameter lists every key found, for debugging.
  #[error("Bibliographic source contains more than one record: {0:?}")]
  AmbiguousKey(Vec<String>),

  /// A link destination is already occupied.
  ///
  /// Links and bookmarks never overwrite existing paths, including existing
  /// broken symlinks.
  #[error("Destination `{0}` already exists")]
  AlreadyExists(PathBuf),

  /// Link repair was attempted on something that is not a symbolic link.
  #[error("`{0}` is not a symbolic link")]
  NotALink(PathBuf),

  /// A bibliographic record could not be parsed.
  ///
  /// This covers malformed record syntax: unterminated entries, missing
  /// keys, or unbalanced braces in field values.
  #[error("Malformed bibliography: {0}")]
  Bibliography(String),

  /// The library configuration is missing or invalid.
  #[error("{0}")]
  Config(String),

  /// A filesystem operation failed.
  ///
  /// This wraps OS-level errors (permissions, missing files) from any of the
  /// archive's file operations.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A configuration file could not be deserialized.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// PDF parsing failed during text extraction.
  ///
  /// Note that extraction failures during a search are reported per
  /// document, not raised through this variant; see
  /// [`crate::archive::SearchResults::extraction_failures`].
  #[error(transparent)]
  Pdf(#[from] lopdf::Error),

  /// A free-text search pattern was not a valid regular expression.
  #[error(transparent)]
  InvalidRegex(#[from] regex::Error),
}
