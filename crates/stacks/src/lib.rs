//! Personal archive management for reference documents.
//!
//! `stacks` manages a directory tree of archived PDF documents and their
//! bibliographic records, providing:
//!
//! - A plain, human-inspectable on-disk archive (one directory per key)
//! - Multi-field filtering combined with free-text regex search
//! - Match counting used both for reporting and for ranking
//! - Symlink bookmarks and shelves, with detection and repair of links that
//!   break when the archive moves
//!
//! # Archive layout
//!
//! Every archived document lives in its own subdirectory of the archive root,
//! named by its unique key (derived from the bibliographic record's
//! identifier):
//!
//! ```text
//! archive/
//!   smith2020/
//!     smith2020.pdf
//!     smith2020.bib
//!     .meta/          (tags, extracted-text cache)
//! ```
//!
//! The directory tree is the single source of truth. It can be edited by hand
//! at any time; `stacks` re-reads bibliographic records lazily and never
//! caches them across runs (only extracted PDF text is cached, under
//! `.meta/`).
//!
//! # Getting started
//!
//! ```no_run
//! use stacks::{
//!   archive::{Add, Query, Search, SortKey},
//!   prelude::*,
//!   Archive, Config,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   // Open an existing library, or `Archive::init` to create one.
//!   let archive = Archive::open(Config::from_file(Config::default_path())?)?;
//!
//!   // Archive a document under the key found in its bibliography.
//!   let document = Add::new("paper.pdf", "paper.bib").execute(&archive)?;
//!   println!("Archived as {}", document.key());
//!
//!   // Search titles, fields, and extracted text, newest first.
//!   let query = Query::all().with_pattern("neural", false)?;
//!   let results = Search::new(query).sort_by(SortKey::Year).execute(&archive)?;
//!   for hit in &results.hits {
//!     println!("{}: {} matches", hit.document.key(), hit.count);
//!   }
//!   Ok(())
//! }
//! ```
//!
//! # Module organization
//!
//! - [`archive`]: The archive store and its operations (add, rekey, search,
//!   link, bookmark, link repair)
//! - [`document`]: A single archived document and its metadata
//! - [`bibliography`]: Bibliographic record parsing and writing
//! - [`paths`]: Canonical file locations for a key
//! - [`pdf`]: PDF text extraction
//! - [`config`]: Library configuration
//! - [`format`]: Plain-text result summaries
//!
//! # Concurrency
//!
//! All operations are synchronous and assume a single active process against
//! the library. Concurrent invocations racing on `add` or `rekey` for the
//! same key are a known, accepted hazard; last-writer effects are
//! filesystem-dependent.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::{BTreeMap, BTreeSet},
  fs,
  path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod archive;
pub mod bibliography;
pub mod config;
pub mod document;
pub mod error;
pub mod format;
pub mod paths;
pub mod pdf;

use crate::error::*;
pub use crate::{archive::Archive, config::Config, document::Document, paths::DocumentPaths};

/// Common traits and types for ergonomic imports.
///
/// Brings the instruction trait and the crate error type into scope with a
/// single glob import:
///
/// ```no_run
/// use stacks::{archive::Add, prelude::*, Archive, Config};
///
/// fn example(archive: &Archive) -> Result<(), StacksError> {
///   let document = Add::new("paper.pdf", "paper.bib").execute(archive)?;
///   println!("{}", document.key());
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{archive::ArchiveInstruction, error::StacksError};
}
