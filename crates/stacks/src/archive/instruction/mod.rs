//! Instruction types for archive operations.
//!
//! Each operation on the archive is one explicit request struct implementing
//! [`ArchiveInstruction`]: construct it, set options builder-style, and
//! `execute` it against an [`Archive`]. This keeps every operation's inputs
//! spelled out in its type rather than in a loosely-typed option bag.

use super::*;

pub mod add;
pub mod link;
pub mod query;
pub mod rekey;

pub use self::{
  add::Add,
  link::{Bookmark, FixLink, FixLinks, FixOutcome, Link},
  query::{Match, Query, Scope, Search, SearchHit, SearchResults, SortKey},
  rekey::Rekey,
};

/// A single executable operation against the archive.
pub trait ArchiveInstruction {
  /// What the operation produces on success.
  type Output;

  /// Runs the operation. Takes `&Archive` since the store keeps no
  /// in-memory state; all effects land on the filesystem.
  fn execute(&self, archive: &Archive) -> Result<Self::Output>;
}
