//! Plain-text summaries of search results.
//!
//! The core performs no terminal formatting, coloring, or wrapping; these
//! helpers produce plain strings for a caller (such as a CLI layer) to style
//! as it sees fit.

use super::*;
use crate::archive::{SearchHit, SearchResults};

/// A one-line match-count message: `` `key`: N match(es)``.
pub fn count_line(key: &str, count: usize) -> String {
  if count == 1 {
    format!("{key}: 1 match")
  } else {
    format!("{key}: {count} matches")
  }
}

/// Summarizes one hit at the given verbosity.
///
/// - `0`: the key, with the match count when non-zero
/// - `1`: title, year, key, match count, and authors
/// - `2`: as `1`, plus the venue when the record has one
pub fn summarize(hit: &SearchHit, verbosity: u8) -> Result<String> {
  let entry = hit.document.entry()?;
  let key = hit.document.key();

  let count_phrase =
    if hit.count > 0 { format!(" (matches = {})", hit.count) } else { String::new() };

  if verbosity == 0 {
    return Ok(format!("{key}{count_phrase}"));
  }

  let title = entry.fields.get("title").map(String::as_str).unwrap_or(key);
  let year = entry.fields.get("year").map(String::as_str).unwrap_or("????");
  let author = entry.fields.get("author").map(String::as_str).unwrap_or("");

  let mut summary = format!("{title}\n{year} ({key}){count_phrase}\n{author}");
  if verbosity >= 2 {
    if let Some(venue) = entry.venue() {
      summary.push('\n');
      summary.push_str(venue);
    }
  }
  Ok(summary)
}

/// Summarizes a whole result set: one line per hit at verbosity `0`, blocks
/// separated by blank lines otherwise. An empty result set yields an empty
/// string.
pub fn summarize_results(results: &SearchResults, verbosity: u8) -> Result<String> {
  let mut summaries = Vec::with_capacity(results.hits.len());
  for hit in &results.hits {
    summaries.push(summarize(hit, verbosity)?);
  }
  let separator = if verbosity > 0 { "\n\n" } else { "\n" };
  Ok(summaries.join(separator))
}
