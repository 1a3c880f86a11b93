//! Filtering, matching, and searching the archive.
//!
//! [`Query`] is the match/filter engine: it evaluates structured field
//! predicates and an optional free-text regex against one document,
//! producing a boolean match and a match count. [`Search`] is the
//! orchestrator: it runs a query over every document in the archive, then
//! sorts, truncates, and returns the results.

use regex::{Regex, RegexBuilder};

use super::*;

/// What a free-text pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
  /// Bibliographic field values only.
  Bibliography,
  /// Extracted document text only.
  Text,
  /// Both bibliographic fields and extracted text (the default).
  #[default]
  Both,
}

impl Scope {
  /// Whether bibliographic fields are scanned.
  fn bibliography(self) -> bool { matches!(self, Scope::Bibliography | Scope::Both) }

  /// Whether extracted text is scanned.
  fn text(self) -> bool { matches!(self, Scope::Text | Scope::Both) }
}

/// Result of evaluating a [`Query`] against one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
  /// Whether the document satisfies the query.
  pub matched:           bool,
  /// Total non-overlapping pattern matches across every scanned field and
  /// the extracted text. Zero when the query has no pattern.
  pub count:             usize,
  /// Whether text extraction failed for this document while the query's
  /// scope included document text.
  pub extraction_failed: bool,
}

impl Match {
  /// A failed structured predicate: no match, nothing counted.
  const fn none() -> Self { Self { matched: false, count: 0, extraction_failed: false } }
}

/// An ephemeral filter specification.
///
/// All supplied predicates are combined with logical AND; an absent
/// predicate is vacuously true. `key`, `year`, and `entry-type` compare
/// exactly (entry-type ignoring case); `title`, `author`, and `venue` are
/// case-insensitive substring matches; the tag predicate requires every
/// requested tag to be present.
///
/// # Examples
///
/// ```no_run
/// use stacks::archive::{Query, Scope};
///
/// # fn example() -> Result<(), stacks::error::StacksError> {
/// let query = Query::all()
///   .with_author("smith")
///   .with_year("2020")
///   .with_pattern("neural", false)?
///   .in_scope(Scope::Bibliography);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
  /// Exact key predicate.
  key:     Option<String>,
  /// Case-insensitive title substring predicate.
  title:   Option<String>,
  /// Case-insensitive author substring predicate.
  author:  Option<String>,
  /// Exact year predicate.
  year:    Option<String>,
  /// Case-insensitive venue substring predicate.
  venue:   Option<String>,
  /// Entry-type predicate (case-insensitive exact).
  kind:    Option<String>,
  /// Tags that must all be present.
  tags:    Vec<String>,
  /// Free-text pattern.
  pattern: Option<Regex>,
  /// Where the pattern is applied.
  scope:   Scope,
}

impl Query {
  /// A query with no predicates; matches every document.
  pub fn all() -> Self { Self::default() }

  /// Requires the document key to equal `key`.
  pub fn with_key(mut self, key: impl Into<String>) -> Self {
    self.key = Some(key.into());
    self
  }

  /// Requires the title to contain `title` (case-insensitive).
  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = Some(title.into());
    self
  }

  /// Requires the author list to contain `author` (case-insensitive).
  pub fn with_author(mut self, author: impl Into<String>) -> Self {
    self.author = Some(author.into());
    self
  }

  /// Requires the year field to equal `year`.
  pub fn with_year(mut self, year: impl Into<String>) -> Self {
    self.year = Some(year.into());
    self
  }

  /// Requires the venue to contain `venue` (case-insensitive).
  pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
    self.venue = Some(venue.into());
    self
  }

  /// Requires the entry type to equal `kind` (case-insensitive).
  pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
    self.kind = Some(kind.into());
    self
  }

  /// Requires `tag` to be present; may be called repeatedly.
  pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
    self.tags.push(tag.into());
    self
  }

  /// Sets the free-text pattern.
  ///
  /// Matching is case-insensitive unless `case_sensitive` is set. Returns
  /// [`StacksError::InvalidRegex`] if `pattern` is not a valid regular
  /// expression.
  pub fn with_pattern(mut self, pattern: &str, case_sensitive: bool) -> Result<Self> {
    self.pattern =
      Some(RegexBuilder::new(pattern).case_insensitive(!case_sensitive).build()?);
    Ok(self)
  }

  /// Narrows where the free-text pattern is applied (default:
  /// [`Scope::Both`]).
  pub fn in_scope(mut self, scope: Scope) -> Self {
    self.scope = scope;
    self
  }

  /// Evaluates this query against one document.
  ///
  /// Structured predicates are evaluated first; any failure short-circuits
  /// to a no-match with count zero. The pattern, if present, is then counted
  /// across the configured scope. When the scope includes document text and
  /// extraction fails, the document contributes zero text matches and the
  /// failure is flagged on the returned [`Match`].
  ///
  /// Has no effect on the document's persisted state beyond the text cache
  /// populated by [`Document::text`].
  pub fn matches(&self, document: &Document) -> Result<Match> {
    let entry = document.entry()?;

    if let Some(key) = &self.key {
      if document.key() != key {
        return Ok(Match::none());
      }
    }
    if let Some(year) = &self.year {
      if entry.fields.get("year").map(String::as_str) != Some(year.as_str()) {
        return Ok(Match::none());
      }
    }
    if let Some(kind) = &self.kind {
      if !entry.kind.eq_ignore_ascii_case(kind) {
        return Ok(Match::none());
      }
    }
    for (predicate, value) in [
      (&self.title, entry.fields.get("title").map(String::as_str)),
      (&self.author, entry.fields.get("author").map(String::as_str)),
      (&self.venue, entry.venue()),
    ] {
      if let Some(needle) = predicate {
        let haystack = value.unwrap_or_default().to_lowercase();
        if !haystack.contains(&needle.to_lowercase()) {
          return Ok(Match::none());
        }
      }
    }
    if !self.tags.is_empty() {
      let tags = document.tags()?;
      if !self.tags.iter().all(|tag| tags.contains(tag)) {
        return Ok(Match::none());
      }
    }

    // All structured predicates passed; without a pattern that is a match.
    let Some(pattern) = &self.pattern else {
      return Ok(Match { matched: true, count: 0, extraction_failed: false });
    };

    let mut count = 0;
    if self.scope.bibliography() {
      // The identifier is not among `fields`, so it is never scanned.
      for value in entry.fields.values() {
        count += pattern.find_iter(value).count();
      }
    }

    let mut extraction_failed = false;
    if self.scope.text() {
      match document.text()? {
        (Some(text), _) => count += pattern.find_iter(&text).count(),
        (None, _) => extraction_failed = true,
      }
    }

    Ok(Match { matched: count > 0, count, extraction_failed })
  }
}

/// Available keys for ordering search results.
///
/// `Key` and `Title` order ascending by default; every other key orders
/// descending by default (most recent or most matches first). The `reverse`
/// flag on [`Search`] flips whichever direction is natural for the chosen
/// key — so `reverse = false` with `SortKey::Year` yields newest-first, not
/// oldest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
  /// Lexicographic by key.
  Key,
  /// Case-folded lexicographic by title.
  Title,
  /// Numeric by year, falling back to lexicographic for non-numeric years.
  Year,
  /// By added timestamp.
  Added,
  /// By accessed timestamp.
  Accessed,
  /// By match count.
  Matches,
}

impl SortKey {
  /// Whether this key's natural direction is descending.
  fn natural_descending(self) -> bool { !matches!(self, SortKey::Key | SortKey::Title) }
}

/// Comparable sort value computed per hit before sorting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
  /// Numeric year.
  Numeric(i64),
  /// Key, folded title, or non-numeric year.
  Text(String),
  /// Added or accessed timestamp.
  Time(DateTime<Utc>),
  /// Match count.
  Count(usize),
}

/// One matching document paired with its match count.
#[derive(Debug, Clone)]
pub struct SearchHit {
  /// The matching document.
  pub document: Document,
  /// Its match count (zero when the query had no pattern).
  pub count:    usize,
}

/// Everything a search run produced.
#[derive(Debug, Clone)]
pub struct SearchResults {
  /// Matching documents in final order.
  pub hits:                Vec<SearchHit>,
  /// Keys whose text extraction failed during a text-scope search, reported
  /// once per run. These documents were still evaluated; they contributed
  /// zero matches to the text scope.
  pub extraction_failures: Vec<String>,
}

/// Runs a [`Query`] over the whole archive, then sorts and truncates.
///
/// An empty result set is a valid outcome, not an error.
///
/// Without a sort key, results are in enumeration order, which is
/// unspecified — a limited search without a sort key is therefore
/// non-deterministic.
///
/// # Examples
///
/// ```no_run
/// use stacks::{
///   archive::{Query, Search, SortKey},
///   prelude::*,
///   Archive,
/// };
///
/// # fn example(archive: &Archive) -> Result<(), StacksError> {
/// // The ten most relevant documents mentioning neural networks.
/// let query = Query::all().with_pattern("neural", false)?;
/// let results = Search::new(query).sort_by(SortKey::Matches).limit(10).execute(archive)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Search {
  /// The filter to evaluate per document.
  query:   Query,
  /// Sort key, if any.
  sort:    Option<SortKey>,
  /// Maximum number of results to keep after sorting.
  limit:   Option<usize>,
  /// Flips the sort key's natural direction.
  reverse: bool,
}

impl Search {
  /// Creates a search for the given query, unsorted and unlimited.
  pub fn new(query: Query) -> Self { Self { query, sort: None, limit: None, reverse: false } }

  /// Sorts results by `key`.
  pub fn sort_by(mut self, key: SortKey) -> Self {
    self.sort = Some(key);
    self
  }

  /// Keeps only the first `limit` results after sorting.
  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }

  /// Flips the sort key's natural direction.
  pub fn reversed(mut self) -> Self {
    self.reverse = true;
    self
  }
}

impl ArchiveInstruction for Search {
  type Output = SearchResults;

  #[instrument(skip(self, archive), level = "debug")]
  fn execute(&self, archive: &Archive) -> Result<SearchResults> {
    let mut hits = Vec::new();
    let mut extraction_failures = Vec::new();

    for document in archive.documents()? {
      let result = self.query.matches(&document)?;
      if result.extraction_failed {
        extraction_failures.push(document.key().to_string());
      }
      if result.matched {
        hits.push(SearchHit { document, count: result.count });
      }
    }

    if let Some(sort) = self.sort {
      let descending =
        if sort.natural_descending() { !self.reverse } else { self.reverse };

      let mut keyed = Vec::with_capacity(hits.len());
      for hit in hits {
        let value = match sort {
          SortKey::Key => SortValue::Text(hit.document.key().to_string()),
          SortKey::Title => SortValue::Text(
            hit.document.entry()?.fields.get("title").cloned().unwrap_or_default().to_lowercase(),
          ),
          SortKey::Year => {
            let year = hit.document.entry()?.fields.get("year").cloned().unwrap_or_default();
            match year.parse::<i64>() {
              Ok(numeric) => SortValue::Numeric(numeric),
              Err(_) => SortValue::Text(year),
            }
          },
          SortKey::Added => SortValue::Time(hit.document.added()?),
          SortKey::Accessed => SortValue::Time(hit.document.accessed()?),
          SortKey::Matches => SortValue::Count(hit.count),
        };
        keyed.push((value, hit));
      }

      // Stable sort: equal elements keep their pre-sort relative order in
      // either direction.
      keyed.sort_by(|a, b| {
        let ordering = a.0.cmp(&b.0);
        if descending {
          ordering.reverse()
        } else {
          ordering
        }
      });
      hits = keyed.into_iter().map(|(_, hit)| hit).collect();
    }

    if let Some(limit) = self.limit {
      hits.truncate(limit);
    }

    debug!(hits = hits.len(), failures = extraction_failures.len(), "search complete");
    Ok(SearchResults { hits, extraction_failures })
  }
}
