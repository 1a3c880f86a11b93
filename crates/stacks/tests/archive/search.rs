use std::fs;

use stacks::{
  archive::{Query, Scope, Search, SortKey},
  format,
  prelude::*,
};
use tempfile::tempdir;
use tracing_test::traced_test;

use crate::{add_sample, create_test_archive, sample_bib, write_sample_pdf, TestResult};

/// Keys of the hits, in result order.
fn keys(results: &stacks::archive::SearchResults) -> Vec<&str> {
  results.hits.iter().map(|hit| hit.document.key()).collect()
}

// Scenario: sorting by year with reverse = false yields newest first.
#[test]
#[traced_test]
fn test_year_sort_defaults_to_newest_first() -> TestResult<()> {
  let (archive, _dir) = create_test_archive();
  let sources = tempdir()?;

  add_sample(&archive, sources.path(), "jones2019", "2019", "Older Work", "text");
  add_sample(&archive, sources.path(), "smith2020", "2020", "Newer Work", "text");

  let results = Search::new(Query::all()).sort_by(SortKey::Year).execute(&archive)?;
  assert_eq!(keys(&results), vec!["smith2020", "jones2019"]);

  // The reverse flag flips the natural (descending) direction.
  let results = Search::new(Query::all()).sort_by(SortKey::Year).reversed().execute(&archive)?;
  assert_eq!(keys(&results), vec!["jones2019", "smith2020"]);

  Ok(())
}

// The asymmetry: the same reverse = false flag sorts titles ascending.
#[test]
#[traced_test]
fn test_title_sort_defaults_to_ascending() -> TestResult<()> {
  let (archive, _dir) = create_test_archive();
  let sources = tempdir()?;

  add_sample(&archive, sources.path(), "smith2020", "2020", "zebra stripes", "text");
  add_sample(&archive, sources.path(), "jones2019", "2019", "Aardvark Habits", "text");

  let results = Search::new(Query::all()).sort_by(SortKey::Title).execute(&archive)?;
  assert_eq!(keys(&results), vec!["jones2019", "smith2020"]);

  let results = Search::new(Query::all()).sort_by(SortKey::Title).reversed().execute(&archive)?;
  assert_eq!(keys(&results), vec!["smith2020", "jones2019"]);

  Ok(())
}

#[test]
#[traced_test]
fn test_key_sort_and_limit() -> TestResult<()> {
  let (archive, _dir) = create_test_archive();
  let sources = tempdir()?;

  add_sample(&archive, sources.path(), "baker2021", "2021", "B", "text");
  add_sample(&archive, sources.path(), "able2022", "2022", "A", "text");
  add_sample(&archive, sources.path(), "cole2020", "2020", "C", "text");

  let results = Search::new(Query::all()).sort_by(SortKey::Key).limit(2).execute(&archive)?;
  assert_eq!(keys(&results), vec!["able2022", "baker2021"]);

  Ok(())
}

#[test]
#[traced_test]
fn test_non_numeric_year_falls_back_to_lexicographic() -> TestResult<()> {
  let (archive, _dir) = create_test_archive();
  let sources = tempdir()?;

  add_sample(&archive, sources.path(), "a", "in press", "First", "text");
  add_sample(&archive, sources.path(), "b", "forthcoming", "Second", "text");

  // Descending by default: "in press" > "forthcoming" lexicographically.
  let results = Search::new(Query::all()).sort_by(SortKey::Year).execute(&archive)?;
  assert_eq!(keys(&results), vec!["a", "b"]);

  Ok(())
}

// Scenario: "neural" matched case-insensitively against a title holding
// "Neural Networks" and text holding "neural" twice counts three matches.
#[test]
#[traced_test]
fn test_match_counts_across_both_scopes() -> TestResult<()> {
  let (archive, _dir) = create_test_archive();
  let sources = tempdir()?;

  add_sample(
    &archive,
    sources.path(),
    "smith2020",
    "2020",
    "Neural Networks in Biology",
    "a study of neural structures and neural behavior",
  );

  let query = Query::all().with_pattern("neural", false)?;
  let results = Search::new(query).execute(&archive)?;
  assert_eq!(results.hits.len(), 1);
  assert_eq!(results.hits[0].count, 3);

  // Narrowing the scope splits the same counts.
  let query = Query::all().with_pattern("neural", false)?.in_scope(Scope::Bibliography);
  let results = Search::new(query).execute(&archive)?;
  assert_eq!(results.hits[0].count, 1);

  let query = Query::all().with_pattern("neural", false)?.in_scope(Scope::Text);
  let results = Search::new(query).execute(&archive)?;
  assert_eq!(results.hits[0].count, 2);

  Ok(())
}

#[test]
#[traced_test]
fn test_case_sensitive_pattern() -> TestResult<()> {
  let (archive, _dir) = create_test_archive();
  let sources = tempdir()?;

  add_sample(
    &archive,
    sources.path(),
    "smith2020",
    "2020",
    "Neural Networks in Biology",
    "a study of neural structures and neural behavior",
  );

  // Only the capitalized title occurrence survives a case-sensitive match.
  let query = Query::all().with_pattern("Neural", true)?;
  let results = Search::new(query).execute(&archive)?;
  assert_eq!(results.hits.len(), 1);
  assert_eq!(results.hits[0].count, 1);

  Ok(())
}

#[test]
#[traced_test]
fn test_match_count_ranking() -> TestResult<()> {
  let (archive, _dir) = create_test_archive();
  let sources = tempdir()?;

  add_sample(&archive, sources.path(), "once", "2020", "control", "plain text");
  add_sample(&archive, sources.path(), "thrice", "2021", "control control", "more control here");

  let query = Query::all().with_pattern("control", false)?;
  let results = Search::new(query).sort_by(SortKey::Matches).execute(&archive)?;

  // Most matches first by default.
  assert_eq!(keys(&results), vec!["thrice", "once"]);
  assert_eq!(results.hits[0].count, 3);
  assert_eq!(results.hits[1].count, 1);

  Ok(())
}

#[test]
#[traced_test]
fn test_field_filters_and_semantics() -> TestResult<()> {
  let (archive, _dir) = create_test_archive();
  let sources = tempdir()?;

  let document = add_sample(&archive, sources.path(), "smith2020", "2020", "A Theory", "text");
  add_sample(&archive, sources.path(), "jones2019", "2019", "Another", "text");

  let q1 = Query::all().with_author("smith");
  let q2 = Query::all().with_year("2020");
  let both = Query::all().with_author("smith").with_year("2020");

  // AND-combination over disjoint fields agrees with the conjunction of the
  // individual predicates.
  let conjunction = both.matches(&document)?.matched;
  assert_eq!(
    conjunction,
    q1.matches(&document)?.matched && q2.matches(&document)?.matched
  );
  assert!(conjunction);

  // A failing predicate short-circuits the whole query.
  let miss = Query::all().with_author("smith").with_year("1999");
  assert!(!miss.matches(&document)?.matched);

  // Key, venue, and entry-type predicates.
  assert_eq!(keys(&Search::new(Query::all().with_key("jones2019")).execute(&archive)?), vec![
    "jones2019"
  ]);
  assert_eq!(Search::new(Query::all().with_venue("annals")).execute(&archive)?.hits.len(), 2);
  assert_eq!(Search::new(Query::all().with_kind("ARTICLE")).execute(&archive)?.hits.len(), 2);
  assert!(Search::new(Query::all().with_kind("book")).execute(&archive)?.hits.is_empty());

  Ok(())
}

#[test]
#[traced_test]
fn test_tag_filter() -> TestResult<()> {
  let (archive, _dir) = create_test_archive();
  let sources = tempdir()?;

  let tagged = add_sample(&archive, sources.path(), "smith2020", "2020", "A Theory", "text");
  add_sample(&archive, sources.path(), "jones2019", "2019", "Another", "text");
  tagged.add_tag("robotics")?;
  tagged.add_tag("control")?;

  let results = Search::new(Query::all().with_tag("robotics")).execute(&archive)?;
  assert_eq!(keys(&results), vec!["smith2020"]);

  // Every requested tag must be present.
  let results =
    Search::new(Query::all().with_tag("robotics").with_tag("biology")).execute(&archive)?;
  assert!(results.hits.is_empty());

  Ok(())
}

#[test]
#[traced_test]
fn test_extraction_failure_is_reported_not_dropped() -> TestResult<()> {
  let (archive, _dir) = create_test_archive();
  let sources = tempdir()?;

  add_sample(&archive, sources.path(), "good2020", "2020", "control theory", "control systems");

  // A document whose "PDF" cannot be parsed.
  let pdf = sources.path().join("bad.pdf");
  fs::write(&pdf, "not a pdf at all")?;
  let bib = sources.path().join("bad.bib");
  fs::write(&bib, sample_bib("bad2021", "2021", "Broken Document"))?;
  stacks::archive::Add::new(pdf, bib).execute(&archive)?;

  let query = Query::all().with_pattern("control", false)?;
  let results = Search::new(query).execute(&archive)?;

  assert_eq!(keys(&results), vec!["good2020"]);
  assert_eq!(results.extraction_failures, vec!["bad2021".to_string()]);

  Ok(())
}

#[test]
#[traced_test]
fn test_no_matches_is_empty_not_error() -> TestResult<()> {
  let (archive, _dir) = create_test_archive();
  let sources = tempdir()?;

  add_sample(&archive, sources.path(), "smith2020", "2020", "A Theory", "text");

  let query = Query::all().with_pattern("unmentioned", false)?;
  let results = Search::new(query).execute(&archive)?;
  assert!(results.hits.is_empty());
  assert!(results.extraction_failures.is_empty());

  Ok(())
}

#[test]
#[traced_test]
fn test_timestamp_sorts_execute() -> TestResult<()> {
  let (archive, _dir) = create_test_archive();
  let sources = tempdir()?;

  add_sample(&archive, sources.path(), "first", "2019", "First", "text");
  std::thread::sleep(std::time::Duration::from_millis(20));
  add_sample(&archive, sources.path(), "second", "2020", "Second", "text");

  // Added: most recent first by default.
  let results = Search::new(Query::all()).sort_by(SortKey::Added).execute(&archive)?;
  assert_eq!(keys(&results), vec!["second", "first"]);

  // Accessed-time ordering depends on mount options, so only check that the
  // sort runs and returns everything.
  let results = Search::new(Query::all()).sort_by(SortKey::Accessed).execute(&archive)?;
  assert_eq!(results.hits.len(), 2);

  Ok(())
}

#[test]
#[traced_test]
fn test_summaries() -> TestResult<()> {
  let (archive, _dir) = create_test_archive();
  let sources = tempdir()?;

  add_sample(&archive, sources.path(), "smith2020", "2020", "Neural Networks", "neural text");

  let query = Query::all().with_pattern("neural", false)?;
  let results = Search::new(query).execute(&archive)?;

  // One match in the title, one in the text.
  let terse = format::summarize(&results.hits[0], 0)?;
  assert_eq!(terse, "smith2020 (matches = 2)");

  let verbose = format::summarize(&results.hits[0], 2)?;
  assert!(verbose.contains("Neural Networks"));
  assert!(verbose.contains("2020 (smith2020)"));
  assert!(verbose.contains("Alice Smith; Bob Jones"));
  assert!(verbose.contains("Annals of Examples"));

  Ok(())
}
